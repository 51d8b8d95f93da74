//! Error types for the sequencer

use thiserror::Error;

/// Batch-level failures. Per-operation verdicts live in the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Empty batch")]
    EmptyBatch,

    #[error("Batch size exceeded: {size} > {max}")]
    BatchTooLarge { size: usize, max: usize },
}
