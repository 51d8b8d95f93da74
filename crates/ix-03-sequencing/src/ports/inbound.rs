//! Inbound Ports (Driving Ports / API)

use shared_types::InscriptionEnvelope;

use crate::domain::{BatchReport, PipelineError};

/// Ingestion entry point.
pub trait IngestionApi: Send + Sync {
    /// Validate and apply a batch of envelopes.
    ///
    /// Envelopes may arrive in any order; they are processed by
    /// `(block_height, tx_index)`. Operations that share a ledger key run
    /// one after another on a single lane, and a lane stops at the first
    /// ledger failure.
    fn process_batch(
        &self,
        batch: Vec<InscriptionEnvelope>,
    ) -> Result<BatchReport, PipelineError>;
}
