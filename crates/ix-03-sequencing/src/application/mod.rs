//! Application layer for keyed sequencing

pub mod pipeline;

pub use pipeline::{IngestionPipeline, PARALLEL_THRESHOLD};
