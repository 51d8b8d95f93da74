//! # IX-03: Keyed Sequencing Subsystem
//!
//! Runs validate-then-apply over a batch of inscriptions in chain order.
//!
//! ## Architecture
//!
//! - **Domain**: ledger keys, per-operation outcomes, batch errors
//! - **Algorithms**: lane planning over shared ledger keys
//! - **Ports**: Inbound (`IngestionApi`)
//! - **Application**: `IngestionPipeline`
//!
//! ## Ordering
//!
//! Two operations that touch a common ticker or pool always run in
//! `(block_height, tx_index)` order on the same lane, so each one is
//! validated against the state its predecessor left. Operations with no
//! key in common may run on different rayon workers; the final ledger does
//! not depend on how those lanes interleave.

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use algorithms::{plan_lanes, Lane};
pub use application::{IngestionPipeline, PARALLEL_THRESHOLD};
pub use config::SequencerConfig;
pub use domain::*;
pub use ports::IngestionApi;
