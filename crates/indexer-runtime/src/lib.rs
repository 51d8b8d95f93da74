//! # Inscription Indexer Runtime
//!
//! Wires the subsystems into a batch indexer.
//!
//! ## Modular Structure
//!
//! - `config` - `RuntimeConfig`, loaded from file and `IX_*` variables
//! - `runner` - line reader, chunking and run summary
//!
//! ## Flow
//!
//! ```text
//! JSONL ──RawEnvelope──→ decode ──InscriptionEnvelope──→ IngestionPipeline (3)
//!                          │                                    │
//!                          ↓                          Dispatcher (1) + InMemoryLedger (2)
//!                 unsupported p/op                              │
//!                          │                                    ↓
//!                          └──────────────→ RunSummary ←── BatchReport
//! ```

pub mod config;
pub mod runner;

pub use config::RuntimeConfig;
pub use runner::{IndexerRuntime, RunSummary};
