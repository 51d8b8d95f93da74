//! Domain module for keyed sequencing
//!
//! Ledger keys, per-operation outcomes and batch errors.

pub mod errors;
pub mod keys;
pub mod report;

pub use errors::*;
pub use keys::*;
pub use report::*;
