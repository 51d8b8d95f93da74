//! Domain module for ledger state
//!
//! The committed tables and the staged application of approvals.

pub mod errors;
pub mod state;

pub use errors::*;
pub use state::*;
