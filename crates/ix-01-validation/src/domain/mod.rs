//! Domain module for inscription validation
//!
//! Decoded operations, rejection taxonomy, approvals and the pure
//! constant-product math. No ledger access happens here.

pub mod amm;
pub mod approvals;
pub mod errors;
pub mod operations;

pub use approvals::*;
pub use errors::*;
pub use operations::*;
