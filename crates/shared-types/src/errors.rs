//! # Error Types
//!
//! Errors shared across crates. `NumericError` is produced by the numeric
//! layer; `LedgerError` is the infrastructure channel of the ledger port and
//! is never a protocol verdict.

use thiserror::Error;

/// Errors from decimal-string conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    /// Not a base-10 unsigned integer.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Well-formed digits above the `16^64 - 1` ceiling.
    #[error("amount exceeds numeric ceiling: {0}")]
    AmountOverflow(String),

    /// Decimal places outside `u8`.
    #[error("invalid decimals: {0:?}")]
    InvalidDecimals(String),
}

/// Failures of the ledger query port.
///
/// These mean the operation was unverifiable, not invalid. Ingestion must
/// retry and must not advance past the affected operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Backend unreachable or timed out.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// Backend returned a value that does not decode.
    #[error("malformed ledger record for {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// In-process store lock poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl LedgerError {
    /// Every ledger failure is retryable; the verdict is still unknown.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

/// Errors decoding an inscription document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// `p`/`op` combination with no schema.
    #[error("unsupported operation: p={protocol:?} op={op:?}")]
    UnsupportedOperation { protocol: String, op: String },

    /// JSON that does not match the schema of its `p`/`op`.
    #[error("malformed inscription: {0}")]
    Malformed(String),
}
