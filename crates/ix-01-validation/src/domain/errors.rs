//! # Domain Errors
//!
//! Two disjoint channels:
//!
//! - [`Rejection`]: the operation breaks a protocol rule. Final, not
//!   retryable; the inscription is recorded as invalid.
//! - [`LedgerError`]: the ledger port failed. Retryable; ingestion must not
//!   advance past the operation.
//!
//! Rejections carry a closed [`RejectReason`] whose [`RejectReason::code`]
//! is stable across releases, so consumers assert on cause and not on text.

use serde::{Deserialize, Serialize};
use shared_types::{LedgerError, NumericError, WireError};
use std::fmt;
use thiserror::Error;

/// Closed set of rejection causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Amount string is not a base-10 integer.
    InvalidAmount,
    /// Ticker length outside `[2, 8]`.
    InvalidTickerLength,
    /// Bridge operation on a ticker other than the wrapped asset.
    InvalidTicker,
    /// Pair operation naming the same ticker twice.
    IdenticalTickers,
    /// Deploy with `max == 0`.
    NonPositiveMaxSupply,
    /// Deploy with `lim == 0`.
    NonPositiveMintLimit,
    /// An amount above `16^64 - 1`.
    ExceedsNumericCeiling,
    /// Deploy with `lim > max`.
    LimitExceedsMaxSupply,
    /// Ticker already deployed.
    AlreadyDeployed,
    /// Ticker never deployed.
    NotDeployed,
    /// An amount that must be positive is zero.
    NonPositiveAmount,
    /// Mint amount above `lim`.
    ExceedsMintLimit,
    /// Mint would push the minted sum past `max`.
    ExceedsMaxSupply,
    /// Transfer without recipients.
    MissingRecipient,
    /// Sender has no balance record for the ticker.
    BalanceNotFound,
    /// Sender balance below the required total.
    InsufficientBalance,
    /// `create` on an existing pool.
    PoolAlreadyExists,
    /// Pool for the canonical pair does not exist.
    PoolNotFound,
    /// Pool with liquidity but a zero reserve.
    EmptyReserves,
    /// Both optimal amounts fall below the caller's minimums, or swap output
    /// falls below `amt1_min`.
    SlippageExceeded,
    /// `remove` with `liquidity == 0`.
    NonPositiveLiquidity,
    /// `remove` above the pool's total liquidity.
    ExceedsPoolLiquidity,
    /// Holder's liquidity-token balance below the amount removed.
    InsufficientLiquidity,
    /// Pool reserve owner cannot cover the swap output.
    InsufficientReserves,
    /// Unknown `p`/`op` combination.
    UnsupportedOperation,
    /// Document does not match the schema of its `p`/`op`.
    MalformedInscription,
}

impl RejectReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidTickerLength => "invalid_ticker_length",
            Self::InvalidTicker => "invalid_ticker",
            Self::IdenticalTickers => "identical_tickers",
            Self::NonPositiveMaxSupply => "non_positive_max_supply",
            Self::NonPositiveMintLimit => "non_positive_mint_limit",
            Self::ExceedsNumericCeiling => "exceeds_numeric_ceiling",
            Self::LimitExceedsMaxSupply => "limit_exceeds_max_supply",
            Self::AlreadyDeployed => "already_deployed",
            Self::NotDeployed => "not_deployed",
            Self::NonPositiveAmount => "non_positive_amount",
            Self::ExceedsMintLimit => "exceeds_mint_limit",
            Self::ExceedsMaxSupply => "exceeds_max_supply",
            Self::MissingRecipient => "missing_recipient",
            Self::BalanceNotFound => "balance_not_found",
            Self::InsufficientBalance => "insufficient_balance",
            Self::PoolAlreadyExists => "pool_already_exists",
            Self::PoolNotFound => "pool_not_found",
            Self::EmptyReserves => "empty_reserves",
            Self::SlippageExceeded => "slippage_exceeded",
            Self::NonPositiveLiquidity => "non_positive_liquidity",
            Self::ExceedsPoolLiquidity => "exceeds_pool_liquidity",
            Self::InsufficientLiquidity => "insufficient_liquidity",
            Self::InsufficientReserves => "insufficient_reserves",
            Self::UnsupportedOperation => "unsupported_operation",
            Self::MalformedInscription => "malformed_inscription",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A protocol-rule verdict: stable reason plus optional human detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: RejectReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Rejection {
    pub fn new(reason: RejectReason) -> Self {
        Self {
            reason,
            detail: None,
        }
    }

    pub fn with_detail(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.reason, detail),
            None => write!(f, "{}", self.reason),
        }
    }
}

impl std::error::Error for Rejection {}

impl From<NumericError> for Rejection {
    fn from(err: NumericError) -> Self {
        let reason = match err {
            NumericError::AmountOverflow(_) => RejectReason::ExceedsNumericCeiling,
            NumericError::InvalidAmount(_) | NumericError::InvalidDecimals(_) => {
                RejectReason::InvalidAmount
            }
        };
        Self::with_detail(reason, err.to_string())
    }
}

impl From<WireError> for Rejection {
    fn from(err: WireError) -> Self {
        match err {
            WireError::UnsupportedOperation { .. } => {
                Self::with_detail(RejectReason::UnsupportedOperation, err.to_string())
            }
            WireError::Malformed(message) => {
                Self::with_detail(RejectReason::MalformedInscription, message)
            }
        }
    }
}

/// Outcome of a failed validation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The operation is invalid.
    #[error("rejected: {0}")]
    Rejected(Rejection),

    /// The operation could not be verified.
    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

impl ValidationError {
    /// Shorthand for a detail-less rejection.
    pub fn reject(reason: RejectReason) -> Self {
        Self::Rejected(Rejection::new(reason))
    }

    pub fn reject_with(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self::Rejected(Rejection::with_detail(reason, detail))
    }

    /// True for infrastructure failures only.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_retryable())
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            Self::Ledger(_) => None,
        }
    }

    pub fn reason(&self) -> Option<RejectReason> {
        self.rejection().map(|r| r.reason)
    }
}

impl From<Rejection> for ValidationError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}
