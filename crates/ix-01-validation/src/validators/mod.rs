//! # Validators
//!
//! One validator per protocol. Each borrows the ledger port for the span of
//! a single call, reads what its rules need and returns an [`Approval`] or
//! a [`ValidationError`]. Nothing here writes.
//!
//! Checks that need no ledger read run first, so a malformed operation never
//! costs a query.
//!
//! [`Approval`]: crate::domain::Approval

pub mod bridge;
pub mod swap;
pub mod token;

pub use bridge::BridgeValidator;
pub use swap::SwapValidator;
pub use token::TokenValidator;

use shared_types::numeric::narrow;
use shared_types::{Address, Ticker, TokenAmount, U512};

use crate::domain::{RejectReason, ValidationError};
use crate::ports::LedgerQuery;

/// Reasons a balance requirement reports when it fails.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Shortfall {
    pub missing: RejectReason,
    pub short: RejectReason,
}

impl Shortfall {
    /// Ordinary holder balance.
    pub const BALANCE: Self = Self {
        missing: RejectReason::BalanceNotFound,
        short: RejectReason::InsufficientBalance,
    };

    /// Liquidity-token balance.
    pub const LIQUIDITY: Self = Self {
        missing: RejectReason::InsufficientLiquidity,
        short: RejectReason::InsufficientLiquidity,
    };

    /// Pool reserve owner's balance.
    pub const RESERVES: Self = Self {
        missing: RejectReason::InsufficientReserves,
        short: RejectReason::InsufficientReserves,
    };
}

/// Ticker byte length must lie in `[2, 8]`.
pub(crate) fn require_ticker_length(ticker: &Ticker) -> Result<(), ValidationError> {
    if ticker.has_valid_length() {
        Ok(())
    } else {
        Err(ValidationError::reject_with(
            RejectReason::InvalidTickerLength,
            format!("{ticker:?} has {} bytes", ticker.len()),
        ))
    }
}

pub(crate) fn require_positive(
    amount: TokenAmount,
    reason: RejectReason,
    name: &str,
) -> Result<(), ValidationError> {
    if amount.is_zero() {
        Err(ValidationError::reject_with(reason, format!("{name} is zero")))
    } else {
        Ok(())
    }
}

/// Require `holder` to hold at least `required` of `ticker`.
///
/// `required` is wide so callers can pass products such as
/// `amount × recipients` without narrowing first. Returns the requirement
/// narrowed, which always fits once it is covered by a balance.
pub(crate) fn require_balance<L: LedgerQuery + ?Sized>(
    ledger: &L,
    ticker: &Ticker,
    holder: &Address,
    required: U512,
    shortfall: Shortfall,
) -> Result<TokenAmount, ValidationError> {
    let Some(balance) = ledger.balance(ticker, holder)? else {
        return Err(ValidationError::reject_with(
            shortfall.missing,
            format!("{holder} holds no {ticker}"),
        ));
    };
    match narrow(required) {
        Some(required) if required <= balance => Ok(required),
        _ => Err(ValidationError::reject_with(
            shortfall.short,
            format!("{holder} needs {required} {ticker}, has {balance}"),
        )),
    }
}
