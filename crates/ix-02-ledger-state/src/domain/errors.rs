//! Errors raised while applying an approval.

use shared_types::{Address, LedgerError, PoolKey, Ticker, TokenAmount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// A debit would take a balance below zero.
    #[error("insufficient {ticker} at {address}: has {available}, needs {required}")]
    Insufficient {
        ticker: Ticker,
        address: Address,
        available: TokenAmount,
        required: TokenAmount,
    },

    #[error("ticker not deployed: {0}")]
    NotDeployed(Ticker),

    #[error("ticker already deployed: {0}")]
    AlreadyDeployed(Ticker),

    #[error("pool not found: {0}")]
    PoolNotFound(PoolKey),

    #[error("pool already exists: {0}")]
    PoolExists(PoolKey),

    /// Pool with liquidity outstanding but an empty reserve.
    #[error("pool has empty reserves: {0}")]
    EmptyReserves(PoolKey),

    /// Mint beyond `max_supply`.
    #[error("supply exceeded for {ticker}: {minted} + {amount} > {max}")]
    SupplyExceeded {
        ticker: Ticker,
        minted: TokenAmount,
        amount: TokenAmount,
        max: TokenAmount,
    },

    /// A credit past the numeric ceiling.
    #[error("amount overflow in {0}")]
    Overflow(String),

    /// The store itself failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApplyError {
    /// Only store failures are worth retrying; every other variant is a
    /// deterministic refusal that a retry would reproduce.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_retryable())
    }
}
