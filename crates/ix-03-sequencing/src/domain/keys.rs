//! Ledger keys an operation reads or writes.
//!
//! Two operations conflict when their key sets intersect. A ticker key
//! covers every balance and the supply of that ticker.

use std::fmt;

use ix_01_validation::Operation;
use shared_types::{PoolKey, Ticker};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LedgerKey {
    Ticker(Ticker),
    Pool(PoolKey),
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticker(ticker) => write!(f, "ticker:{ticker}"),
            Self::Pool(key) => write!(f, "pool:{key}"),
        }
    }
}

/// Keys touched by `operation`.
///
/// Token and bridge operations touch their ticker. Pair operations touch
/// both tickers, the liquidity-token ticker and the pool itself.
pub fn ledger_keys(operation: &Operation) -> Vec<LedgerKey> {
    match operation {
        Operation::Token(op) => vec![LedgerKey::Ticker(op.ticker.clone())],
        Operation::Bridge(op) => vec![LedgerKey::Ticker(op.ticker.clone())],
        Operation::Swap(op) => {
            let pool = op.pool_key();
            vec![
                LedgerKey::Ticker(op.ticker_a.clone()),
                LedgerKey::Ticker(op.ticker_b.clone()),
                LedgerKey::Ticker(pool.lp_ticker()),
                LedgerKey::Pool(pool),
            ]
        }
    }
}
