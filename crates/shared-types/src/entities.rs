//! # Core Ledger Entities
//!
//! Identifiers and read projections shared between the validation engine and
//! the storage side.
//!
//! ## Clusters
//!
//! - **Identity**: `Ticker`, `Address`, `PoolKey`
//! - **Ledger Projections**: `SupplyInfo`, `PoolState`
//! - **Chain Order**: `ChainLocation`

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export the fixed-width integers used for every ledger quantity
pub use primitive_types::{U256, U512};

/// Every monetary quantity: balances, supplies, reserves, liquidity.
///
/// The ceiling `2^256 - 1` equals the protocol's `16^64 - 1` bound.
pub type TokenAmount = U256;

/// A caller-supplied minimum.
///
/// Wider than any ledger quantity so a bound above the ceiling still
/// compares correctly against real amounts. Saturates at `U512::MAX`.
pub type AmountBound = U512;

/// Decimal places assumed when a deploy omits `dec` or sends zero.
pub const DEFAULT_DECIMALS: u8 = 8;

/// Shortest ticker accepted by deploy and mint.
pub const MIN_TICKER_LEN: usize = 2;

/// Longest ticker accepted by deploy and mint.
pub const MAX_TICKER_LEN: usize = 8;

/// The only ticker the wrapped-native bridge operates on.
pub const WRAPPED_TICKER: &str = "WDOGE(WRAPPED-DOGE)";

/// Infix of the synthetic liquidity-token ticker `"<A>-SWAP-<B>"`.
pub const LP_TICKER_INFIX: &str = "-SWAP-";

// =============================================================================
// IDENTITY
// =============================================================================

/// Case-normalized token ticker.
///
/// Construction always uppercases, so lookups are case-insensitive by
/// construction. Ordering is byte-wise lexicographic and defines the
/// canonical order of a token pair.
///
/// Uppercasing maps one character to one character. A character whose
/// uppercase form is longer than one character (`ß`, `ﬀ`) is kept as is,
/// so normalization never changes the character count.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Create a ticker, uppercasing the raw inscription value.
    pub fn new(raw: &str) -> Self {
        Self(raw.chars().map(upper_char).collect())
    }

    /// The wrapped-native bridge ticker.
    pub fn wrapped() -> Self {
        Self(WRAPPED_TICKER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes, which is what the ticker-length rule measures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the length sits inside `[MIN_TICKER_LEN, MAX_TICKER_LEN]`.
    pub fn has_valid_length(&self) -> bool {
        (MIN_TICKER_LEN..=MAX_TICKER_LEN).contains(&self.len())
    }

    pub fn is_wrapped(&self) -> bool {
        self.0 == WRAPPED_TICKER
    }
}

fn upper_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

impl From<String> for Ticker {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chain address as it appears on chain (base58 for the UTXO chain).
///
/// Addresses are opaque to the engine; they are compared verbatim.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical identity of an AMM pool: `ticker_a < ticker_b`.
///
/// There is no way to build a `PoolKey` in the other order, so a pool has
/// exactly one identity regardless of the order a user supplied the pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    ticker_a: Ticker,
    ticker_b: Ticker,
}

impl PoolKey {
    /// Build the canonical key from a pair supplied in either order.
    pub fn new(first: Ticker, second: Ticker) -> Self {
        if first <= second {
            Self {
                ticker_a: first,
                ticker_b: second,
            }
        } else {
            Self {
                ticker_a: second,
                ticker_b: first,
            }
        }
    }

    pub fn ticker_a(&self) -> &Ticker {
        &self.ticker_a
    }

    pub fn ticker_b(&self) -> &Ticker {
        &self.ticker_b
    }

    /// Synthetic ticker under which liquidity-token balances are recorded.
    pub fn lp_ticker(&self) -> Ticker {
        Ticker(format!(
            "{}{}{}",
            self.ticker_a, LP_TICKER_INFIX, self.ticker_b
        ))
    }

    /// Address that holds the pool reserves.
    pub fn reserves_owner(&self) -> Address {
        Address(self.lp_ticker().0)
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ticker_a, self.ticker_b)
    }
}

// =============================================================================
// LEDGER PROJECTIONS
// =============================================================================

/// Per-ticker aggregate read by the token validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyInfo {
    /// Sum of all accepted mints so far.
    #[serde(with = "crate::numeric::serde_decimal")]
    pub minted_sum: TokenAmount,
    /// Deploy-time `max`.
    #[serde(with = "crate::numeric::serde_decimal")]
    pub max_supply: TokenAmount,
    /// Deploy-time `lim`.
    #[serde(with = "crate::numeric::serde_decimal")]
    pub per_mint_limit: TokenAmount,
}

impl SupplyInfo {
    pub fn new(max_supply: TokenAmount, per_mint_limit: TokenAmount) -> Self {
        Self {
            minted_sum: TokenAmount::zero(),
            max_supply,
            per_mint_limit,
        }
    }

    pub fn with_minted(mut self, minted_sum: TokenAmount) -> Self {
        self.minted_sum = minted_sum;
        self
    }
}

/// Materialized AMM pool.
///
/// `liquidity_total == 0` means liquidity has never been added, which is the
/// special case for the first `add`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub key: PoolKey,
    #[serde(with = "crate::numeric::serde_decimal")]
    pub reserve_a: TokenAmount,
    #[serde(with = "crate::numeric::serde_decimal")]
    pub reserve_b: TokenAmount,
    #[serde(with = "crate::numeric::serde_decimal")]
    pub liquidity_total: TokenAmount,
    pub reserves_owner: Address,
}

impl PoolState {
    /// An empty pool whose reserves are held by the key's synthetic owner.
    pub fn empty(key: PoolKey) -> Self {
        let reserves_owner = key.reserves_owner();
        Self {
            key,
            reserve_a: TokenAmount::zero(),
            reserve_b: TokenAmount::zero(),
            liquidity_total: TokenAmount::zero(),
            reserves_owner,
        }
    }

    pub fn with_reserves(mut self, reserve_a: TokenAmount, reserve_b: TokenAmount) -> Self {
        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self
    }

    pub fn with_liquidity(mut self, liquidity_total: TokenAmount) -> Self {
        self.liquidity_total = liquidity_total;
        self
    }

    /// Reserves oriented for a trade that gives `ticker_in`.
    ///
    /// Returns `(reserve_in, reserve_out)`.
    pub fn oriented_reserves(&self, ticker_in: &Ticker) -> (TokenAmount, TokenAmount) {
        if ticker_in == self.key.ticker_a() {
            (self.reserve_a, self.reserve_b)
        } else {
            (self.reserve_b, self.reserve_a)
        }
    }
}

// =============================================================================
// CHAIN ORDER
// =============================================================================

/// Position of an inscription in the chain's total order.
///
/// Ordering is block height first, then transaction index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainLocation {
    pub block_height: u64,
    pub tx_index: u32,
}

impl ChainLocation {
    pub fn new(block_height: u64, tx_index: u32) -> Self {
        Self {
            block_height,
            tx_index,
        }
    }
}

impl fmt::Display for ChainLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block_height, self.tx_index)
    }
}
