//! # Outbound Ports (Driven Ports)
//!
//! The read-only ledger view the validators depend on. Implemented by the
//! storage side; validators never write through it.
//!
//! ## Contract
//!
//! - Each call observes one coherent point-in-time view.
//! - `Ok(None)` means "not found" and is a normal answer.
//! - `Err(LedgerError)` means the answer is unknown; the caller must retry.

use std::sync::Arc;

use shared_types::{Address, LedgerError, PoolKey, PoolState, SupplyInfo, Ticker, TokenAmount};

/// Ledger snapshot reads used by every validator.
pub trait LedgerQuery: Send + Sync {
    /// `(minted_sum, max_supply, per_mint_limit)` for a deployed ticker.
    fn supply_info(&self, ticker: &Ticker) -> Result<Option<SupplyInfo>, LedgerError>;

    /// Balance of `address` in `ticker`, if a record exists.
    fn balance(&self, ticker: &Ticker, address: &Address)
        -> Result<Option<TokenAmount>, LedgerError>;

    /// Pool for a canonical pair.
    fn pool_state(&self, key: &PoolKey) -> Result<Option<PoolState>, LedgerError>;
}

impl<T: LedgerQuery + ?Sized> LedgerQuery for Arc<T> {
    fn supply_info(&self, ticker: &Ticker) -> Result<Option<SupplyInfo>, LedgerError> {
        (**self).supply_info(ticker)
    }

    fn balance(
        &self,
        ticker: &Ticker,
        address: &Address,
    ) -> Result<Option<TokenAmount>, LedgerError> {
        (**self).balance(ticker, address)
    }

    fn pool_state(&self, key: &PoolKey) -> Result<Option<PoolState>, LedgerError> {
        (**self).pool_state(key)
    }
}

/// Mock ledger for testing.
#[cfg(test)]
#[derive(Default)]
pub struct MockLedger {
    supplies: std::collections::HashMap<Ticker, SupplyInfo>,
    balances: std::collections::HashMap<(Ticker, Address), TokenAmount>,
    pools: std::collections::HashMap<PoolKey, PoolState>,
    failure: Option<LedgerError>,
}

#[cfg(test)]
impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supply(mut self, ticker: &str, info: SupplyInfo) -> Self {
        self.supplies.insert(Ticker::new(ticker), info);
        self
    }

    pub fn with_balance(mut self, ticker: &str, address: &str, amount: u128) -> Self {
        self.balances.insert(
            (Ticker::new(ticker), Address::new(address)),
            TokenAmount::from(amount),
        );
        self
    }

    pub fn with_pool(mut self, pool: PoolState) -> Self {
        self.pools.insert(pool.key.clone(), pool);
        self
    }

    /// Every call fails with `err`.
    pub fn failing(err: LedgerError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), LedgerError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
impl LedgerQuery for MockLedger {
    fn supply_info(&self, ticker: &Ticker) -> Result<Option<SupplyInfo>, LedgerError> {
        self.check()?;
        Ok(self.supplies.get(ticker).cloned())
    }

    fn balance(
        &self,
        ticker: &Ticker,
        address: &Address,
    ) -> Result<Option<TokenAmount>, LedgerError> {
        self.check()?;
        Ok(self
            .balances
            .get(&(ticker.clone(), address.clone()))
            .copied())
    }

    fn pool_state(&self, key: &PoolKey) -> Result<Option<PoolState>, LedgerError> {
        self.check()?;
        Ok(self.pools.get(key).cloned())
    }
}
