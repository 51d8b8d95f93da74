use std::sync::RwLock;

use ix_01_validation::{Approval, LedgerQuery};
use shared_types::{
    Address, LedgerError, PoolKey, PoolState, SupplyInfo, Ticker, TokenAmount,
};
use tracing::{debug, warn};

use crate::domain::{ApplyError, Journal, LedgerState, TokenRecord};
use crate::ports::LedgerStore;

/// In-memory ledger, the reference store for tests and the runtime.
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::from_state(LedgerState::new())
    }

    pub fn from_state(state: LedgerState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Pre-deployed ticker.
    pub fn with_token(
        self,
        ticker: &str,
        max_supply: TokenAmount,
        per_mint_limit: TokenAmount,
        minted_sum: TokenAmount,
    ) -> Self {
        self.seed(|state| {
            state.insert_token(
                Ticker::new(ticker),
                TokenRecord::deployed(
                    SupplyInfo::new(max_supply, per_mint_limit).with_minted(minted_sum),
                    shared_types::DEFAULT_DECIMALS,
                    Address::new("genesis"),
                ),
            )
        })
    }

    pub fn with_balance(self, ticker: &str, address: &str, amount: TokenAmount) -> Self {
        self.seed(|state| state.set_balance(Ticker::new(ticker), Address::new(address), amount))
    }

    /// Seeds the pool and mirrors its reserves onto the reserve owner.
    pub fn with_pool(self, pool: PoolState) -> Self {
        self.seed(|state| {
            let owner = pool.reserves_owner.clone();
            state.set_balance(pool.key.ticker_a().clone(), owner.clone(), pool.reserve_a);
            state.set_balance(pool.key.ticker_b().clone(), owner, pool.reserve_b);
            state.insert_pool(pool);
        })
    }

    fn seed(mut self, f: impl FnOnce(&mut LedgerState)) -> Self {
        // A poisoned lock on a value we exclusively own still holds valid data
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(state);
        self
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> Result<LedgerState, LedgerError> {
        let state = self.state.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.clone())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerQuery for InMemoryLedger {
    fn supply_info(&self, ticker: &Ticker) -> Result<Option<SupplyInfo>, LedgerError> {
        let state = self.state.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.token(ticker).map(|record| record.supply.clone()))
    }

    fn balance(
        &self,
        ticker: &Ticker,
        address: &Address,
    ) -> Result<Option<TokenAmount>, LedgerError> {
        let state = self.state.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.balance(ticker, address))
    }

    fn pool_state(&self, key: &PoolKey) -> Result<Option<PoolState>, LedgerError> {
        let state = self.state.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.pool(key).cloned())
    }
}

impl LedgerStore for InMemoryLedger {
    fn apply(&self, approval: &Approval) -> Result<Journal, ApplyError> {
        let mut state = self.state.write().map_err(|_| LedgerError::LockPoisoned)?;
        match state.apply(approval) {
            Ok(journal) => {
                debug!(kind = approval.kind().op_name(), movements = journal.len(), "Approval applied");
                Ok(journal)
            }
            Err(err) => {
                warn!(kind = approval.kind().op_name(), error = %err, "Approval refused by store");
                Err(err)
            }
        }
    }
}
