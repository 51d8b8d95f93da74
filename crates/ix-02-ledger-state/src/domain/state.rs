//! # Ledger State
//!
//! Token registry, balances and pools, plus the rules for applying an
//! [`Approval`] to them.
//!
//! Application is staged: every read goes through a [`ChangeSet`] layered
//! over the committed state, every write lands in the change set, and the
//! change set is merged only once the whole approval has gone through. A
//! failure part-way leaves the state untouched.

use std::collections::BTreeMap;

use ix_01_validation::Approval;
use serde::{Deserialize, Serialize};
use shared_types::numeric::{mul_div_floor, narrow, serde_decimal, sqrt_product, MAX_AMOUNT};
use shared_types::{
    Address, PoolKey, PoolState, SupplyInfo, Ticker, TokenAmount, DEFAULT_DECIMALS, U512,
};

use super::errors::ApplyError;

/// Registry entry for a ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub supply: SupplyInfo,
    pub decimals: u8,
    /// `None` for the bridged asset, which is never deployed.
    pub deployer: Option<Address>,
}

impl TokenRecord {
    pub fn deployed(supply: SupplyInfo, decimals: u8, deployer: Address) -> Self {
        Self {
            supply,
            decimals,
            deployer: Some(deployer),
        }
    }

    /// Record created by the first bridge deposit.
    fn wrapped() -> Self {
        Self {
            supply: SupplyInfo::new(MAX_AMOUNT, MAX_AMOUNT),
            decimals: DEFAULT_DECIMALS,
            deployer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Credit,
    Debit,
}

/// One balance change made by an approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub ticker: Ticker,
    pub address: Address,
    pub direction: Direction,
    #[serde(with = "serde_decimal")]
    pub amount: TokenAmount,
}

/// Balance changes of one applied approval, in the order they were made.
pub type Journal = Vec<Movement>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    tokens: BTreeMap<Ticker, TokenRecord>,
    balances: BTreeMap<(Ticker, Address), TokenAmount>,
    pools: BTreeMap<PoolKey, PoolState>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self, ticker: &Ticker) -> Option<&TokenRecord> {
        self.tokens.get(ticker)
    }

    pub fn balance(&self, ticker: &Ticker, address: &Address) -> Option<TokenAmount> {
        self.balances
            .get(&(ticker.clone(), address.clone()))
            .copied()
    }

    pub fn pool(&self, key: &PoolKey) -> Option<&PoolState> {
        self.pools.get(key)
    }

    pub fn insert_token(&mut self, ticker: Ticker, record: TokenRecord) {
        self.tokens.insert(ticker, record);
    }

    pub fn set_balance(&mut self, ticker: Ticker, address: Address, amount: TokenAmount) {
        self.balances.insert((ticker, address), amount);
    }

    pub fn insert_pool(&mut self, pool: PoolState) {
        self.pools.insert(pool.key.clone(), pool);
    }

    /// Holders of `ticker` in address order.
    pub fn holders<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> impl Iterator<Item = (&'a Address, TokenAmount)> + 'a {
        self.balances
            .iter()
            .filter(move |((t, _), _)| t == ticker)
            .map(|((_, address), amount)| (address, *amount))
    }

    /// Sum of every recorded balance of `ticker`. Wide so it cannot overflow.
    pub fn circulating(&self, ticker: &Ticker) -> U512 {
        self.holders(ticker)
            .fold(U512::zero(), |acc, (_, amount)| acc + U512::from(amount))
    }

    /// Apply an approval atomically.
    pub fn apply(&mut self, approval: &Approval) -> Result<Journal, ApplyError> {
        let staged = {
            let mut changes = ChangeSet::new(self);
            changes.apply(approval)?;
            changes.finish()
        };
        self.tokens.extend(staged.tokens);
        self.balances.extend(staged.balances);
        self.pools.extend(staged.pools);
        Ok(staged.journal)
    }
}

// =============================================================================
// STAGING
// =============================================================================

struct Staged {
    tokens: BTreeMap<Ticker, TokenRecord>,
    balances: BTreeMap<(Ticker, Address), TokenAmount>,
    pools: BTreeMap<PoolKey, PoolState>,
    journal: Journal,
}

/// Writes buffered over a read-only view of the committed state.
struct ChangeSet<'a> {
    base: &'a LedgerState,
    tokens: BTreeMap<Ticker, TokenRecord>,
    balances: BTreeMap<(Ticker, Address), TokenAmount>,
    pools: BTreeMap<PoolKey, PoolState>,
    journal: Journal,
}

impl<'a> ChangeSet<'a> {
    fn new(base: &'a LedgerState) -> Self {
        Self {
            base,
            tokens: BTreeMap::new(),
            balances: BTreeMap::new(),
            pools: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    fn finish(self) -> Staged {
        Staged {
            tokens: self.tokens,
            balances: self.balances,
            pools: self.pools,
            journal: self.journal,
        }
    }

    fn token(&self, ticker: &Ticker) -> Option<TokenRecord> {
        self.tokens
            .get(ticker)
            .or_else(|| self.base.token(ticker))
            .cloned()
    }

    fn pool(&self, key: &PoolKey) -> Option<PoolState> {
        self.pools
            .get(key)
            .or_else(|| self.base.pool(key))
            .cloned()
    }

    fn existing_pool(&self, key: &PoolKey) -> Result<PoolState, ApplyError> {
        self.pool(key)
            .ok_or_else(|| ApplyError::PoolNotFound(key.clone()))
    }

    fn balance(&self, ticker: &Ticker, address: &Address) -> TokenAmount {
        let slot = (ticker.clone(), address.clone());
        self.balances
            .get(&slot)
            .copied()
            .or_else(|| self.base.balances.get(&slot).copied())
            .unwrap_or_default()
    }

    fn credit(
        &mut self,
        ticker: &Ticker,
        address: &Address,
        amount: TokenAmount,
    ) -> Result<(), ApplyError> {
        let next = self
            .balance(ticker, address)
            .checked_add(amount)
            .ok_or_else(|| ApplyError::Overflow(format!("{ticker} balance of {address}")))?;
        self.record(ticker, address, next, Direction::Credit, amount);
        Ok(())
    }

    fn debit(
        &mut self,
        ticker: &Ticker,
        address: &Address,
        amount: TokenAmount,
    ) -> Result<(), ApplyError> {
        let available = self.balance(ticker, address);
        let next = available
            .checked_sub(amount)
            .ok_or_else(|| ApplyError::Insufficient {
                ticker: ticker.clone(),
                address: address.clone(),
                available,
                required: amount,
            })?;
        self.record(ticker, address, next, Direction::Debit, amount);
        Ok(())
    }

    fn record(
        &mut self,
        ticker: &Ticker,
        address: &Address,
        next: TokenAmount,
        direction: Direction,
        amount: TokenAmount,
    ) {
        self.balances
            .insert((ticker.clone(), address.clone()), next);
        self.journal.push(Movement {
            ticker: ticker.clone(),
            address: address.clone(),
            direction,
            amount,
        });
    }

    /// Move `amount` of `ticker` from one address to another.
    fn transfer(
        &mut self,
        ticker: &Ticker,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), ApplyError> {
        self.debit(ticker, from, amount)?;
        self.credit(ticker, to, amount)
    }

    fn apply(&mut self, approval: &Approval) -> Result<(), ApplyError> {
        match approval {
            Approval::Deploy {
                ticker,
                max_supply,
                per_mint_limit,
                decimals,
                deployer,
            } => {
                if self.token(ticker).is_some() {
                    return Err(ApplyError::AlreadyDeployed(ticker.clone()));
                }
                self.tokens.insert(
                    ticker.clone(),
                    TokenRecord::deployed(
                        SupplyInfo::new(*max_supply, *per_mint_limit),
                        *decimals,
                        deployer.clone(),
                    ),
                );
                Ok(())
            }

            Approval::Mint {
                ticker,
                recipient,
                total,
            } => {
                let mut record = self
                    .token(ticker)
                    .ok_or_else(|| ApplyError::NotDeployed(ticker.clone()))?;
                let supply = &record.supply;
                let minted = supply
                    .minted_sum
                    .checked_add(*total)
                    .filter(|minted| *minted <= supply.max_supply)
                    .ok_or_else(|| ApplyError::SupplyExceeded {
                        ticker: ticker.clone(),
                        minted: supply.minted_sum,
                        amount: *total,
                        max: supply.max_supply,
                    })?;
                record.supply.minted_sum = minted;
                self.tokens.insert(ticker.clone(), record);
                self.credit(ticker, recipient, *total)
            }

            Approval::Transfer {
                ticker,
                from,
                recipients,
                amount_each,
                total,
            } => {
                self.debit(ticker, from, *total)?;
                for recipient in recipients {
                    self.credit(ticker, recipient, *amount_each)?;
                }
                Ok(())
            }

            Approval::CreatePool {
                key,
                holder,
                amount_a,
                amount_b,
            } => {
                if self.pool(key).is_some() {
                    return Err(ApplyError::PoolExists(key.clone()));
                }
                let pool = PoolState::empty(key.clone());
                self.transfer(key.ticker_a(), holder, &pool.reserves_owner, *amount_a)?;
                self.transfer(key.ticker_b(), holder, &pool.reserves_owner, *amount_b)?;

                let liquidity = sqrt_product(*amount_a, *amount_b);
                self.credit(&key.lp_ticker(), holder, liquidity)?;
                self.pools.insert(
                    key.clone(),
                    pool.with_reserves(*amount_a, *amount_b)
                        .with_liquidity(liquidity),
                );
                Ok(())
            }

            Approval::AddLiquidity {
                key,
                holder,
                amount_a,
                amount_b,
                ..
            } => {
                let mut pool = self.existing_pool(key)?;
                let minted = liquidity_for_deposit(&pool, *amount_a, *amount_b)?;

                self.transfer(key.ticker_a(), holder, &pool.reserves_owner, *amount_a)?;
                self.transfer(key.ticker_b(), holder, &pool.reserves_owner, *amount_b)?;
                self.credit(&key.lp_ticker(), holder, minted)?;

                pool.reserve_a = grow(pool.reserve_a, *amount_a, "reserve_a")?;
                pool.reserve_b = grow(pool.reserve_b, *amount_b, "reserve_b")?;
                pool.liquidity_total = grow(pool.liquidity_total, minted, "liquidity_total")?;
                self.pools.insert(key.clone(), pool);
                Ok(())
            }

            Approval::RemoveLiquidity {
                key,
                holder,
                liquidity,
            } => {
                let mut pool = self.existing_pool(key)?;
                let share = |reserve| {
                    mul_div_floor(*liquidity, reserve, pool.liquidity_total)
                        .and_then(narrow)
                        .ok_or_else(|| ApplyError::EmptyReserves(key.clone()))
                };
                let out_a = share(pool.reserve_a)?;
                let out_b = share(pool.reserve_b)?;

                self.debit(&key.lp_ticker(), holder, *liquidity)?;
                self.transfer(key.ticker_a(), &pool.reserves_owner, holder, out_a)?;
                self.transfer(key.ticker_b(), &pool.reserves_owner, holder, out_b)?;

                pool.reserve_a = shrink(&pool, key.ticker_a(), pool.reserve_a, out_a)?;
                pool.reserve_b = shrink(&pool, key.ticker_b(), pool.reserve_b, out_b)?;
                pool.liquidity_total =
                    shrink(&pool, &key.lp_ticker(), pool.liquidity_total, *liquidity)?;
                self.pools.insert(key.clone(), pool);
                Ok(())
            }

            Approval::Swap {
                key,
                holder,
                ticker_in,
                ticker_out,
                amount_in,
                amount_out,
                reserves_owner,
                ..
            } => {
                let mut pool = self.existing_pool(key)?;
                self.transfer(ticker_in, holder, reserves_owner, *amount_in)?;
                self.transfer(ticker_out, reserves_owner, holder, *amount_out)?;

                // The fee stays in the pool: the full input joins the reserve
                if ticker_in == key.ticker_a() {
                    pool.reserve_a = grow(pool.reserve_a, *amount_in, "reserve_a")?;
                    pool.reserve_b = shrink(&pool, ticker_out, pool.reserve_b, *amount_out)?;
                } else {
                    pool.reserve_b = grow(pool.reserve_b, *amount_in, "reserve_b")?;
                    pool.reserve_a = shrink(&pool, ticker_out, pool.reserve_a, *amount_out)?;
                }
                self.pools.insert(key.clone(), pool);
                Ok(())
            }

            Approval::Deposit { holder, amount } => {
                let ticker = Ticker::wrapped();
                let mut record = self.token(&ticker).unwrap_or_else(TokenRecord::wrapped);
                record.supply.minted_sum =
                    grow(record.supply.minted_sum, *amount, "wrapped supply")?;
                self.tokens.insert(ticker.clone(), record);
                self.credit(&ticker, holder, *amount)
            }

            Approval::Withdraw { holder, amount } => {
                let ticker = Ticker::wrapped();
                self.debit(&ticker, holder, *amount)?;
                if let Some(mut record) = self.token(&ticker) {
                    // A covered debit implies at least this much was deposited
                    record.supply.minted_sum = record.supply.minted_sum.saturating_sub(*amount);
                    self.tokens.insert(ticker, record);
                }
                Ok(())
            }
        }
    }
}

/// Liquidity tokens minted for a deposit of `(amount_a, amount_b)`.
///
/// First deposit: `floor(sqrt(a × b))`. Afterwards the smaller of the two
/// proportional shares, `min(a × L / reserve_a, b × L / reserve_b)`.
pub fn liquidity_for_deposit(
    pool: &PoolState,
    amount_a: TokenAmount,
    amount_b: TokenAmount,
) -> Result<TokenAmount, ApplyError> {
    if pool.liquidity_total.is_zero() {
        return Ok(sqrt_product(amount_a, amount_b));
    }
    let total = pool.liquidity_total;
    let via_a = mul_div_floor(amount_a, total, pool.reserve_a);
    let via_b = mul_div_floor(amount_b, total, pool.reserve_b);
    match (via_a, via_b) {
        (Some(a), Some(b)) => narrow(a.min(b))
            .ok_or_else(|| ApplyError::Overflow(format!("liquidity minted for {}", pool.key))),
        _ => Err(ApplyError::EmptyReserves(pool.key.clone())),
    }
}

fn grow(value: TokenAmount, by: TokenAmount, what: &str) -> Result<TokenAmount, ApplyError> {
    value
        .checked_add(by)
        .ok_or_else(|| ApplyError::Overflow(what.to_string()))
}

fn shrink(
    pool: &PoolState,
    ticker: &Ticker,
    value: TokenAmount,
    by: TokenAmount,
) -> Result<TokenAmount, ApplyError> {
    value
        .checked_sub(by)
        .ok_or_else(|| ApplyError::Insufficient {
            ticker: ticker.clone(),
            address: pool.reserves_owner.clone(),
            available: value,
            required: by,
        })
}
