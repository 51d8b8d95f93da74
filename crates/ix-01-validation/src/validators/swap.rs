//! pair-v1 create / add / remove / swap rules.
//!
//! create, add and remove arrive with the pair already canonical. A swap
//! keeps the caller's direction and only the pool lookup is canonical.

use shared_types::{PoolState, TokenAmount, U512};

use super::{require_balance, require_positive, Shortfall};
use crate::domain::amm::{plan_add_liquidity, quote_swap, AddLiquidityPlan};
use crate::domain::{Approval, OperationKind, RejectReason, SwapOperation, ValidationError};
use crate::ports::LedgerQuery;

pub struct SwapValidator<'a, L: LedgerQuery + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerQuery + ?Sized> SwapValidator<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub fn validate(&self, op: &SwapOperation) -> Result<Approval, ValidationError> {
        if op.ticker_a == op.ticker_b {
            return Err(ValidationError::reject_with(
                RejectReason::IdenticalTickers,
                op.ticker_a.to_string(),
            ));
        }
        match op.kind {
            OperationKind::Create => self.create(op),
            OperationKind::Add => self.add(op),
            OperationKind::Remove => self.remove(op),
            OperationKind::Swap => self.swap(op),
            other => Err(ValidationError::reject_with(
                RejectReason::UnsupportedOperation,
                format!("{} is not a pair-v1 operation", other.op_name()),
            )),
        }
    }

    fn existing_pool(&self, op: &SwapOperation) -> Result<PoolState, ValidationError> {
        let key = op.pool_key();
        match self.ledger.pool_state(&key)? {
            Some(pool) => Ok(pool),
            None => Err(ValidationError::reject_with(
                RejectReason::PoolNotFound,
                key.to_string(),
            )),
        }
    }

    /// Holder balances must cover both sides of the pair.
    fn cover(
        &self,
        op: &SwapOperation,
        amount_a: U512,
        amount_b: U512,
    ) -> Result<(TokenAmount, TokenAmount), ValidationError> {
        let holder = &op.holder_address;
        let a = require_balance(self.ledger, &op.ticker_a, holder, amount_a, Shortfall::BALANCE)?;
        let b = require_balance(self.ledger, &op.ticker_b, holder, amount_b, Shortfall::BALANCE)?;
        Ok((a, b))
    }

    /// Open a new pool funded by the holder.
    pub fn create(&self, op: &SwapOperation) -> Result<Approval, ValidationError> {
        require_positive(op.amount_a, RejectReason::NonPositiveAmount, "amt0")?;
        require_positive(op.amount_b, RejectReason::NonPositiveAmount, "amt1")?;
        let key = op.pool_key();
        if self.ledger.pool_state(&key)?.is_some() {
            return Err(ValidationError::reject_with(
                RejectReason::PoolAlreadyExists,
                key.to_string(),
            ));
        }
        let (amount_a, amount_b) = self.cover(op, op.amount_a.into(), op.amount_b.into())?;

        Ok(Approval::CreatePool {
            key,
            holder: op.holder_address.clone(),
            amount_a,
            amount_b,
        })
    }

    /// Add liquidity at the pool's current ratio.
    pub fn add(&self, op: &SwapOperation) -> Result<Approval, ValidationError> {
        let pool = self.existing_pool(op)?;

        if pool.liquidity_total.is_zero() {
            let (amount_a, amount_b) = self.cover(op, op.amount_a.into(), op.amount_b.into())?;
            return Ok(Approval::AddLiquidity {
                key: pool.key,
                holder: op.holder_address.clone(),
                amount_a,
                amount_b,
                first_liquidity: true,
            });
        }

        let plan = plan_add_liquidity(
            op.amount_a,
            op.amount_b,
            op.amount_a_min,
            op.amount_b_min,
            pool.reserve_a,
            pool.reserve_b,
        )
        .ok_or_else(|| {
            ValidationError::reject_with(RejectReason::EmptyReserves, pool.key.to_string())
        })?;

        let (wanted_a, wanted_b) = match plan {
            AddLiquidityPlan::KeepA { amount_a, amount_b } => (U512::from(amount_a), amount_b),
            AddLiquidityPlan::KeepB { amount_a, amount_b } => (amount_a, U512::from(amount_b)),
            AddLiquidityPlan::Slippage {
                a_optimal,
                b_optimal,
            } => {
                return Err(ValidationError::reject_with(
                    RejectReason::SlippageExceeded,
                    format!(
                        "b_optimal {b_optimal} < {} and a_optimal {a_optimal} < {}",
                        op.amount_b_min, op.amount_a_min
                    ),
                ))
            }
        };
        let (amount_a, amount_b) = self.cover(op, wanted_a, wanted_b)?;

        Ok(Approval::AddLiquidity {
            key: pool.key,
            holder: op.holder_address.clone(),
            amount_a,
            amount_b,
            first_liquidity: false,
        })
    }

    /// Burn liquidity tokens for a share of the reserves.
    pub fn remove(&self, op: &SwapOperation) -> Result<Approval, ValidationError> {
        require_positive(
            op.liquidity_amount,
            RejectReason::NonPositiveLiquidity,
            "liquidity",
        )?;
        let pool = self.existing_pool(op)?;
        if op.liquidity_amount > pool.liquidity_total {
            return Err(ValidationError::reject_with(
                RejectReason::ExceedsPoolLiquidity,
                format!("{} > {}", op.liquidity_amount, pool.liquidity_total),
            ));
        }
        let liquidity = require_balance(
            self.ledger,
            &pool.key.lp_ticker(),
            &op.holder_address,
            op.liquidity_amount.into(),
            Shortfall::LIQUIDITY,
        )?;

        Ok(Approval::RemoveLiquidity {
            key: pool.key,
            holder: op.holder_address.clone(),
            liquidity,
        })
    }

    /// Trade `amount_a` of `ticker_a` for `ticker_b`.
    pub fn swap(&self, op: &SwapOperation) -> Result<Approval, ValidationError> {
        let pool = self.existing_pool(op)?;
        let (reserve_in, reserve_out) = pool.oriented_reserves(&op.ticker_a);
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(ValidationError::reject_with(
                RejectReason::EmptyReserves,
                pool.key.to_string(),
            ));
        }
        let quote = quote_swap(op.amount_a, reserve_in, reserve_out).ok_or_else(|| {
            ValidationError::reject_with(RejectReason::EmptyReserves, pool.key.to_string())
        })?;

        if U512::from(quote.amount_out) < op.amount_b_min {
            return Err(ValidationError::reject_with(
                RejectReason::SlippageExceeded,
                format!("amount_out {} < amt1_min {}", quote.amount_out, op.amount_b_min),
            ));
        }

        let amount_in = require_balance(
            self.ledger,
            &op.ticker_a,
            &op.holder_address,
            op.amount_a.into(),
            Shortfall::BALANCE,
        )?;
        require_balance(
            self.ledger,
            &op.ticker_b,
            &pool.reserves_owner,
            quote.amount_out.into(),
            Shortfall::RESERVES,
        )?;

        Ok(Approval::Swap {
            key: pool.key.clone(),
            holder: op.holder_address.clone(),
            ticker_in: op.ticker_a.clone(),
            ticker_out: op.ticker_b.clone(),
            amount_in,
            fee: quote.fee,
            amount_out: quote.amount_out,
            reserves_owner: pool.reserves_owner,
        })
    }
}
