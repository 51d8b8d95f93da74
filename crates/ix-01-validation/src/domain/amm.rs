//! # Constant-Product Math
//!
//! Pure integer formulas for the pair-v1 pools. Every product is taken in
//! `U512` and every division floors, matching the reference behaviour bit
//! for bit:
//!
//! ```text
//! fee        = 3 * floor(amount_in / 100)
//! net_in     = amount_in - fee
//! amount_out = floor(net_in * reserve_out / (reserve_in + net_in))
//!
//! b_optimal  = floor(amount_a * reserve_b / reserve_a)
//! a_optimal  = floor(amount_b * reserve_a / reserve_b)
//! ```

use shared_types::numeric::{mul_div_floor, narrow, widen_mul};
use shared_types::{AmountBound, TokenAmount, U512};

/// Fee numerator applied per whole hundred of input.
pub const SWAP_FEE_PER_HUNDRED: u64 = 3;

/// `3 * floor(amount_in / 100)`
pub fn swap_fee(amount_in: TokenAmount) -> TokenAmount {
    // amount_in / 100 * 3 < amount_in, so this never overflows
    (amount_in / TokenAmount::from(100u64)) * TokenAmount::from(SWAP_FEE_PER_HUNDRED)
}

/// Result of pricing a swap against a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub fee: TokenAmount,
    pub net_in: TokenAmount,
    pub amount_out: TokenAmount,
}

/// Price a swap. `None` when the pool side being paid into is empty and the
/// net input is zero, which leaves the formula undefined.
pub fn quote_swap(
    amount_in: TokenAmount,
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
) -> Option<SwapQuote> {
    let fee = swap_fee(amount_in);
    let net_in = amount_in - fee;
    let denominator = U512::from(reserve_in) + U512::from(net_in);
    if denominator.is_zero() {
        return None;
    }
    let amount_out = widen_mul(net_in, reserve_out) / denominator;
    // net_in / (reserve_in + net_in) <= 1, so the output never exceeds reserve_out
    let amount_out = narrow(amount_out)?;
    Some(SwapQuote {
        fee,
        net_in,
        amount_out,
    })
}

/// Counter-amount that keeps the pool ratio: `floor(amount * other / this)`.
///
/// Returned wide because a tiny `reserve_this` can push it past `U256`.
/// `None` when `reserve_this` is zero.
pub fn optimal_counter_amount(
    amount: TokenAmount,
    reserve_this: TokenAmount,
    reserve_other: TokenAmount,
) -> Option<U512> {
    mul_div_floor(amount, reserve_other, reserve_this)
}

/// Which side of an add-liquidity request the optimum kept as supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddLiquidityPlan {
    /// `(amount_a, b_optimal)`
    KeepA { amount_a: TokenAmount, amount_b: U512 },
    /// `(a_optimal, amount_b)`
    KeepB { amount_a: U512, amount_b: TokenAmount },
    /// Neither optimum clears its minimum.
    Slippage { a_optimal: U512, b_optimal: U512 },
}

/// Two-sided optimal-amount search for a pool that already has liquidity.
///
/// `None` when either reserve is zero.
pub fn plan_add_liquidity(
    amount_a: TokenAmount,
    amount_b: TokenAmount,
    amount_a_min: AmountBound,
    amount_b_min: AmountBound,
    reserve_a: TokenAmount,
    reserve_b: TokenAmount,
) -> Option<AddLiquidityPlan> {
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return None;
    }
    let b_optimal = optimal_counter_amount(amount_a, reserve_a, reserve_b)?;
    if b_optimal >= amount_b_min {
        return Some(AddLiquidityPlan::KeepA {
            amount_a,
            amount_b: b_optimal,
        });
    }
    let a_optimal = optimal_counter_amount(amount_b, reserve_b, reserve_a)?;
    if a_optimal < amount_a_min {
        return Some(AddLiquidityPlan::Slippage {
            a_optimal,
            b_optimal,
        });
    }
    Some(AddLiquidityPlan::KeepB {
        amount_a: a_optimal,
        amount_b,
    })
}
