//! # Numeric & Canonicalization Layer
//!
//! The single place where decimal strings become integers and where token
//! pairs get their canonical order. Amount parsing is the only fallible
//! conversion; everything else here is total.
//!
//! Products of two ledger quantities are formed in `U512` and divided back
//! down, so no rule that multiplies two `U256` values can overflow.

use crate::entities::{AmountBound, Ticker, TokenAmount, DEFAULT_DECIMALS, U256, U512};
use crate::errors::NumericError;

/// Upper bound for `max` and `lim`: `16^64 - 1`.
pub const MAX_AMOUNT: TokenAmount = U256::MAX;

/// Digits of a base-10 unsigned integer, with an optional leading `+`.
///
/// `None` for empty input, which every caller reads as zero.
fn decimal_digits(raw: &str) -> Result<Option<&str>, NumericError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::InvalidAmount(raw.to_string()));
    }
    Ok(Some(digits))
}

/// Parse a decimal-string amount.
///
/// Empty input is zero. Anything but ASCII digits after an optional `+`
/// is `InvalidAmount`; digits above the ceiling are `AmountOverflow`.
pub fn parse_amount(raw: &str) -> Result<TokenAmount, NumericError> {
    match decimal_digits(raw)? {
        None => Ok(TokenAmount::zero()),
        Some(digits) => U256::from_dec_str(digits)
            .map_err(|_| NumericError::AmountOverflow(raw.to_string())),
    }
}

/// Parse a minimum. Same syntax as [`parse_amount`] but never overflows:
/// anything past `U512::MAX` saturates, which no ledger quantity reaches.
pub fn parse_bound(raw: &str) -> Result<AmountBound, NumericError> {
    match decimal_digits(raw)? {
        None => Ok(AmountBound::zero()),
        Some(digits) => Ok(U512::from_dec_str(digits).unwrap_or(U512::MAX)),
    }
}

/// Parse the `dec` field. Absent or empty yields zero, which the caller
/// maps through [`apply_default_decimals`].
pub fn parse_decimals(raw: Option<&str>) -> Result<u8, NumericError> {
    match raw {
        None | Some("") => Ok(0),
        Some(s) => s
            .parse::<u8>()
            .map_err(|_| NumericError::InvalidDecimals(s.to_string())),
    }
}

/// `dec == 0 ? 8 : dec`
pub fn apply_default_decimals(decimals: u8) -> u8 {
    if decimals == 0 {
        DEFAULT_DECIMALS
    } else {
        decimals
    }
}

/// A token pair with its paired values in canonical order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedPair {
    pub ticker_a: Ticker,
    pub ticker_b: Ticker,
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
    pub amount_a_min: AmountBound,
    pub amount_b_min: AmountBound,
}

/// Canonically order a pair together with amounts and minimums.
///
/// When `ticker_a > ticker_b` all three paired values are swapped together;
/// otherwise the input is returned unchanged.
pub fn sort_token_pair(
    ticker_a: Ticker,
    ticker_b: Ticker,
    amount_a: TokenAmount,
    amount_b: TokenAmount,
    amount_a_min: AmountBound,
    amount_b_min: AmountBound,
) -> SortedPair {
    if ticker_a > ticker_b {
        SortedPair {
            ticker_a: ticker_b,
            ticker_b: ticker_a,
            amount_a: amount_b,
            amount_b: amount_a,
            amount_a_min: amount_b_min,
            amount_b_min: amount_a_min,
        }
    } else {
        SortedPair {
            ticker_a,
            ticker_b,
            amount_a,
            amount_b,
            amount_a_min,
            amount_b_min,
        }
    }
}

/// `a * b` without overflow.
pub fn widen_mul(a: TokenAmount, b: TokenAmount) -> U512 {
    a.full_mul(b)
}

/// `floor(a * b / c)`, or `None` when `c` is zero.
pub fn mul_div_floor(a: TokenAmount, b: TokenAmount, c: TokenAmount) -> Option<U512> {
    if c.is_zero() {
        return None;
    }
    Some(widen_mul(a, b) / U512::from(c))
}

/// Narrow a wide intermediate back to a ledger quantity.
pub fn narrow(value: U512) -> Option<TokenAmount> {
    TokenAmount::try_from(value).ok()
}

/// `floor(sqrt(a * b))`, the geometric mean used to size first liquidity.
pub fn sqrt_product(a: TokenAmount, b: TokenAmount) -> TokenAmount {
    let root = widen_mul(a, b).integer_sqrt();
    // sqrt of a product of two U256 values always fits in U256
    narrow(root).unwrap_or(MAX_AMOUNT)
}

/// Serde adapter that writes amounts as decimal strings.
///
/// Arbitrary-size integers never travel as native JSON numbers.
pub mod serde_decimal {
    use super::{parse_amount, TokenAmount};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TokenAmount, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TokenAmount, D::Error> {
        let raw = String::deserialize(d)?;
        parse_amount(&raw).map_err(serde::de::Error::custom)
    }
}
