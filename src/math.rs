// 2.0 math.rs: overflow-checked price math for the TWAP accumulator unit.
// every operation that could overflow or divide by zero returns a MathError
// instead of panicking. TWAP results truncate toward zero at PRICE_SCALE
// decimal places, matching the flooring behavior of integer AMM oracles.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

// decimal places carried by derived prices. token amounts are 18-decimal
// assets at most, so 18 places loses nothing the source arithmetic had.
pub const PRICE_SCALE: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("square root of negative value")]
    NegativeSqrt,
}

pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    a.checked_sub(b).ok_or(MathError::Overflow)
}

pub fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

pub fn checked_div(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    a.checked_div(b).ok_or(MathError::Overflow)
}

// truncating division: round the quotient toward zero at PRICE_SCALE places.
pub fn div_truncate(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    let q = checked_div(a, b)?;
    Ok(q.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::ToZero))
}

pub fn sqrt(value: Decimal) -> Result<Decimal, MathError> {
    if value.is_sign_negative() {
        return Err(MathError::NegativeSqrt);
    }
    value.sqrt().ok_or(MathError::Overflow)
}

// 2.1: time-weighted average from two accumulator readings.
// avg = (cum_later - cum_earlier) / elapsed, truncated.
pub fn time_weighted_average(
    cum_earlier: Decimal,
    cum_later: Decimal,
    elapsed_secs: Decimal,
) -> Result<Decimal, MathError> {
    let delta = checked_sub(cum_later, cum_earlier)?;
    div_truncate(delta, elapsed_secs)
}
