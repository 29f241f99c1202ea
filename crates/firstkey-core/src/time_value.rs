use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Monthly decimal rate from an annual percentage (6.5 -> 0.0054166...).
pub fn monthly_rate(annual_pct: Percent) -> Rate {
    annual_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// (1 + r)^n, or `None` when the factor no longer fits in a Decimal.
pub fn compound_factor(monthly_rate: Rate, n: u32) -> Option<Decimal> {
    (Decimal::ONE + monthly_rate).checked_powu(u64::from(n))
}

/// Largest representable value, returned instead of overflowing.
const DECIMAL_CAP: Decimal = Decimal::MAX;

/// Checked multiplication that caps at [`DECIMAL_CAP`] instead of panicking.
fn safe_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(DECIMAL_CAP)
}

/// Level payment that retires `principal` over `n` periods.
///
/// `P = L * r(1+r)^n / ((1+r)^n - 1)`, falling back to straight-line `L / n`
/// when the rate is zero. Zero periods yield a zero payment. The rate factor
/// is reduced before it is applied to `L`, so a `(1+r)^n` that fits never
/// overflows the product.
pub fn annuity_payment(principal: Money, monthly_rate: Rate, n: u32) -> Money {
    if n == 0 {
        return Decimal::ZERO;
    }
    let periods = Decimal::from(n);
    if monthly_rate.is_zero() {
        return principal / periods;
    }

    // Interest-only: the limit as (1+r)^n grows without bound.
    let interest_only = safe_mul(principal, monthly_rate);
    let Some(compound) = compound_factor(monthly_rate, n) else {
        return interest_only;
    };
    let denom = compound - Decimal::ONE;
    if denom.is_zero() {
        return principal / periods;
    }
    match compound
        .checked_div(denom)
        .and_then(|ratio| ratio.checked_mul(monthly_rate))
    {
        Some(factor) => safe_mul(principal, factor),
        None => interest_only,
    }
}

/// Principal supported by a level payment over `n` periods (inverse of
/// [`annuity_payment`]). Straight-line `P * n` when the rate is zero.
pub fn annuity_principal(payment: Money, monthly_rate: Rate, n: u32) -> Money {
    if n == 0 {
        return Decimal::ZERO;
    }
    let periods = Decimal::from(n);
    if monthly_rate.is_zero() {
        return safe_mul(payment, periods);
    }

    // Perpetuity: the limit as (1+r)^n grows without bound.
    let perpetuity = payment.checked_div(monthly_rate).unwrap_or(DECIMAL_CAP);
    let Some(compound) = compound_factor(monthly_rate, n) else {
        return perpetuity;
    };
    // ((1+r)^n - 1) / (r(1+r)^n) = (1 - (1+r)^-n) / r
    let discount = Decimal::ONE - Decimal::ONE / compound;
    match discount.checked_div(monthly_rate) {
        Some(factor) if !factor.is_zero() => safe_mul(payment, factor),
        Some(_) => safe_mul(payment, periods),
        None => perpetuity,
    }
}

/// Interest paid over the life of a level-payment loan.
pub fn lifetime_interest(payment: Money, n: u32, principal: Money) -> Money {
    let interest = payment * Decimal::from(n) - principal;
    if interest < Decimal::ZERO {
        Decimal::ZERO
    } else {
        interest
    }
}
