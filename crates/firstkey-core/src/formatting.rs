//! Display helpers shared by every calculator screen: currency, percentages,
//! tax rates, thousands-separated integers and the inverse parse.
//!
//! Rounding is half away from zero, matching how the front ends round
//! whole-dollar amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::types::{Money, Percent};

/// Round to `dp` decimal places, half away from zero.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1,668` style: US dollars, no cents, leading `-` for credits.
pub fn format_currency(amount: Money) -> String {
    let rounded = round_to(amount, 0);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", group_thousands(&rounded.abs().to_string()))
    } else {
        format!("${}", group_thousands(&rounded.abs().to_string()))
    }
}

/// Two decimals with a percent sign: `36.92%`.
pub fn format_percentage(value: Percent) -> String {
    format!("{:.2}%", round_to(value, 2))
}

/// Four decimals with a percent sign, used for closing-cost ratios.
pub fn format_percentage_precise(value: Percent) -> String {
    format!("{:.4}%", round_to(value, 4))
}

/// Tax rate with at most five decimals and no trailing zeros: `0.50078`.
pub fn format_tax_rate(value: Percent) -> String {
    let fixed = format!("{:.5}", round_to(value, 5));
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Whole number with thousands separators: `330,000`.
pub fn format_number(value: Decimal) -> String {
    let rounded = round_to(value, 0);
    let digits = group_thousands(&rounded.abs().to_string());
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Inverse of [`format_number`]. Commas are ignored and blank input reads
/// as zero; anything else that is not a number yields `None`.
pub fn parse_formatted_number(formatted: &str) -> Option<Decimal> {
    let cleaned: String = formatted.chars().filter(|c| *c != ',').collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed).ok()
}

fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) if !f.is_empty() => format!("{grouped}.{f}"),
        _ => grouped,
    }
}
