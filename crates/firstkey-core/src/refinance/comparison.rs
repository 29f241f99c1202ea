//! Current loan versus a refinance.
//!
//! The current loan's balance is rebuilt by running its original schedule
//! forward for the years already paid, so only the original terms are
//! needed from the borrower.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::defaults::MortgageDefaults;
use crate::error::FirstKeyError;
use crate::formatting::round_to;
use crate::loan::LoanTerm;
use crate::time_value::{self, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FirstKeyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentLoan {
    /// Original principal.
    pub starting_balance: Money,
    pub starting_term: LoanTerm,
    pub years_elapsed: u32,
    /// Annual rate (6.5 = 6.5%).
    pub current_rate_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub rate_pct: Percent,
    pub term: LoanTerm,
    pub closing_costs: Money,
    /// Borrowed on top of the remaining balance.
    #[serde(default)]
    pub cash_out_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceComparison {
    pub current_monthly_payment: Money,
    pub new_monthly_payment: Money,
    /// Negative when the new payment is higher.
    pub monthly_savings: Money,
    pub annual_savings: Money,
    /// Closing costs divided by monthly savings. Zero means there is no
    /// break-even point, not an instant one.
    pub break_even_months: Decimal,
}

impl RefinanceComparison {
    pub fn has_break_even(&self) -> bool {
        self.break_even_months > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub current: CurrentLoan,
    pub new: NewLoan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceAnalysis {
    pub comparison: RefinanceComparison,
    pub remaining_balance: Money,
    pub remaining_term_years: Decimal,
    pub new_loan_amount: Money,
    /// Interest still owed if the current loan runs to term.
    pub total_interest_current: Money,
    /// Interest over the full new term.
    pub total_interest_new: Money,
    pub has_break_even: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Payments already made, capped at the original term.
fn payments_made(current: &CurrentLoan) -> u32 {
    current
        .years_elapsed
        .saturating_mul(MONTHS_PER_YEAR)
        .min(current.starting_term.payments())
}

/// Balance left on the current loan after `years_elapsed` years of its
/// original level payment. Zero-rate loans scale linearly.
pub fn remaining_balance(current: &CurrentLoan) -> Money {
    let total = current.starting_term.payments();
    let made = payments_made(current);
    let r = time_value::monthly_rate(current.current_rate_pct);

    if r.is_zero() {
        return current.starting_balance * Decimal::from(total - made) / Decimal::from(total);
    }

    let payment = time_value::annuity_payment(current.starting_balance, r, total);
    let mut balance = current.starting_balance;
    for _ in 0..made {
        let interest = balance * r;
        balance -= payment - interest;
    }
    balance.max(Decimal::ZERO)
}

/// Unrounded comparison with the balances it was built from.
fn evaluate(current: &CurrentLoan, new: &NewLoan) -> RefinanceAnalysis {
    let remaining_payments = current.starting_term.payments() - payments_made(current);
    let balance = remaining_balance(current);

    let current_rate = time_value::monthly_rate(current.current_rate_pct);
    let current_monthly_payment =
        time_value::annuity_payment(balance, current_rate, remaining_payments);

    let new_loan_amount = balance + new.cash_out_amount;
    let new_payments = new.term.payments();
    let new_monthly_payment = time_value::annuity_payment(
        new_loan_amount,
        time_value::monthly_rate(new.rate_pct),
        new_payments,
    );

    let monthly_savings = current_monthly_payment - new_monthly_payment;
    let break_even_months = if monthly_savings > Decimal::ZERO {
        new.closing_costs / monthly_savings
    } else {
        Decimal::ZERO
    };

    let comparison = RefinanceComparison {
        current_monthly_payment,
        new_monthly_payment,
        monthly_savings,
        annual_savings: monthly_savings * Decimal::from(MONTHS_PER_YEAR),
        break_even_months,
    };

    RefinanceAnalysis {
        has_break_even: comparison.has_break_even(),
        remaining_term_years: Decimal::from(remaining_payments) / Decimal::from(MONTHS_PER_YEAR),
        total_interest_current: time_value::lifetime_interest(
            current_monthly_payment,
            remaining_payments,
            balance,
        ),
        total_interest_new: time_value::lifetime_interest(
            new_monthly_payment,
            new_payments,
            new_loan_amount,
        ),
        remaining_balance: balance,
        new_loan_amount,
        comparison,
    }
}

/// Monthly payments, savings and break-even for refinancing `current` into `new`.
pub fn compare_refinance(current: &CurrentLoan, new: &NewLoan) -> RefinanceComparison {
    evaluate(current, new).comparison
}

impl RefinanceAnalysis {
    /// Savings and balances in whole dollars, break-even to a tenth of a
    /// month, payments and interest to the cent.
    pub fn rounded_for_display(&self) -> Self {
        let c = &self.comparison;
        RefinanceAnalysis {
            comparison: RefinanceComparison {
                current_monthly_payment: round_to(c.current_monthly_payment, 2),
                new_monthly_payment: round_to(c.new_monthly_payment, 2),
                monthly_savings: round_to(c.monthly_savings, 0),
                annual_savings: round_to(c.annual_savings, 0),
                break_even_months: round_to(c.break_even_months, 1),
            },
            remaining_balance: round_to(self.remaining_balance, 0),
            remaining_term_years: round_to(self.remaining_term_years, 1),
            new_loan_amount: round_to(self.new_loan_amount, 0),
            total_interest_current: round_to(self.total_interest_current, 2),
            total_interest_new: round_to(self.total_interest_new, 2),
            has_break_even: self.has_break_even,
        }
    }
}

impl MortgageDefaults {
    pub fn refinance_input(&self) -> RefinanceInput {
        let d = &self.refinance;
        RefinanceInput {
            current: CurrentLoan {
                starting_balance: d.starting_balance,
                starting_term: d.starting_term,
                years_elapsed: d.years_elapsed,
                current_rate_pct: d.current_rate_pct,
            },
            new: NewLoan {
                rate_pct: d.new_rate_pct,
                term: d.new_term,
                closing_costs: d.closing_costs,
                cash_out_amount: d.cash_out_amount,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

pub fn analyze_refinance(
    input: &RefinanceInput,
) -> FirstKeyResult<ComputationOutput<RefinanceAnalysis>> {
    let start = Instant::now();
    validate_refinance_input(input)?;

    let mut warnings: Vec<String> = Vec::new();
    if input.current.years_elapsed == input.current.starting_term.years() {
        warnings.push("Current loan is already at the end of its term".to_string());
    }

    let analysis = evaluate(&input.current, &input.new);
    if !analysis.has_break_even {
        warn!(
            monthly_savings = %analysis.comparison.monthly_savings,
            "refinance never breaks even"
        );
        warnings.push(
            "New payment is not lower than the current payment; closing costs are never recovered"
                .to_string(),
        );
    } else {
        debug!(
            remaining_balance = %analysis.remaining_balance,
            break_even_months = %analysis.comparison.break_even_months,
            "refinance compared"
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Remaining-balance refinance comparison with break-even",
        input,
        warnings,
        elapsed,
        analysis.rounded_for_display(),
    ))
}

fn validate_refinance_input(input: &RefinanceInput) -> FirstKeyResult<()> {
    let c = &input.current;
    let n = &input.new;
    let non_negative = [
        ("starting_balance", c.starting_balance),
        ("current_rate_pct", c.current_rate_pct),
        ("rate_pct", n.rate_pct),
        ("closing_costs", n.closing_costs),
        ("cash_out_amount", n.cash_out_amount),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(FirstKeyError::invalid(field, "Value cannot be negative"));
        }
    }
    if c.years_elapsed > c.starting_term.years() {
        return Err(FirstKeyError::InvalidInput {
            field: "years_elapsed".into(),
            reason: format!(
                "{} years elapsed exceeds the {}-year original term",
                c.years_elapsed,
                c.starting_term.years()
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn default_input() -> RefinanceInput {
        MortgageDefaults::default().refinance_input()
    }

    #[test]
    fn test_remaining_balance_after_five_years() {
        let input = default_input();
        assert_close(
            remaining_balance(&input.current),
            dec!(421249.40),
            dec!(0.01),
            "remaining balance",
        );
    }

    #[test]
    fn test_default_comparison() {
        let input = default_input();
        let c = compare_refinance(&input.current, &input.new);
        assert_close(c.current_monthly_payment, dec!(2844.31), dec!(0.01), "current");
        assert_close(c.new_monthly_payment, dec!(2662.58), dec!(0.01), "new");
        assert_close(c.monthly_savings, dec!(181.72), dec!(0.01), "savings");
        assert_close(c.annual_savings, dec!(2180.68), dec!(0.1), "annual");
        assert_close(c.break_even_months, dec!(27.51), dec!(0.01), "break-even");
    }

    #[test]
    fn test_lower_rate() {
        let mut input = default_input();
        input.new.rate_pct = dec!(5.5);
        let c = compare_refinance(&input.current, &input.new);
        assert_close(c.new_monthly_payment, dec!(2391.81), dec!(0.01), "new");
        assert_close(c.break_even_months, dec!(11.05), dec!(0.01), "break-even");
    }

    #[test]
    fn test_shorter_term_has_no_break_even() {
        let mut input = default_input();
        input.new.rate_pct = dec!(5.5);
        input.new.term = LoanTerm::Fifteen;
        let c = compare_refinance(&input.current, &input.new);
        assert_close(c.monthly_savings, dec!(-597.65), dec!(0.01), "savings");
        assert_eq!(c.break_even_months, Decimal::ZERO);
        assert!(!c.has_break_even());
    }

    #[test]
    fn test_break_even_zero_regardless_of_closing_costs() {
        let mut input = default_input();
        input.new.rate_pct = dec!(7.5);
        for costs in [Decimal::ZERO, dec!(5000), dec!(50000)] {
            input.new.closing_costs = costs;
            let c = compare_refinance(&input.current, &input.new);
            assert_eq!(c.break_even_months, Decimal::ZERO);
        }
    }

    #[test]
    fn test_zero_rate_loans() {
        let input = RefinanceInput {
            current: CurrentLoan {
                starting_balance: dec!(360000),
                starting_term: LoanTerm::Thirty,
                years_elapsed: 10,
                current_rate_pct: Decimal::ZERO,
            },
            new: NewLoan {
                rate_pct: Decimal::ZERO,
                term: LoanTerm::Thirty,
                closing_costs: dec!(5000),
                cash_out_amount: Decimal::ZERO,
            },
        };
        assert_eq!(remaining_balance(&input.current), dec!(240000));
        let c = compare_refinance(&input.current, &input.new);
        assert_eq!(c.current_monthly_payment, dec!(1000));
        assert_close(c.new_monthly_payment, dec!(666.67), dec!(0.01), "new");
        assert_close(c.break_even_months, dec!(15), dec!(0.0001), "break-even");
    }

    #[test]
    fn test_cash_out_raises_new_loan() {
        let mut input = default_input();
        input.new.cash_out_amount = dec!(25000);
        let out = analyze_refinance(&input).unwrap().result;
        assert_eq!(out.new_loan_amount, out.remaining_balance + dec!(25000));
    }

    #[test]
    fn test_fully_elapsed_loan() {
        let mut input = default_input();
        input.current.years_elapsed = 30;
        let c = compare_refinance(&input.current, &input.new);
        assert_eq!(c.current_monthly_payment, Decimal::ZERO);
        assert!(!c.has_break_even());
    }

    #[test]
    fn test_analyze_rounds_for_display() {
        let out = analyze_refinance(&default_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.remaining_balance, dec!(421249));
        assert_eq!(r.remaining_term_years, dec!(25));
        assert_eq!(r.comparison.monthly_savings, dec!(182));
        assert_eq!(r.comparison.annual_savings, dec!(2181));
        assert_eq!(r.comparison.break_even_months, dec!(27.5));
        assert_close(r.total_interest_current, dec!(432042.43), dec!(0.05), "current interest");
        assert_close(r.total_interest_new, dec!(537280.39), dec!(0.05), "new interest");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_analyze_warns_without_break_even() {
        let mut input = default_input();
        input.new.rate_pct = dec!(7.5);
        let out = analyze_refinance(&input).unwrap();
        assert!(!out.result.has_break_even);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_analyze_rejects_elapsed_beyond_term() {
        let mut input = default_input();
        input.current.starting_term = LoanTerm::Fifteen;
        input.current.years_elapsed = 16;
        assert!(analyze_refinance(&input).is_err());
    }
}
