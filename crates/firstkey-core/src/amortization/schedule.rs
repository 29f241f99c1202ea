//! Month-by-month amortization with optional extra principal and early payoff.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FirstKeyError;
use crate::loan::LoanTerm;
use crate::time_value::{self, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FirstKeyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based payment number.
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Balance after this payment, never below zero.
    pub balance: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub schedule: Vec<AmortizationRow>,
    pub total_interest: Money,
    /// Month in which the balance reached zero, or the last month iterated
    /// when the term ran out first.
    pub payoff_month: u32,
}

/// Calendar-year roll-up of the monthly rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub loan_amount: Money,
    /// Annual interest rate (6.5 = 6.5%).
    pub interest_rate_pct: Percent,
    pub loan_term: LoanTerm,
    #[serde(default)]
    pub extra_monthly_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationAnalysis {
    pub monthly_rate: Rate,
    pub number_of_payments: u32,
    pub principal_and_interest: Money,
    pub extra_monthly_payment: Money,
    pub schedule: AmortizationResult,
    pub baseline_total_interest: Money,
    pub baseline_payoff_month: u32,
    pub interest_saved: Money,
    pub months_saved: i64,
    pub yearly_summary: Vec<AmortizationYear>,
    #[serde(skip)]
    pub baseline: AmortizationResult,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Run the schedule for up to `number_of_payments` months.
///
/// Each month accrues `balance * monthly_rate`; everything else in
/// `base_payment + extra_payment` reduces principal, capped at the balance.
/// Iteration stops the month the balance reaches zero. A zero rate needs no
/// special handling here as long as the caller passes a straight-line
/// `base_payment`.
pub fn amortize(
    loan_amount: Money,
    monthly_rate: Rate,
    number_of_payments: u32,
    base_payment: Money,
    extra_payment: Money,
) -> AmortizationResult {
    if loan_amount <= Decimal::ZERO {
        return AmortizationResult::default();
    }

    let mut balance = loan_amount;
    let mut schedule = Vec::with_capacity(number_of_payments as usize);
    let mut total_interest = Decimal::ZERO;
    let mut payoff_month = 0;

    for month in 1..=number_of_payments {
        let interest = balance * monthly_rate;
        let mut principal = base_payment - interest + extra_payment;
        if principal > balance {
            principal = balance;
        }
        balance -= principal;

        let interest_paid = interest.max(Decimal::ZERO);
        total_interest += interest_paid;
        schedule.push(AmortizationRow {
            month,
            payment: base_payment + extra_payment,
            principal: principal.max(Decimal::ZERO),
            interest: interest_paid,
            balance: balance.max(Decimal::ZERO),
        });

        payoff_month = month;
        if balance <= Decimal::ZERO {
            break;
        }
    }

    AmortizationResult {
        schedule,
        total_interest,
        payoff_month,
    }
}

/// Aggregate monthly rows into 12-month years.
pub fn yearly_summary(schedule: &[AmortizationRow]) -> Vec<AmortizationYear> {
    schedule
        .chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(idx, rows)| AmortizationYear {
            year: idx as u32 + 1,
            principal_paid: rows.iter().map(|r| r.principal).sum(),
            interest_paid: rows.iter().map(|r| r.interest).sum(),
            ending_balance: rows.last().map(|r| r.balance).unwrap_or_default(),
        })
        .collect()
}

/// Schedule with the extra payment alongside the no-extra baseline.
pub fn amortization_analysis(
    loan_amount: Money,
    interest_rate_pct: Percent,
    loan_term: LoanTerm,
    extra_monthly_payment: Money,
) -> AmortizationAnalysis {
    let monthly_rate = time_value::monthly_rate(interest_rate_pct);
    let n = loan_term.payments();
    let principal_and_interest = time_value::annuity_payment(loan_amount, monthly_rate, n);

    let schedule = amortize(
        loan_amount,
        monthly_rate,
        n,
        principal_and_interest,
        extra_monthly_payment,
    );
    let baseline = amortize(
        loan_amount,
        monthly_rate,
        n,
        principal_and_interest,
        Decimal::ZERO,
    );

    AmortizationAnalysis {
        monthly_rate,
        number_of_payments: n,
        principal_and_interest,
        extra_monthly_payment,
        yearly_summary: yearly_summary(&schedule.schedule),
        baseline_total_interest: baseline.total_interest,
        baseline_payoff_month: baseline.payoff_month,
        interest_saved: baseline.total_interest - schedule.total_interest,
        months_saved: i64::from(baseline.payoff_month) - i64::from(schedule.payoff_month),
        schedule,
        baseline,
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Level-payment schedule for a loan, with and without the extra payment.
pub fn analyze_amortization(
    input: &AmortizationInput,
) -> FirstKeyResult<ComputationOutput<AmortizationAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate_amortization_input(input)?;

    if input.loan_amount.is_zero() {
        warnings.push("Loan amount is zero; there is nothing to amortize".into());
    }

    let output = amortization_analysis(
        input.loan_amount,
        input.interest_rate_pct,
        input.loan_term,
        input.extra_monthly_payment,
    );
    let first_interest = input.loan_amount * output.monthly_rate;
    if input.loan_amount > Decimal::ZERO && output.principal_and_interest <= first_interest {
        warnings.push(
            "Payment does not cover the first month's interest; the balance will not amortize"
                .into(),
        );
    }

    debug!(
        loan_amount = %input.loan_amount,
        payoff_month = output.schedule.payoff_month,
        total_interest = %output.schedule.total_interest,
        "amortization schedule built"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortization with extra principal",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_amortization_input(input: &AmortizationInput) -> FirstKeyResult<()> {
    if input.loan_amount < Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "loan_amount",
            "Loan amount cannot be negative",
        ));
    }
    if input.interest_rate_pct < Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "interest_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    if input.extra_monthly_payment < Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "extra_monthly_payment",
            "Extra payment cannot be negative",
        ));
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

    fn standard_loan() -> (Money, Rate, u32, Money) {
        let r = time_value::monthly_rate(dec!(6.5));
        let p = time_value::annuity_payment(dec!(264000), r, 360);
        (dec!(264000), r, 360, p)
    }

    #[test]
    fn test_full_term_schedule() {
        let (l, r, n, p) = standard_loan();
        let out = amortize(l, r, n, p, Decimal::ZERO);
        assert_eq!(out.schedule.len(), 360);
        assert_eq!(out.payoff_month, 360);
        assert_close(out.total_interest, dec!(336717.45), dec!(0.05), "total interest");
        assert_close(out.schedule[359].balance, Decimal::ZERO, dec!(0.000001), "final balance");
    }

    #[test]
    fn test_first_row_split() {
        let (l, r, n, p) = standard_loan();
        let out = amortize(l, r, n, p, Decimal::ZERO);
        let first = &out.schedule[0];
        assert_eq!(first.month, 1);
        assert_close(first.interest, dec!(1430.00), dec!(0.01), "month 1 interest");
        assert_close(first.principal, dec!(238.66), dec!(0.01), "month 1 principal");
        assert_close(
            first.principal + first.interest,
            first.payment,
            dec!(0.000000000001),
            "principal + interest",
        );
    }

    #[test]
    fn test_principal_sums_to_loan() {
        let (l, r, n, p) = standard_loan();
        let out = amortize(l, r, n, p, dec!(150));
        let principal: Decimal = out.schedule.iter().map(|row| row.principal).sum();
        assert_close(principal, l, dec!(0.0001), "principal conservation");
    }

    #[test]
    fn test_balance_strictly_decreasing() {
        let (l, r, n, p) = standard_loan();
        let out = amortize(l, r, n, p, Decimal::ZERO);
        for pair in out.schedule.windows(2) {
            assert!(
                pair[1].balance < pair[0].balance,
                "balance rose at month {}",
                pair[1].month
            );
        }
    }

    #[test]
    fn test_extra_payment_pays_off_early() {
        let (l, r, n, p) = standard_loan();
        let base = amortize(l, r, n, p, Decimal::ZERO);
        let extra = amortize(l, r, n, p, dec!(200));
        assert_eq!(extra.payoff_month, 269);
        assert_eq!(extra.schedule.len(), 269);
        assert!(extra.total_interest < base.total_interest);
        assert_eq!(extra.schedule.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_final_row_principal_clamped() {
        let (l, r, n, p) = standard_loan();
        let out = amortize(l, r, n, p, dec!(200));
        let last = out.schedule.last().unwrap();
        assert!(last.principal + last.interest < last.payment);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let out = amortize(dec!(120000), Decimal::ZERO, 240, dec!(500), Decimal::ZERO);
        assert_eq!(out.schedule.len(), 240);
        assert_eq!(out.payoff_month, 240);
        assert_eq!(out.total_interest, Decimal::ZERO);
        assert!(out.schedule.iter().all(|row| row.principal == dec!(500)));
        let principal: Decimal = out.schedule.iter().map(|row| row.principal).sum();
        assert_eq!(principal, dec!(120000));
    }

    #[test]
    fn test_zero_loan_amount_is_empty() {
        let out = amortize(Decimal::ZERO, dec!(0.005), 360, dec!(1000), Decimal::ZERO);
        assert!(out.schedule.is_empty());
        assert_eq!(out.payoff_month, 0);
        assert_eq!(out.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_zero_payments_is_empty() {
        let out = amortize(dec!(100000), dec!(0.005), 0, dec!(1000), Decimal::ZERO);
        assert!(out.schedule.is_empty());
        assert_eq!(out.payoff_month, 0);
    }

    #[test]
    fn test_payment_below_interest_never_negative() {
        // 100k at 1%/month accrues 1,000; a 500 payment cannot keep up.
        let out = amortize(dec!(100000), dec!(0.01), 12, dec!(500), Decimal::ZERO);
        assert_eq!(out.payoff_month, 12);
        assert!(out.schedule.iter().all(|row| row.principal == Decimal::ZERO));
        assert!(out.schedule[11].balance > dec!(100000));
    }

    #[test]
    fn test_yearly_summary() {
        let (l, r, n, p) = standard_loan();
        let out = amortize(l, r, n, p, Decimal::ZERO);
        let years = yearly_summary(&out.schedule);
        assert_eq!(years.len(), 30);
        assert_close(years[0].principal_paid, dec!(2950.80), dec!(0.01), "year 1 principal");
        assert_close(years[0].interest_paid, dec!(17073.12), dec!(0.01), "year 1 interest");
        assert_close(years[0].ending_balance, dec!(261049.20), dec!(0.01), "year 1 balance");
    }

    #[test]
    fn test_yearly_summary_partial_year() {
        let (l, r, n, p) = standard_loan();
        let out = amortize(l, r, n, p, dec!(200));
        let years = yearly_summary(&out.schedule);
        // 269 months = 22 full years + 5 months
        assert_eq!(years.len(), 23);
        assert_eq!(years[22].ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_analyze_amortization_savings() {
        let input = AmortizationInput {
            loan_amount: dec!(264000),
            interest_rate_pct: dec!(6.5),
            loan_term: LoanTerm::Thirty,
            extra_monthly_payment: dec!(200),
        };
        let out = analyze_amortization(&input).unwrap().result;
        assert_eq!(out.number_of_payments, 360);
        assert_eq!(out.baseline_payoff_month, 360);
        assert_eq!(out.months_saved, 91);
        assert_close(out.interest_saved, dec!(99395.49), dec!(0.05), "interest saved");
    }

    #[test]
    fn test_analyze_amortization_rejects_negative_rate() {
        let input = AmortizationInput {
            loan_amount: dec!(264000),
            interest_rate_pct: dec!(-1),
            loan_term: LoanTerm::Thirty,
            extra_monthly_payment: Decimal::ZERO,
        };
        assert!(analyze_amortization(&input).is_err());
    }

    #[test]
    fn test_analyze_amortization_zero_loan_warns() {
        let input = AmortizationInput {
            loan_amount: Decimal::ZERO,
            interest_rate_pct: dec!(6.5),
            loan_term: LoanTerm::Fifteen,
            extra_monthly_payment: Decimal::ZERO,
        };
        let out = analyze_amortization(&input).unwrap();
        assert!(out.result.schedule.schedule.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_analyze_amortization_extreme_rate() {
        // (1+r)^n fits, the payment sits a hair above interest-only.
        let input = AmortizationInput {
            loan_amount: dec!(1000000),
            interest_rate_pct: dec!(200),
            loan_term: LoanTerm::Thirty,
            extra_monthly_payment: Decimal::ZERO,
        };
        let out = analyze_amortization(&input).unwrap().result;
        assert_close(
            out.principal_and_interest,
            dec!(1000000) * out.monthly_rate,
            dec!(0.01),
            "near interest-only",
        );
        assert_eq!(out.schedule.payoff_month, 360);
    }

    #[test]
    fn test_payment_not_covering_interest_warns() {
        // (1+r)^n overflows: payment falls back to interest-only.
        let input = AmortizationInput {
            loan_amount: dec!(1000000),
            interest_rate_pct: dec!(1000),
            loan_term: LoanTerm::Thirty,
            extra_monthly_payment: Decimal::ZERO,
        };
        let out = analyze_amortization(&input).unwrap();
        assert_eq!(
            out.result.principal_and_interest,
            dec!(1000000) * out.result.monthly_rate
        );
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("does not cover the first month's interest")));
        assert_eq!(out.result.schedule.schedule[359].balance, dec!(1000000));
    }
}
