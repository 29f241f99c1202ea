//! Pre-qualification: back-solve the largest home price an income supports.
//!
//! The estimate is a single pass. A seed P&I of 70% of the housing budget
//! sizes a provisional loan and price (5% down), taxes, insurance and PMI are
//! priced once at that provisional price, and whatever is left of the budget
//! is inverted into the maximum loan. The provisional price is never fed back
//! for a second round, so the result is an approximation and repeated calls
//! with the output price will not reproduce it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::FirstKeyError;
use crate::formatting::round_to;
use crate::loan::LoanTerm;
use crate::time_value::{self, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FirstKeyResult;

/// Back-end DTI ceiling used to size the housing budget.
pub const MAX_BACK_END_DTI: Decimal = dec!(0.45);
/// Share of the housing budget assumed to go to P&I in the seed estimate.
pub const SEED_PI_SHARE: Decimal = dec!(0.70);
/// Assumed down payment as a fraction of price.
pub const ASSUMED_DOWN_PAYMENT: Decimal = dec!(0.05);
/// Annual PMI as a fraction of the loan. Always charged since 5% down is
/// under the 20% threshold.
pub const ASSUMED_PMI_RATE: Decimal = dec!(0.005);

const DEBT_EXCEEDS_CEILING: &str =
    "Your existing debt payments exceed the maximum allowed debt-to-income ratio.";
const NO_FUNDS_FOR_PI: &str =
    "After accounting for estimated taxes, insurance, and other costs, no funds remain for principal and interest.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    #[default]
    Low,
}

impl ConfidenceTier {
    /// `high` inside conventional limits (36/28), `medium` inside FHA-style
    /// limits (45/31), `low` otherwise. Bounds are inclusive.
    pub fn classify(back_end_dti: Percent, front_end_dti: Percent) -> Self {
        // Six places keeps Decimal division noise off the boundaries.
        let back = back_end_dti.round_dp(6);
        let front = front_end_dti.round_dp(6);
        if back <= dec!(36) && front <= dec!(28) {
            ConfidenceTier::High
        } else if back <= dec!(45) && front <= dec!(31) {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            ConfidenceTier::High => "Your DTI ratios are well within conventional loan guidelines.",
            ConfidenceTier::Medium => {
                "Your DTI ratios are within FHA guidelines but may need compensating factors for conventional loans."
            }
            ConfidenceTier::Low => {
                "Your DTI ratios exceed standard guidelines. Consider reducing debt or increasing income."
            }
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        })
    }
}

/// Infeasible estimates carry zeros and a `reason`. Feasible ones carry a
/// `confidence_reason` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreQualificationResult {
    pub max_home_price: Money,
    pub max_loan_amount: Money,
    pub confidence: ConfidenceTier,
    pub confidence_reason: Option<String>,
    pub reason: Option<String>,
    pub actual_front_end_dti: Percent,
    pub actual_back_end_dti: Percent,
    /// Full housing payment at the maximum loan (P&I, taxes, insurance, PMI, HOA).
    pub estimated_monthly_payment: Money,
    pub estimated_down_payment: Money,
    pub principal_and_interest: Money,
    pub monthly_taxes: Money,
    pub monthly_insurance: Money,
    pub monthly_pmi: Money,
}

impl PreQualificationResult {
    fn infeasible(reason: Option<&str>) -> Self {
        PreQualificationResult {
            reason: reason.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.max_home_price > Decimal::ZERO
    }

    /// Whole dollars for amounts, one decimal for ratios.
    pub fn rounded_for_display(&self) -> Self {
        PreQualificationResult {
            max_home_price: round_to(self.max_home_price, 0),
            max_loan_amount: round_to(self.max_loan_amount, 0),
            actual_front_end_dti: round_to(self.actual_front_end_dti, 1),
            actual_back_end_dti: round_to(self.actual_back_end_dti, 1),
            estimated_monthly_payment: round_to(self.estimated_monthly_payment, 0),
            estimated_down_payment: round_to(self.estimated_down_payment, 0),
            principal_and_interest: round_to(self.principal_and_interest, 0),
            monthly_taxes: round_to(self.monthly_taxes, 0),
            monthly_insurance: round_to(self.monthly_insurance, 0),
            monthly_pmi: round_to(self.monthly_pmi, 0),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreQualificationInput {
    pub monthly_income: Money,
    pub other_monthly_debts: Money,
    /// Annual interest rate (6.5 = 6.5%).
    pub interest_rate_pct: Percent,
    pub loan_term: LoanTerm,
    /// Combined property-tax levy, applied to the full price.
    pub total_tax_rate_pct: Percent,
    pub insurance_rate_pct: Percent,
    #[serde(default)]
    pub hoa_monthly: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One-pass maximum home price for a monthly income and existing debts.
pub fn estimate_pre_qualification(
    monthly_income: Money,
    other_monthly_debts: Money,
    interest_rate_pct: Percent,
    loan_term: LoanTerm,
    total_tax_rate_pct: Percent,
    insurance_rate_pct: Percent,
    hoa_monthly: Money,
) -> PreQualificationResult {
    if monthly_income <= Decimal::ZERO {
        return PreQualificationResult::infeasible(None);
    }

    let max_total_debt = monthly_income * MAX_BACK_END_DTI;
    let max_housing_payment = max_total_debt - other_monthly_debts;
    if max_housing_payment <= Decimal::ZERO {
        return PreQualificationResult::infeasible(Some(DEBT_EXCEEDS_CEILING));
    }

    let months = Decimal::from(MONTHS_PER_YEAR);
    let r = time_value::monthly_rate(interest_rate_pct);
    let n = loan_term.payments();
    let financed_share = Decimal::ONE - ASSUMED_DOWN_PAYMENT;

    // Seed pass: provisional loan and price.
    let seed_pi = max_housing_payment * SEED_PI_SHARE;
    let seed_loan = time_value::annuity_principal(seed_pi, r, n);
    let seed_price = seed_loan / financed_share;

    let monthly_taxes = seed_price * total_tax_rate_pct / dec!(100) / months;
    let monthly_insurance = seed_price * insurance_rate_pct / dec!(100) / months;
    let monthly_pmi = seed_loan * ASSUMED_PMI_RATE / months;

    let principal_and_interest =
        max_housing_payment - monthly_taxes - monthly_insurance - monthly_pmi - hoa_monthly;
    if principal_and_interest <= Decimal::ZERO {
        return PreQualificationResult::infeasible(Some(NO_FUNDS_FOR_PI));
    }

    let max_loan_amount = time_value::annuity_principal(principal_and_interest, r, n);
    let max_home_price = max_loan_amount / financed_share;

    let housing_payment =
        principal_and_interest + monthly_taxes + monthly_insurance + monthly_pmi + hoa_monthly;
    let actual_back_end_dti = (housing_payment + other_monthly_debts) / monthly_income * dec!(100);
    let actual_front_end_dti = housing_payment / monthly_income * dec!(100);
    let confidence = ConfidenceTier::classify(actual_back_end_dti, actual_front_end_dti);

    PreQualificationResult {
        max_home_price,
        max_loan_amount,
        confidence,
        confidence_reason: Some(confidence.explanation().to_string()),
        reason: None,
        actual_front_end_dti,
        actual_back_end_dti,
        estimated_monthly_payment: housing_payment,
        estimated_down_payment: max_home_price * ASSUMED_DOWN_PAYMENT,
        principal_and_interest,
        monthly_taxes,
        monthly_insurance,
        monthly_pmi,
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

pub fn analyze_pre_qualification(
    input: &PreQualificationInput,
) -> FirstKeyResult<ComputationOutput<PreQualificationResult>> {
    let start = Instant::now();
    validate_pre_qualification_input(input)?;

    let mut warnings: Vec<String> = vec![
        "Single-pass estimate assuming 5% down and a 45% back-end DTI ceiling".to_string(),
    ];

    let result = estimate_pre_qualification(
        input.monthly_income,
        input.other_monthly_debts,
        input.interest_rate_pct,
        input.loan_term,
        input.total_tax_rate_pct,
        input.insurance_rate_pct,
        input.hoa_monthly,
    );

    if result.is_feasible() {
        debug!(
            max_home_price = %result.max_home_price,
            confidence = %result.confidence,
            "pre-qualification estimated"
        );
    } else {
        let reason = result
            .reason
            .clone()
            .unwrap_or_else(|| "Monthly income is zero".to_string());
        warn!(income = %input.monthly_income, reason = %reason, "pre-qualification infeasible");
        warnings.push(reason);
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Back-solved maximum home price from DTI ceiling",
        input,
        warnings,
        elapsed,
        result.rounded_for_display(),
    ))
}

fn validate_pre_qualification_input(input: &PreQualificationInput) -> FirstKeyResult<()> {
    let non_negative = [
        ("other_monthly_debts", input.other_monthly_debts),
        ("interest_rate_pct", input.interest_rate_pct),
        ("total_tax_rate_pct", input.total_tax_rate_pct),
        ("insurance_rate_pct", input.insurance_rate_pct),
        ("hoa_monthly", input.hoa_monthly),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(FirstKeyError::invalid(field, "Value cannot be negative"));
        }
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

    const TAX: Decimal = dec!(2.13248);

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

    fn estimate(
        income: Decimal,
        debts: Decimal,
        rate: Decimal,
        hoa: Decimal,
    ) -> PreQualificationResult {
        estimate_pre_qualification(income, debts, rate, LoanTerm::Thirty, TAX, dec!(0.5), hoa)
    }

    #[test]
    fn test_default_scenario() {
        let r = estimate(dec!(6500), dec!(500), dec!(6.5), Decimal::ZERO);
        assert_close(r.monthly_taxes, dec!(502.37), dec!(0.01), "taxes");
        assert_close(r.monthly_insurance, dec!(117.79), dec!(0.01), "insurance");
        assert_close(r.monthly_pmi, dec!(111.90), dec!(0.01), "pmi");
        assert_close(r.principal_and_interest, dec!(1692.94), dec!(0.01), "P&I");
        assert_close(r.max_loan_amount, dec!(267840.68), dec!(0.05), "max loan");
        assert_close(r.max_home_price, dec!(281937.56), dec!(0.05), "max price");
        assert_close(r.estimated_monthly_payment, dec!(2425), dec!(0.0001), "housing");
        assert_close(r.actual_front_end_dti, dec!(37.31), dec!(0.01), "front-end");
        assert_close(r.actual_back_end_dti, dec!(45), dec!(0.0001), "back-end");
        assert_eq!(r.confidence, ConfidenceTier::Low);
        assert!(r.reason.is_none());
    }

    #[test]
    fn test_back_end_always_at_ceiling_when_feasible() {
        // Housing payment is the whole budget, so back-end lands on 45%.
        for (income, debts) in [(dec!(5000), dec!(0)), (dec!(12000), dec!(2500))] {
            let r = estimate(income, debts, dec!(7), dec!(150));
            assert_close(r.actual_back_end_dti, dec!(45), dec!(0.0001), "back-end");
        }
    }

    #[test]
    fn test_medium_tier() {
        let r = estimate(dec!(10000), dec!(1500), dec!(6.5), Decimal::ZERO);
        assert_close(r.actual_front_end_dti, dec!(30), dec!(0.0001), "front-end");
        assert_eq!(r.confidence, ConfidenceTier::Medium);
        assert_eq!(
            r.confidence_reason.as_deref(),
            Some(ConfidenceTier::Medium.explanation())
        );
    }

    #[test]
    fn test_confidence_classifier() {
        assert_eq!(ConfidenceTier::classify(dec!(36), dec!(28)), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::classify(dec!(36), dec!(28.1)), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::classify(dec!(45), dec!(31)), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::classify(dec!(45.1), dec!(20)), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::classify(dec!(40), dec!(31.5)), ConfidenceTier::Low);
    }

    #[test]
    fn test_zero_income() {
        let r = estimate(Decimal::ZERO, dec!(500), dec!(6.5), Decimal::ZERO);
        assert_eq!(r.max_home_price, Decimal::ZERO);
        assert_eq!(r.confidence, ConfidenceTier::Low);
        assert!(r.reason.is_none());
    }

    #[test]
    fn test_debt_exceeds_ceiling() {
        let r = estimate(dec!(3000), dec!(3000), dec!(6.5), Decimal::ZERO);
        assert_eq!(r.max_home_price, Decimal::ZERO);
        assert_eq!(r.max_loan_amount, Decimal::ZERO);
        assert_eq!(r.reason.as_deref(), Some(DEBT_EXCEEDS_CEILING));
    }

    #[test]
    fn test_hoa_consumes_budget() {
        let r = estimate(dec!(2000), Decimal::ZERO, dec!(6.5), dec!(1000));
        assert_eq!(r.max_home_price, Decimal::ZERO);
        assert_eq!(r.reason.as_deref(), Some(NO_FUNDS_FOR_PI));
    }

    #[test]
    fn test_zero_rate_uses_straight_line() {
        let r = estimate(dec!(6500), dec!(500), Decimal::ZERO, Decimal::ZERO);
        assert_close(r.max_loan_amount, dec!(273321.78), dec!(0.05), "max loan");
        assert_close(r.max_home_price, dec!(287707.14), dec!(0.05), "max price");
    }

    #[test]
    fn test_analyze_rounds_for_display() {
        let input = PreQualificationInput {
            monthly_income: dec!(6500),
            other_monthly_debts: dec!(500),
            interest_rate_pct: dec!(6.5),
            loan_term: LoanTerm::Thirty,
            total_tax_rate_pct: TAX,
            insurance_rate_pct: dec!(0.5),
            hoa_monthly: Decimal::ZERO,
        };
        let out = analyze_pre_qualification(&input).unwrap().result;
        assert_eq!(out.max_home_price, dec!(281938));
        assert_eq!(out.max_loan_amount, dec!(267841));
        assert_eq!(out.actual_front_end_dti, dec!(37.3));
        assert_eq!(out.actual_back_end_dti, dec!(45.0));
        assert_eq!(out.estimated_monthly_payment, dec!(2425));
        assert_eq!(out.estimated_down_payment, dec!(14097));
    }

    #[test]
    fn test_analyze_infeasible_warns() {
        let input = PreQualificationInput {
            monthly_income: dec!(3000),
            other_monthly_debts: dec!(3000),
            interest_rate_pct: dec!(6.5),
            loan_term: LoanTerm::Thirty,
            total_tax_rate_pct: TAX,
            insurance_rate_pct: dec!(0.5),
            hoa_monthly: Decimal::ZERO,
        };
        let out = analyze_pre_qualification(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w == DEBT_EXCEEDS_CEILING));
    }

    #[test]
    fn test_extreme_rate_stays_finite() {
        for rate in [dec!(200), dec!(1000)] {
            let input = PreQualificationInput {
                monthly_income: dec!(1000000),
                other_monthly_debts: Decimal::ZERO,
                interest_rate_pct: rate,
                loan_term: LoanTerm::Thirty,
                total_tax_rate_pct: TAX,
                insurance_rate_pct: dec!(0.5),
                hoa_monthly: Decimal::ZERO,
            };
            let r = analyze_pre_qualification(&input).unwrap().result;
            assert!(r.max_home_price > Decimal::ZERO, "rate {rate}");
            assert!(r.max_loan_amount < r.max_home_price);
        }
    }
}
