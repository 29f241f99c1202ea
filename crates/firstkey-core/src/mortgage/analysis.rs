//! Everything the mortgage calculator screen shows for one set of inputs:
//! monthly cost, schedule with and without extra principal, DTI against the
//! required payment, and a pre-qualification estimate on the same terms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::dti::{calculate_dti, DtiSnapshot, DtiStatus, BACK_END_WARNING_PCT};
use super::monthly_cost::{
    calculate_monthly_cost, monthly_cost_output, pmi_warning, MonthlyCostOutput,
};
use super::params::{CostRates, TaxProfile};
use super::prequalification::{estimate_pre_qualification, PreQualificationResult};
use crate::amortization::schedule::{
    amortization_analysis, AmortizationAnalysis, AmortizationResult,
};
use crate::error::FirstKeyError;
use crate::loan::LoanParameters;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FirstKeyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub loan: LoanParameters,
    pub tax: TaxProfile,
    pub cost: CostRates,
    pub monthly_income: Money,
    #[serde(default)]
    pub other_monthly_debts: Money,
}

/// One month of the balance chart. `balance_with_extra` is zero once the
/// accelerated schedule has paid off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub month: u32,
    pub balance_with_extra: Money,
    pub original_balance: Money,
    pub interest: Money,
    pub principal: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageAnalysis {
    pub monthly_cost: MonthlyCostOutput,
    pub amortization: AmortizationAnalysis,
    pub balance_comparison: Vec<BalancePoint>,
    pub dti: DtiSnapshot,
    pub front_end_status: DtiStatus,
    pub back_end_status: DtiStatus,
    pub pre_qualification: PreQualificationResult,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Pair the accelerated schedule with the baseline, month by month over the
/// baseline's length.
pub fn balance_comparison(
    accelerated: &AmortizationResult,
    baseline: &AmortizationResult,
) -> Vec<BalancePoint> {
    baseline
        .schedule
        .iter()
        .enumerate()
        .map(|(idx, row)| BalancePoint {
            month: row.month,
            balance_with_extra: accelerated
                .schedule
                .get(idx)
                .map(|r| r.balance)
                .unwrap_or(Decimal::ZERO),
            original_balance: row.balance,
            interest: row.interest,
            principal: row.principal,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

pub fn analyze_mortgage(
    input: &MortgageInput,
) -> FirstKeyResult<ComputationOutput<MortgageAnalysis>> {
    let start = Instant::now();
    input.loan.validate()?;
    input.tax.validate()?;
    input.cost.validate()?;
    if input.other_monthly_debts < Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "other_monthly_debts",
            "Other debts cannot be negative",
        ));
    }

    let mut warnings: Vec<String> = Vec::new();
    if let Some(w) = input.loan.consistency_warning() {
        warnings.push(w);
    }

    let breakdown = calculate_monthly_cost(&input.loan, &input.tax, &input.cost);
    if let Some(w) = pmi_warning(&breakdown) {
        warnings.push(w);
    }

    let dti = calculate_dti(
        breakdown.total_monthly_payment,
        input.other_monthly_debts,
        input.monthly_income,
    );
    if dti.back_end_dti > BACK_END_WARNING_PCT {
        warnings.push(format!(
            "Back-end DTI of {:.1}% exceeds the {BACK_END_WARNING_PCT}% conventional limit",
            dti.back_end_dti
        ));
    }

    let amortization = amortization_analysis(
        input.loan.loan_amount(),
        input.loan.interest_rate_pct,
        input.loan.loan_term,
        input.loan.extra_monthly_payment,
    );

    let pre_qualification = estimate_pre_qualification(
        input.monthly_income,
        input.other_monthly_debts,
        input.loan.interest_rate_pct,
        input.loan.loan_term,
        input.tax.total_tax_rate(),
        input.cost.insurance_rate_pct,
        input.cost.hoa_monthly,
    );
    if let Some(reason) = &pre_qualification.reason {
        warnings.push(reason.clone());
    }

    debug!(
        total_monthly_payment = %breakdown.total_monthly_payment,
        payoff_month = amortization.schedule.payoff_month,
        back_end_dti = %dti.back_end_dti,
        max_home_price = %pre_qualification.max_home_price,
        "mortgage analysed"
    );

    let output = MortgageAnalysis {
        monthly_cost: monthly_cost_output(&input.loan, &input.tax, breakdown),
        balance_comparison: balance_comparison(&amortization.schedule, &amortization.baseline),
        amortization,
        front_end_status: DtiStatus::classify(dti.front_end_dti),
        back_end_status: DtiStatus::classify(dti.back_end_dti),
        dti,
        pre_qualification: pre_qualification.rounded_for_display(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly cost, amortization, DTI and pre-qualification",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::MortgageDefaults;
    use rust_decimal_macros::dec;

    fn default_input() -> MortgageInput {
        let d = MortgageDefaults::default();
        MortgageInput {
            loan: d.loan_parameters(),
            tax: d.tax_profile(),
            cost: d.cost_rates(),
            monthly_income: d.calculator.monthly_income,
            other_monthly_debts: d.calculator.other_monthly_debts,
        }
    }

    #[test]
    fn test_default_analysis() {
        let out = analyze_mortgage(&default_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.monthly_cost.loan_amount, dec!(264000));
        assert_eq!(r.amortization.schedule.payoff_month, 360);
        assert_eq!(r.amortization.months_saved, 0);
        assert_eq!(r.balance_comparison.len(), 360);
        assert_eq!(r.pre_qualification.max_home_price, dec!(281938));
        // 2214.88 / 6500 = 34.07%, 2714.88 / 6500 = 41.77%
        assert_eq!(r.front_end_status, DtiStatus::Good);
        assert_eq!(r.back_end_status, DtiStatus::Fair);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_balance_comparison_with_extra() {
        let mut input = default_input();
        input.loan.extra_monthly_payment = dec!(200);
        let r = analyze_mortgage(&input).unwrap().result;
        assert_eq!(r.amortization.schedule.payoff_month, 269);
        assert_eq!(r.balance_comparison.len(), 360);
        let after_payoff = &r.balance_comparison[300];
        assert_eq!(after_payoff.balance_with_extra, Decimal::ZERO);
        assert!(after_payoff.original_balance > Decimal::ZERO);
        let year_one = &r.balance_comparison[11];
        assert!(year_one.balance_with_extra < year_one.original_balance);
    }

    #[test]
    fn test_infeasible_pre_qualification_is_a_warning() {
        let mut input = default_input();
        input.monthly_income = dec!(3000);
        input.other_monthly_debts = dec!(3000);
        let out = analyze_mortgage(&input).unwrap();
        assert_eq!(out.result.pre_qualification.max_home_price, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("existing debt payments")));
        assert!(out.warnings.iter().any(|w| w.contains("Back-end DTI")));
    }

    #[test]
    fn test_down_payment_above_price_rejected() {
        let mut input = default_input();
        input.loan.down_payment = dec!(400000);
        assert!(analyze_mortgage(&input).is_err());
    }
}
