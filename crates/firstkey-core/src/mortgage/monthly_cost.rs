//! Monthly housing payment: principal & interest, property tax, insurance,
//! PMI and HOA.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::params::{CostRates, TaxProfile};
use crate::loan::LoanParameters;
use crate::time_value::{self, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FirstKeyResult;

/// Down payments below this share of the price carry PMI.
pub const PMI_THRESHOLD_PCT: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCostBreakdown {
    pub principal_and_interest: Money,
    pub property_tax_monthly: Money,
    pub insurance_monthly: Money,
    pub pmi_monthly: Money,
    pub hoa_monthly: Money,
    /// Sum of the five components above; excludes any extra payment.
    pub total_monthly_payment: Money,
}

/// A named slice of the monthly payment, for breakdown charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentComponent {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCostInput {
    pub loan: LoanParameters,
    pub tax: TaxProfile,
    pub cost: CostRates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCostOutput {
    pub loan_amount: Money,
    pub down_payment_pct: Percent,
    pub total_tax_rate: Percent,
    pub taxable_value: Money,
    pub annual_taxes: Money,
    pub breakdown: MonthlyCostBreakdown,
    pub extra_monthly_payment: Money,
    pub total_monthly_with_extra: Money,
    pub payment_breakdown: Vec<PaymentComponent>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Required monthly payment for a purchase.
pub fn calculate_monthly_cost(
    loan: &LoanParameters,
    tax: &TaxProfile,
    cost: &CostRates,
) -> MonthlyCostBreakdown {
    let months = Decimal::from(MONTHS_PER_YEAR);
    let loan_amount = loan.loan_amount();

    let principal_and_interest =
        time_value::annuity_payment(loan_amount, loan.monthly_rate(), loan.number_of_payments());
    let property_tax_monthly = tax.annual_taxes(loan.home_price) / months;
    let insurance_monthly = loan.home_price * cost.insurance_rate_pct / dec!(100) / months;
    let pmi_monthly = if loan.down_payment_pct < PMI_THRESHOLD_PCT {
        loan_amount * cost.pmi_rate_pct / dec!(100) / months
    } else {
        Decimal::ZERO
    };

    let total_monthly_payment = principal_and_interest
        + property_tax_monthly
        + insurance_monthly
        + pmi_monthly
        + cost.hoa_monthly;

    MonthlyCostBreakdown {
        principal_and_interest,
        property_tax_monthly,
        insurance_monthly,
        pmi_monthly,
        hoa_monthly: cost.hoa_monthly,
        total_monthly_payment,
    }
}

/// Named components with a positive amount, in chart order.
pub fn payment_components(breakdown: &MonthlyCostBreakdown, extra: Money) -> Vec<PaymentComponent> {
    [
        ("Principal & Interest", breakdown.principal_and_interest),
        ("Property Taxes", breakdown.property_tax_monthly),
        ("PMI", breakdown.pmi_monthly),
        ("Home Insurance", breakdown.insurance_monthly),
        ("HOA Fees", breakdown.hoa_monthly),
        ("Extra Payment", extra),
    ]
    .into_iter()
    .filter(|(_, amount)| *amount > Decimal::ZERO)
    .map(|(name, amount)| PaymentComponent {
        name: name.to_string(),
        amount,
    })
    .collect()
}

/// Breakdown plus the derived figures the calculator screen shows with it.
pub(crate) fn monthly_cost_output(
    loan: &LoanParameters,
    tax: &TaxProfile,
    breakdown: MonthlyCostBreakdown,
) -> MonthlyCostOutput {
    let extra = loan.extra_monthly_payment;
    MonthlyCostOutput {
        loan_amount: loan.loan_amount(),
        down_payment_pct: loan.down_payment_pct,
        total_tax_rate: tax.total_tax_rate(),
        taxable_value: tax.taxable_value(loan.home_price),
        annual_taxes: tax.annual_taxes(loan.home_price),
        total_monthly_with_extra: breakdown.total_monthly_payment + extra,
        extra_monthly_payment: extra,
        payment_breakdown: payment_components(&breakdown, extra),
        breakdown,
    }
}

pub(crate) fn pmi_warning(breakdown: &MonthlyCostBreakdown) -> Option<String> {
    (breakdown.pmi_monthly > Decimal::ZERO).then(|| {
        format!(
            "Down payment is under {PMI_THRESHOLD_PCT}%; PMI of {} per month applies",
            breakdown.pmi_monthly.round_dp(2)
        )
    })
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

pub fn analyze_monthly_cost(
    input: &MonthlyCostInput,
) -> FirstKeyResult<ComputationOutput<MonthlyCostOutput>> {
    let start = Instant::now();
    input.loan.validate()?;
    input.tax.validate()?;
    input.cost.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    if let Some(w) = input.loan.consistency_warning() {
        warnings.push(w);
    }

    let breakdown = calculate_monthly_cost(&input.loan, &input.tax, &input.cost);
    if let Some(w) = pmi_warning(&breakdown) {
        warnings.push(w);
    }

    debug!(
        loan_amount = %input.loan.loan_amount(),
        total_monthly_payment = %breakdown.total_monthly_payment,
        "monthly cost calculated"
    );

    let output = monthly_cost_output(&input.loan, &input.tax, breakdown);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "PITI + PMI + HOA monthly payment",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
