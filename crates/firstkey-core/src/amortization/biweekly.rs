//! Monthly-with-extra versus "biweekly" payment strategies.
//!
//! Biweekly is modelled the way lenders usually pitch it: 26 half payments a
//! year equal 13 monthly payments, so the schedule keeps 12 monthly periods
//! and spreads one extra monthly payment across them (`P&I / 12` added to
//! every month). True 26-period compounding is not simulated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::schedule::{amortize, AmortizationResult};
use crate::error::FirstKeyError;
use crate::loan::LoanTerm;
use crate::time_value::{self, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FirstKeyResult;

/// One strategy measured against the no-extra baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyOutcome {
    /// Extra principal added to every monthly payment.
    pub extra_payment: Money,
    pub schedule: AmortizationResult,
    pub interest_saved: Money,
    pub months_saved: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleComparison {
    pub baseline_total_interest: Money,
    pub baseline_payoff_month: u32,
    pub monthly: StrategyOutcome,
    pub biweekly: StrategyOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStrategyInput {
    pub loan_amount: Money,
    /// Annual interest rate (6.5 = 6.5%).
    pub interest_rate_pct: Percent,
    pub loan_term: LoanTerm,
    #[serde(default)]
    pub extra_monthly_payment: Money,
}

/// Run the monthly and biweekly-equivalent schedules side by side.
pub fn compare_schedules(
    loan_amount: Money,
    monthly_rate: Rate,
    number_of_payments: u32,
    principal_and_interest: Money,
    user_extra_payment: Money,
) -> ScheduleComparison {
    let baseline = amortize(
        loan_amount,
        monthly_rate,
        number_of_payments,
        principal_and_interest,
        Decimal::ZERO,
    );

    let biweekly_extra =
        principal_and_interest / Decimal::from(MONTHS_PER_YEAR) + user_extra_payment;

    let monthly = outcome(
        &baseline,
        user_extra_payment,
        amortize(
            loan_amount,
            monthly_rate,
            number_of_payments,
            principal_and_interest,
            user_extra_payment,
        ),
    );
    let biweekly = outcome(
        &baseline,
        biweekly_extra,
        amortize(
            loan_amount,
            monthly_rate,
            number_of_payments,
            principal_and_interest,
            biweekly_extra,
        ),
    );

    ScheduleComparison {
        baseline_total_interest: baseline.total_interest,
        baseline_payoff_month: baseline.payoff_month,
        monthly,
        biweekly,
    }
}

fn outcome(
    baseline: &AmortizationResult,
    extra_payment: Money,
    schedule: AmortizationResult,
) -> StrategyOutcome {
    StrategyOutcome {
        extra_payment,
        interest_saved: baseline.total_interest - schedule.total_interest,
        months_saved: i64::from(baseline.payoff_month) - i64::from(schedule.payoff_month),
        schedule,
    }
}

/// Compare monthly and biweekly payment strategies for a level-payment loan.
pub fn analyze_payment_strategies(
    input: &PaymentStrategyInput,
) -> FirstKeyResult<ComputationOutput<ScheduleComparison>> {
    let start = Instant::now();
    validate_strategy_input(input)?;

    let warnings = vec![
        "Biweekly is approximated as one extra monthly payment per year spread over 12 months"
            .to_string(),
    ];

    let monthly_rate = time_value::monthly_rate(input.interest_rate_pct);
    let n = input.loan_term.payments();
    let p_and_i = time_value::annuity_payment(input.loan_amount, monthly_rate, n);

    let output = compare_schedules(
        input.loan_amount,
        monthly_rate,
        n,
        p_and_i,
        input.extra_monthly_payment,
    );

    debug!(
        monthly_payoff = output.monthly.schedule.payoff_month,
        biweekly_payoff = output.biweekly.schedule.payoff_month,
        "payment strategies compared"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly vs biweekly-equivalent amortization",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_strategy_input(input: &PaymentStrategyInput) -> FirstKeyResult<()> {
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
