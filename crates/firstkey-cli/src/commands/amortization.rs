use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use firstkey_core::amortization::biweekly::{self, PaymentStrategyInput};
use firstkey_core::amortization::schedule::{self, AmortizationInput};
use firstkey_core::defaults::MortgageDefaults;

use super::mortgage::LoanFlags;
use crate::input;

/// Arguments for an amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortizeArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    /// Amount financed; defaults to price minus down payment
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the monthly versus biweekly comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct StrategiesArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    /// Amount financed; defaults to price minus down payment
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(
    args: AmortizeArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let loan = args.loan.resolve(defaults);
            AmortizationInput {
                loan_amount: args.loan_amount.unwrap_or_else(|| loan.loan_amount()),
                interest_rate_pct: loan.interest_rate_pct,
                loan_term: loan.loan_term,
                extra_monthly_payment: loan.extra_monthly_payment,
            }
        }
    };
    let result = schedule::analyze_amortization(&amort_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_strategies(
    args: StrategiesArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let strategy_input: PaymentStrategyInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let loan = args.loan.resolve(defaults);
            PaymentStrategyInput {
                loan_amount: args.loan_amount.unwrap_or_else(|| loan.loan_amount()),
                interest_rate_pct: loan.interest_rate_pct,
                loan_term: loan.loan_term,
                extra_monthly_payment: loan.extra_monthly_payment,
            }
        }
    };
    let result = biweekly::analyze_payment_strategies(&strategy_input)?;
    Ok(serde_json::to_value(result)?)
}
