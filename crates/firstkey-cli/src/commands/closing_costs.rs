use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use firstkey_core::closing_costs::estimator::{self, ClosingCostInput};
use firstkey_core::defaults::MortgageDefaults;
use firstkey_core::loan::down_payment_from_pct;

use crate::input;

/// Arguments for a cash-to-close estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ClosingCostsArgs {
    /// Purchase price
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment in dollars
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percentage of price (used when --down-payment is absent)
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_closing_costs(
    args: ClosingCostsArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let cc_input: ClosingCostInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = &defaults.cash_to_close;
            let home_price = args.home_price.unwrap_or(d.home_price);
            let down_payment = match (args.down_payment, args.down_payment_pct) {
                (Some(amount), _) => amount,
                (None, Some(pct)) => down_payment_from_pct(home_price, pct),
                (None, None) => d.down_payment,
            };
            ClosingCostInput {
                home_price,
                down_payment,
            }
        }
    };
    let result = estimator::analyze_closing_costs(&cc_input)?;
    Ok(serde_json::to_value(result)?)
}
