use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use firstkey_core::defaults::MortgageDefaults;
use firstkey_core::loan::LoanTerm;
use firstkey_core::refinance::comparison::{self, RefinanceInput};

use crate::input;

/// Arguments for a refinance comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RefinanceArgs {
    /// Original principal of the current loan
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Original term of the current loan in years
    #[arg(long)]
    pub original_term: Option<LoanTerm>,

    /// Whole years already paid on the current loan
    #[arg(long)]
    pub years_elapsed: Option<u32>,

    /// Current annual rate (6.5 = 6.5%)
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Refinance annual rate
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// Refinance term in years
    #[arg(long)]
    pub new_term: Option<LoanTerm>,

    /// Refinance closing costs
    #[arg(long)]
    pub closing_costs: Option<Decimal>,

    /// Cash taken out on top of the remaining balance
    #[arg(long)]
    pub cash_out: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_refinance(
    args: RefinanceArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let mut refi = defaults.refinance_input();
            if let Some(v) = args.balance {
                refi.current.starting_balance = v;
            }
            if let Some(v) = args.original_term {
                refi.current.starting_term = v;
            }
            if let Some(v) = args.years_elapsed {
                refi.current.years_elapsed = v;
            }
            if let Some(v) = args.current_rate {
                refi.current.current_rate_pct = v;
            }
            if let Some(v) = args.new_rate {
                refi.new.rate_pct = v;
            }
            if let Some(v) = args.new_term {
                refi.new.term = v;
            }
            if let Some(v) = args.closing_costs {
                refi.new.closing_costs = v;
            }
            if let Some(v) = args.cash_out {
                refi.new.cash_out_amount = v;
            }
            refi
        }
    };
    let result = comparison::analyze_refinance(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}
