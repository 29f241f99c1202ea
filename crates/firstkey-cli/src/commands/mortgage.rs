use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use firstkey_core::defaults::MortgageDefaults;
use firstkey_core::loan::{
    down_payment_from_pct, down_payment_pct_from_amount, LoanParameters, LoanTerm,
};
use firstkey_core::mortgage::analysis::{self, MortgageInput};
use firstkey_core::mortgage::dti::{self, DtiInput};
use firstkey_core::mortgage::monthly_cost::{self, MonthlyCostInput};
use firstkey_core::mortgage::prequalification::{self, PreQualificationInput};
use firstkey_core::mortgage::{calculate_monthly_cost, CostRates, TaxProfile};

use crate::input;

// ---------------------------------------------------------------------------
// Shared flag groups
// ---------------------------------------------------------------------------

/// Purchase and loan terms. Anything left out comes from the defaults.
#[derive(Args)]
pub struct LoanFlags {
    /// Purchase price
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment as a percentage of price (20 = 20%)
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,

    /// Down payment in dollars (takes precedence over --down-payment-pct)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Loan term in years: 10, 15, 20, 25 or 30
    #[arg(long)]
    pub term: Option<LoanTerm>,

    /// Annual interest rate (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Extra principal paid every month
    #[arg(long)]
    pub extra: Option<Decimal>,
}

impl LoanFlags {
    pub fn resolve(&self, defaults: &MortgageDefaults) -> LoanParameters {
        let c = &defaults.calculator;
        let home_price = self.home_price.unwrap_or(c.home_price);
        let (down_payment, down_payment_pct) = match self.down_payment {
            Some(amount) => (amount, down_payment_pct_from_amount(home_price, amount)),
            None => {
                let pct = self.down_payment_pct.unwrap_or(c.down_payment_pct);
                (down_payment_from_pct(home_price, pct), pct)
            }
        };
        LoanParameters {
            home_price,
            down_payment,
            down_payment_pct,
            loan_term: self.term.unwrap_or(c.loan_term),
            interest_rate_pct: self.rate.unwrap_or(c.interest_rate_pct),
            extra_monthly_payment: self.extra.unwrap_or(c.extra_monthly_payment),
        }
    }
}

/// Property tax levies, insurance, PMI and HOA.
#[derive(Args)]
pub struct CostFlags {
    /// City tax rate (%)
    #[arg(long)]
    pub city_tax_rate: Option<Decimal>,

    /// County tax rate (%)
    #[arg(long)]
    pub county_tax_rate: Option<Decimal>,

    /// School district tax rate (%)
    #[arg(long)]
    pub isd_tax_rate: Option<Decimal>,

    /// College district tax rate (%)
    #[arg(long)]
    pub college_tax_rate: Option<Decimal>,

    /// Homestead exemption deducted from the taxable value
    #[arg(long)]
    pub homestead_exemption: Option<Decimal>,

    /// Annual insurance as a percentage of price
    #[arg(long)]
    pub insurance_rate: Option<Decimal>,

    /// Annual PMI as a percentage of the loan
    #[arg(long)]
    pub pmi_rate: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa: Option<Decimal>,
}

impl CostFlags {
    pub fn tax_profile(&self, defaults: &MortgageDefaults) -> TaxProfile {
        let base = defaults.tax_profile();
        TaxProfile {
            city_tax_rate: self.city_tax_rate.unwrap_or(base.city_tax_rate),
            county_tax_rate: self.county_tax_rate.unwrap_or(base.county_tax_rate),
            isd_tax_rate: self.isd_tax_rate.unwrap_or(base.isd_tax_rate),
            college_tax_rate: self.college_tax_rate.unwrap_or(base.college_tax_rate),
            homestead_exemption: self.homestead_exemption.unwrap_or(base.homestead_exemption),
        }
    }

    pub fn cost_rates(&self, defaults: &MortgageDefaults) -> CostRates {
        let base = defaults.cost_rates();
        CostRates {
            insurance_rate_pct: self.insurance_rate.unwrap_or(base.insurance_rate_pct),
            pmi_rate_pct: self.pmi_rate.unwrap_or(base.pmi_rate_pct),
            hoa_monthly: self.hoa.unwrap_or(base.hoa_monthly),
        }
    }
}

/// Gross monthly income and other monthly debt payments.
#[derive(Args)]
pub struct BorrowerFlags {
    /// Gross monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Other monthly debt payments (cards, auto, student loans)
    #[arg(long)]
    pub debts: Option<Decimal>,
}

impl BorrowerFlags {
    fn resolve(&self, defaults: &MortgageDefaults) -> (Decimal, Decimal) {
        let c = &defaults.calculator;
        (
            self.income.unwrap_or(c.monthly_income),
            self.debts.unwrap_or(c.other_monthly_debts),
        )
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MortgageArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    #[command(flatten)]
    pub cost: CostFlags,

    #[command(flatten)]
    pub borrower: BorrowerFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MonthlyCostArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    #[command(flatten)]
    pub cost: CostFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DtiArgs {
    /// Required monthly housing payment; computed from the loan flags when omitted
    #[arg(long)]
    pub payment: Option<Decimal>,

    #[command(flatten)]
    pub borrower: BorrowerFlags,

    #[command(flatten)]
    pub loan: LoanFlags,

    #[command(flatten)]
    pub cost: CostFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PrequalifyArgs {
    #[command(flatten)]
    pub borrower: BorrowerFlags,

    /// Annual interest rate (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years: 10, 15, 20, 25 or 30
    #[arg(long)]
    pub term: Option<LoanTerm>,

    #[command(flatten)]
    pub cost: CostFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

pub fn run_mortgage(
    args: MortgageArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let (monthly_income, other_monthly_debts) = args.borrower.resolve(defaults);
            MortgageInput {
                loan: args.loan.resolve(defaults),
                tax: args.cost.tax_profile(defaults),
                cost: args.cost.cost_rates(defaults),
                monthly_income,
                other_monthly_debts,
            }
        }
    };
    let result = analysis::analyze_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_monthly_cost(
    args: MonthlyCostArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let cost_input: MonthlyCostInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => MonthlyCostInput {
            loan: args.loan.resolve(defaults),
            tax: args.cost.tax_profile(defaults),
            cost: args.cost.cost_rates(defaults),
        },
    };
    let result = monthly_cost::analyze_monthly_cost(&cost_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_dti(
    args: DtiArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dti_input: DtiInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let (monthly_income, other_monthly_debts) = args.borrower.resolve(defaults);
            let required_monthly_payment = match args.payment {
                Some(p) => p,
                None => {
                    calculate_monthly_cost(
                        &args.loan.resolve(defaults),
                        &args.cost.tax_profile(defaults),
                        &args.cost.cost_rates(defaults),
                    )
                    .total_monthly_payment
                }
            };
            DtiInput {
                required_monthly_payment,
                other_monthly_debts,
                monthly_income,
            }
        }
    };
    let result = dti::analyze_dti(&dti_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_prequalify(
    args: PrequalifyArgs,
    defaults: &MortgageDefaults,
) -> Result<Value, Box<dyn std::error::Error>> {
    let pq_input: PreQualificationInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let (monthly_income, other_monthly_debts) = args.borrower.resolve(defaults);
            let c = &defaults.calculator;
            let cost = args.cost.cost_rates(defaults);
            PreQualificationInput {
                monthly_income,
                other_monthly_debts,
                interest_rate_pct: args.rate.unwrap_or(c.interest_rate_pct),
                loan_term: args.term.unwrap_or(c.loan_term),
                total_tax_rate_pct: args.cost.tax_profile(defaults).total_tax_rate(),
                insurance_rate_pct: cost.insurance_rate_pct,
                hoa_monthly: cost.hoa_monthly,
            }
        }
    };
    let result = prequalification::analyze_pre_qualification(&pq_input)?;
    Ok(serde_json::to_value(result)?)
}
