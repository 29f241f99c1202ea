//! Starting values shown by each calculator screen. The CLI loads overrides
//! from a YAML/JSON file; any field left out keeps the value below.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::loan::LoanTerm;
use crate::types::{Money, Percent};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageDefaults {
    pub calculator: CalculatorDefaults,
    pub refinance: RefinanceDefaults,
    pub cash_to_close: CashToCloseDefaults,
}

/// Mortgage calculator screen. Tax rates are the local city, county,
/// school district and college levies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorDefaults {
    pub home_price: Money,
    pub down_payment_pct: Percent,
    pub loan_term: LoanTerm,
    pub interest_rate_pct: Percent,
    pub extra_monthly_payment: Money,
    pub city_tax_rate: Percent,
    pub county_tax_rate: Percent,
    pub isd_tax_rate: Percent,
    pub college_tax_rate: Percent,
    pub homestead_exemption: Money,
    pub insurance_rate_pct: Percent,
    pub pmi_rate_pct: Percent,
    pub hoa_monthly: Money,
    pub monthly_income: Money,
    pub other_monthly_debts: Money,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        CalculatorDefaults {
            home_price: dec!(330000),
            down_payment_pct: dec!(20),
            loan_term: LoanTerm::Thirty,
            interest_rate_pct: dec!(6.5),
            extra_monthly_payment: Decimal::ZERO,
            city_tax_rate: dec!(0.500780),
            county_tax_rate: dec!(0.3051),
            isd_tax_rate: dec!(1.1799),
            college_tax_rate: dec!(0.1467),
            homestead_exemption: dec!(100000),
            insurance_rate_pct: dec!(0.5),
            pmi_rate_pct: dec!(0.5),
            hoa_monthly: Decimal::ZERO,
            monthly_income: dec!(6500),
            other_monthly_debts: dec!(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinanceDefaults {
    pub starting_balance: Money,
    pub starting_term: LoanTerm,
    pub years_elapsed: u32,
    pub current_rate_pct: Percent,
    pub new_rate_pct: Percent,
    pub new_term: LoanTerm,
    pub closing_costs: Money,
    pub cash_out_amount: Money,
}

impl Default for RefinanceDefaults {
    fn default() -> Self {
        RefinanceDefaults {
            starting_balance: dec!(450000),
            starting_term: LoanTerm::Thirty,
            years_elapsed: 5,
            current_rate_pct: dec!(6.5),
            new_rate_pct: dec!(6.5),
            new_term: LoanTerm::Thirty,
            closing_costs: dec!(5000),
            cash_out_amount: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashToCloseDefaults {
    pub home_price: Money,
    pub down_payment: Money,
}

impl Default for CashToCloseDefaults {
    fn default() -> Self {
        CashToCloseDefaults {
            home_price: dec!(540000),
            down_payment: dec!(108000),
        }
    }
}
