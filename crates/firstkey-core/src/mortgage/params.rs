use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::defaults::MortgageDefaults;
use crate::error::FirstKeyError;
use crate::loan::LoanParameters;
use crate::types::{Money, Percent};
use crate::FirstKeyResult;

/// Local property-tax levies and the homestead exemption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxProfile {
    pub city_tax_rate: Percent,
    pub county_tax_rate: Percent,
    pub isd_tax_rate: Percent,
    pub college_tax_rate: Percent,
    pub homestead_exemption: Money,
}

impl TaxProfile {
    /// Combined levy of all four taxing units.
    pub fn total_tax_rate(&self) -> Percent {
        self.city_tax_rate + self.county_tax_rate + self.isd_tax_rate + self.college_tax_rate
    }

    /// Appraised value less the homestead exemption, floored at zero.
    pub fn taxable_value(&self, home_price: Money) -> Money {
        (home_price - self.homestead_exemption).max(Decimal::ZERO)
    }

    pub fn annual_taxes(&self, home_price: Money) -> Money {
        self.taxable_value(home_price) * self.total_tax_rate() / dec!(100)
    }

    pub(crate) fn validate(&self) -> FirstKeyResult<()> {
        let rates = [
            ("city_tax_rate", self.city_tax_rate),
            ("county_tax_rate", self.county_tax_rate),
            ("isd_tax_rate", self.isd_tax_rate),
            ("college_tax_rate", self.college_tax_rate),
        ];
        for (field, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(FirstKeyError::invalid(field, "Tax rate cannot be negative"));
            }
        }
        if self.homestead_exemption < Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "homestead_exemption",
                "Homestead exemption cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Insurance, PMI and HOA assumptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    /// Annual homeowners insurance as a percentage of the home price.
    pub insurance_rate_pct: Percent,
    /// Annual PMI as a percentage of the loan amount.
    pub pmi_rate_pct: Percent,
    pub hoa_monthly: Money,
}

impl CostRates {
    pub(crate) fn validate(&self) -> FirstKeyResult<()> {
        if self.insurance_rate_pct < Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "insurance_rate_pct",
                "Insurance rate cannot be negative",
            ));
        }
        if self.pmi_rate_pct < Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "pmi_rate_pct",
                "PMI rate cannot be negative",
            ));
        }
        if self.hoa_monthly < Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "hoa_monthly",
                "HOA dues cannot be negative",
            ));
        }
        Ok(())
    }
}

impl MortgageDefaults {
    pub fn loan_parameters(&self) -> LoanParameters {
        let c = &self.calculator;
        let mut loan = LoanParameters::with_down_payment_pct(
            c.home_price,
            c.down_payment_pct,
            c.loan_term,
            c.interest_rate_pct,
        );
        loan.extra_monthly_payment = c.extra_monthly_payment;
        loan
    }

    pub fn tax_profile(&self) -> TaxProfile {
        let c = &self.calculator;
        TaxProfile {
            city_tax_rate: c.city_tax_rate,
            county_tax_rate: c.county_tax_rate,
            isd_tax_rate: c.isd_tax_rate,
            college_tax_rate: c.college_tax_rate,
            homestead_exemption: c.homestead_exemption,
        }
    }

    pub fn cost_rates(&self) -> CostRates {
        let c = &self.calculator;
        CostRates {
            insurance_rate_pct: c.insurance_rate_pct,
            pmi_rate_pct: c.pmi_rate_pct,
            hoa_monthly: c.hoa_monthly,
        }
    }
}
