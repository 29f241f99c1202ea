use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FirstKeyError;
use crate::formatting::round_to;
use crate::time_value::{self, MONTHS_PER_YEAR};
use crate::types::{Money, Percent, Rate};

// ---------------------------------------------------------------------------
// Loan term
// ---------------------------------------------------------------------------

/// Fixed-rate terms offered by the calculators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LoanTerm {
    Ten,
    Fifteen,
    Twenty,
    TwentyFive,
    #[default]
    Thirty,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 5] = [
        LoanTerm::Ten,
        LoanTerm::Fifteen,
        LoanTerm::Twenty,
        LoanTerm::TwentyFive,
        LoanTerm::Thirty,
    ];

    pub fn years(self) -> u32 {
        match self {
            LoanTerm::Ten => 10,
            LoanTerm::Fifteen => 15,
            LoanTerm::Twenty => 20,
            LoanTerm::TwentyFive => 25,
            LoanTerm::Thirty => 30,
        }
    }

    /// Number of monthly payments over the full term.
    pub fn payments(self) -> u32 {
        self.years() * MONTHS_PER_YEAR
    }
}

impl TryFrom<u32> for LoanTerm {
    type Error = FirstKeyError;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        LoanTerm::ALL
            .into_iter()
            .find(|t| t.years() == years)
            .ok_or_else(|| FirstKeyError::InvalidInput {
                field: "loan_term".into(),
                reason: format!("{years} years is not offered; use 10, 15, 20, 25 or 30"),
            })
    }
}

impl From<LoanTerm> for u32 {
    fn from(term: LoanTerm) -> u32 {
        term.years()
    }
}

impl FromStr for LoanTerm {
    type Err = FirstKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let years: u32 = s.trim().parse().map_err(|_| FirstKeyError::InvalidInput {
            field: "loan_term".into(),
            reason: format!("'{s}' is not a whole number of years"),
        })?;
        LoanTerm::try_from(years)
    }
}

impl fmt::Display for LoanTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years", self.years())
    }
}

// ---------------------------------------------------------------------------
// Loan parameters
// ---------------------------------------------------------------------------

/// What the borrower enters on the calculator: price, down payment, term,
/// rate and any voluntary extra principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    pub home_price: Money,
    pub down_payment: Money,
    /// Kept in step with `down_payment`: `down_payment = home_price * pct / 100`.
    pub down_payment_pct: Percent,
    pub loan_term: LoanTerm,
    /// Annual interest rate (6.5 = 6.5%).
    pub interest_rate_pct: Percent,
    #[serde(default)]
    pub extra_monthly_payment: Money,
}

impl LoanParameters {
    /// Build from a down-payment percentage, deriving the dollar amount the
    /// way the calculators do.
    pub fn with_down_payment_pct(
        home_price: Money,
        down_payment_pct: Percent,
        loan_term: LoanTerm,
        interest_rate_pct: Percent,
    ) -> Self {
        LoanParameters {
            home_price,
            down_payment: down_payment_from_pct(home_price, down_payment_pct),
            down_payment_pct,
            loan_term,
            interest_rate_pct,
            extra_monthly_payment: Decimal::ZERO,
        }
    }

    /// Home price less down payment, never negative.
    pub fn loan_amount(&self) -> Money {
        (self.home_price - self.down_payment).max(Decimal::ZERO)
    }

    pub fn monthly_rate(&self) -> Rate {
        time_value::monthly_rate(self.interest_rate_pct)
    }

    pub fn number_of_payments(&self) -> u32 {
        self.loan_term.payments()
    }

    pub(crate) fn validate(&self) -> Result<(), FirstKeyError> {
        if self.home_price <= Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "home_price",
                "Home price must be positive",
            ));
        }
        if self.down_payment < Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "down_payment",
                "Down payment cannot be negative",
            ));
        }
        if self.down_payment > self.home_price {
            return Err(FirstKeyError::invalid(
                "down_payment",
                "Down payment cannot exceed the home price",
            ));
        }
        if self.down_payment_pct < Decimal::ZERO || self.down_payment_pct > dec!(100) {
            return Err(FirstKeyError::invalid(
                "down_payment_pct",
                "Down payment percentage must be between 0 and 100",
            ));
        }
        if self.interest_rate_pct < Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "interest_rate_pct",
                "Interest rate cannot be negative",
            ));
        }
        if self.extra_monthly_payment < Decimal::ZERO {
            return Err(FirstKeyError::invalid(
                "extra_monthly_payment",
                "Extra payment cannot be negative",
            ));
        }
        Ok(())
    }

    /// Warning text when the stated percentage and the dollar amount have
    /// drifted apart by more than a point.
    pub(crate) fn consistency_warning(&self) -> Option<String> {
        let implied = down_payment_pct_from_amount(self.home_price, self.down_payment);
        if (implied - self.down_payment_pct).abs() > Decimal::ONE {
            Some(format!(
                "Down payment of {} implies {}% of the home price, not the stated {}%",
                self.down_payment, implied, self.down_payment_pct
            ))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Down payment synchronisation
// ---------------------------------------------------------------------------

/// Whole-dollar down payment for a percentage of the price.
pub fn down_payment_from_pct(home_price: Money, pct: Percent) -> Money {
    round_to(pct / dec!(100) * home_price, 0)
}

/// Whole-number percentage for a down payment; 0 when the price is not positive.
pub fn down_payment_pct_from_amount(home_price: Money, down_payment: Money) -> Percent {
    if home_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_to(down_payment / home_price * dec!(100), 0)
}
