//! Cash-to-close estimate from a fixed table of fee ratios.
//!
//! Every line item is a calibrated share of the purchase price, grouped by
//! the sections of the Closing Disclosure. Lender credits are the only
//! negative line.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FirstKeyError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FirstKeyResult;

// ---------------------------------------------------------------------------
// Fee table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingCostSection {
    OriginationCharges,
    ServicesCannotShop,
    ServicesCanShop,
    TaxesAndGovernmentFees,
    Prepaids,
    InitialEscrow,
    Other,
    LenderCredits,
}

impl ClosingCostSection {
    pub fn title(self) -> &'static str {
        match self {
            ClosingCostSection::OriginationCharges => "A. Origination Charges",
            ClosingCostSection::ServicesCannotShop => "B. Services You Cannot Shop For",
            ClosingCostSection::ServicesCanShop => "C. Services You Can Shop For",
            ClosingCostSection::TaxesAndGovernmentFees => "E. Taxes and Other Government Fees",
            ClosingCostSection::Prepaids => "F. Prepaids",
            ClosingCostSection::InitialEscrow => "G. Initial Escrow Payment at Closing",
            ClosingCostSection::Other => "H. Other",
            ClosingCostSection::LenderCredits => "Lender Credits",
        }
    }

    /// Sections A-C.
    pub fn is_loan_cost(self) -> bool {
        matches!(
            self,
            ClosingCostSection::OriginationCharges
                | ClosingCostSection::ServicesCannotShop
                | ClosingCostSection::ServicesCanShop
        )
    }

    /// Sections E-H.
    pub fn is_other_cost(self) -> bool {
        matches!(
            self,
            ClosingCostSection::TaxesAndGovernmentFees
                | ClosingCostSection::Prepaids
                | ClosingCostSection::InitialEscrow
                | ClosingCostSection::Other
        )
    }
}

pub struct FeeRatio {
    pub key: &'static str,
    pub label: &'static str,
    pub section: ClosingCostSection,
    /// Share of the home price.
    pub ratio: Rate,
}

pub const FEE_TABLE: [FeeRatio; 22] = [
    FeeRatio {
        key: "points",
        label: "Points (% of Loan Amount)",
        section: ClosingCostSection::OriginationCharges,
        ratio: dec!(0.002213),
    },
    FeeRatio {
        key: "underwriting_fee",
        label: "Underwriting Fee",
        section: ClosingCostSection::OriginationCharges,
        ratio: dec!(0.002213),
    },
    FeeRatio {
        key: "appraisal_fee",
        label: "Appraisal Fee",
        section: ClosingCostSection::ServicesCannotShop,
        ratio: dec!(0.001074),
    },
    FeeRatio {
        key: "attorney_doc_prep_fee",
        label: "Attorney Document Preparation",
        section: ClosingCostSection::ServicesCannotShop,
        ratio: dec!(0.000185),
    },
    FeeRatio {
        key: "credit_report_fee",
        label: "Credit Report Fee",
        section: ClosingCostSection::ServicesCannotShop,
        ratio: dec!(0.0001185),
    },
    FeeRatio {
        key: "electronic_registration_fee",
        label: "Electronic Registration (MERS)",
        section: ClosingCostSection::ServicesCannotShop,
        ratio: dec!(0.0000463),
    },
    FeeRatio {
        key: "flood_certification",
        label: "Flood Certification",
        section: ClosingCostSection::ServicesCannotShop,
        ratio: dec!(0.0000148),
    },
    FeeRatio {
        key: "mortgage_insurance_premium",
        label: "Mortgage Insurance Premium",
        section: ClosingCostSection::ServicesCannotShop,
        ratio: dec!(0.016626),
    },
    FeeRatio {
        key: "title_courier_fee",
        label: "Title - Courier/Wire/E-Mail Fee",
        section: ClosingCostSection::ServicesCanShop,
        ratio: dec!(0.0000926),
    },
    FeeRatio {
        key: "title_doc_prep",
        label: "Title - Document Prep",
        section: ClosingCostSection::ServicesCanShop,
        ratio: dec!(0.000370),
    },
    FeeRatio {
        key: "title_endorsement_fee",
        label: "Title - Endorsement Fee",
        section: ClosingCostSection::ServicesCanShop,
        ratio: dec!(0.000376),
    },
    FeeRatio {
        key: "title_premium_lenders_coverage",
        label: "Title - Premium for Lender's Coverage",
        section: ClosingCostSection::ServicesCanShop,
        ratio: dec!(0.005665),
    },
    FeeRatio {
        key: "title_recording_fee",
        label: "Title - Recording Fee",
        section: ClosingCostSection::ServicesCanShop,
        ratio: dec!(0.000335),
    },
    FeeRatio {
        key: "title_settlement_fee",
        label: "Title - Settlement/Closing Fee",
        section: ClosingCostSection::ServicesCanShop,
        ratio: dec!(0.000926),
    },
    FeeRatio {
        key: "title_tax_cert_fee",
        label: "Title - Tax Cert/Guaranty Fee",
        section: ClosingCostSection::ServicesCanShop,
        ratio: dec!(0.000156),
    },
    FeeRatio {
        key: "recording_fees_taxes",
        label: "Recording Fees and Other Taxes",
        section: ClosingCostSection::TaxesAndGovernmentFees,
        ratio: dec!(0.000337),
    },
    FeeRatio {
        key: "homeowners_insurance_12mo",
        label: "Homeowner's Insurance Premium (12 months)",
        section: ClosingCostSection::Prepaids,
        ratio: dec!(0.01),
    },
    FeeRatio {
        key: "prepaid_interest",
        label: "Prepaid Interest",
        section: ClosingCostSection::Prepaids,
        ratio: dec!(0.001459),
    },
    FeeRatio {
        key: "homeowners_insurance_3mo",
        label: "Homeowner's Insurance (3 months)",
        section: ClosingCostSection::InitialEscrow,
        ratio: dec!(0.003),
    },
    FeeRatio {
        key: "city_property_tax_3mo",
        label: "City Property Tax (3 months)",
        section: ClosingCostSection::InitialEscrow,
        ratio: dec!(0.004722),
    },
    FeeRatio {
        key: "owners_title_policy",
        label: "Title - Owner's Title Policy (Optional)",
        section: ClosingCostSection::Other,
        ratio: dec!(0.000454),
    },
    FeeRatio {
        key: "lender_credits",
        label: "Lender Credits",
        section: ClosingCostSection::LenderCredits,
        ratio: dec!(-0.001594),
    },
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingCostLineItem {
    pub key: String,
    pub label: String,
    pub section: ClosingCostSection,
    pub ratio: Rate,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingCostBreakdown {
    pub line_items: Vec<ClosingCostLineItem>,
    pub loan_amount: Money,
    /// Sections A-C.
    pub total_loan_costs: Money,
    /// Sections E-H.
    pub total_other_costs: Money,
    /// Negative.
    pub lender_credits: Money,
    pub total_closing_costs: Money,
    /// Closing costs as a percentage of the home price.
    pub closing_costs_pct: Percent,
    pub total_cash_to_close: Money,
}

impl ClosingCostBreakdown {
    pub fn amount(&self, key: &str) -> Option<Money> {
        self.line_items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.amount)
    }

    pub fn section_total(&self, section: ClosingCostSection) -> Money {
        self.line_items
            .iter()
            .filter(|item| item.section == section)
            .map(|item| item.amount)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingCostInput {
    pub home_price: Money,
    pub down_payment: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub fn estimate_closing_costs(home_price: Money, down_payment: Money) -> ClosingCostBreakdown {
    let line_items: Vec<ClosingCostLineItem> = FEE_TABLE
        .iter()
        .map(|fee| ClosingCostLineItem {
            key: fee.key.to_string(),
            label: fee.label.to_string(),
            section: fee.section,
            ratio: fee.ratio,
            amount: home_price * fee.ratio,
        })
        .collect();

    let sum_where = |pred: fn(ClosingCostSection) -> bool| -> Money {
        line_items
            .iter()
            .filter(|item| pred(item.section))
            .map(|item| item.amount)
            .sum()
    };
    let total_loan_costs = sum_where(ClosingCostSection::is_loan_cost);
    let total_other_costs = sum_where(ClosingCostSection::is_other_cost);
    let lender_credits = sum_where(|s| s == ClosingCostSection::LenderCredits);

    let total_closing_costs = total_loan_costs + total_other_costs + lender_credits;
    let closing_costs_pct = if home_price > Decimal::ZERO {
        total_closing_costs / home_price * dec!(100)
    } else {
        Decimal::ZERO
    };

    ClosingCostBreakdown {
        loan_amount: home_price - down_payment,
        total_loan_costs,
        total_other_costs,
        lender_credits,
        total_closing_costs,
        closing_costs_pct,
        total_cash_to_close: down_payment + total_closing_costs,
        line_items,
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

pub fn analyze_closing_costs(
    input: &ClosingCostInput,
) -> FirstKeyResult<ComputationOutput<ClosingCostBreakdown>> {
    let start = Instant::now();
    validate_closing_cost_input(input)?;

    let warnings = vec![
        "Fees are estimated as fixed shares of the home price; lender quotes will differ"
            .to_string(),
    ];

    let output = estimate_closing_costs(input.home_price, input.down_payment);

    debug!(
        home_price = %input.home_price,
        total_closing_costs = %output.total_closing_costs,
        total_cash_to_close = %output.total_cash_to_close,
        "closing costs estimated"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closing Disclosure fee ratios of home price",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_closing_cost_input(input: &ClosingCostInput) -> FirstKeyResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "home_price",
            "Home price must be positive",
        ));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if input.down_payment > input.home_price {
        return Err(FirstKeyError::invalid(
            "down_payment",
            "Down payment cannot exceed the home price",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_cash_to_close() {
        let b = estimate_closing_costs(dec!(540000), dec!(108000));
        assert_eq!(b.loan_amount, dec!(432000));
        assert_eq!(b.total_loan_costs, dec!(16422.048));
        assert_eq!(b.total_other_costs, dec!(10784.88));
        assert_eq!(b.lender_credits, dec!(-860.76));
        assert_eq!(b.total_closing_costs, dec!(26346.168));
        assert_eq!(b.total_cash_to_close, dec!(134346.168));
        assert_eq!(b.closing_costs_pct.round_dp(5), dec!(4.87892));
    }

    #[test]
    fn test_line_item_amounts() {
        let b = estimate_closing_costs(dec!(540000), dec!(108000));
        assert_eq!(b.line_items.len(), 22);
        assert_eq!(b.amount("appraisal_fee"), Some(dec!(579.96)));
        assert_eq!(b.amount("homeowners_insurance_12mo"), Some(dec!(5400)));
        assert_eq!(b.amount("missing"), None);
    }

    #[test]
    fn test_totals_match_line_items() {
        let b = estimate_closing_costs(dec!(412345), dec!(20000));
        let sum: Money = b.line_items.iter().map(|i| i.amount).sum();
        assert_eq!(sum, b.total_closing_costs);
        assert_eq!(
            b.section_total(ClosingCostSection::Prepaids),
            dec!(412345) * dec!(0.011459)
        );
    }

    #[test]
    fn test_ratio_sums() {
        let loan: Rate = FEE_TABLE
            .iter()
            .filter(|f| f.section.is_loan_cost())
            .map(|f| f.ratio)
            .sum();
        let other: Rate = FEE_TABLE
            .iter()
            .filter(|f| f.section.is_other_cost())
            .map(|f| f.ratio)
            .sum();
        assert_eq!(loan, dec!(0.0304112));
        assert_eq!(other, dec!(0.019972));
    }

    #[test]
    fn test_zero_price_has_no_costs() {
        let b = estimate_closing_costs(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(b.total_closing_costs, Decimal::ZERO);
        assert_eq!(b.closing_costs_pct, Decimal::ZERO);
    }

    #[test]
    fn test_analyze_rejects_down_payment_above_price() {
        let input = ClosingCostInput {
            home_price: dec!(300000),
            down_payment: dec!(300001),
        };
        assert!(analyze_closing_costs(&input).is_err());
    }
}
