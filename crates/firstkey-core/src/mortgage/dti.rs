use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::error::FirstKeyError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FirstKeyResult;

/// Back-end ratio above which most conventional lenders decline.
pub const BACK_END_WARNING_PCT: Decimal = dec!(43);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Front-end (housing only) and back-end (housing plus other debts) ratios,
/// both as percentages of gross monthly income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DtiSnapshot {
    pub front_end_dti: Percent,
    pub back_end_dti: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl DtiStatus {
    /// Tier for a single ratio. Upper bounds are inclusive.
    pub fn classify(dti: Percent) -> Self {
        if dti <= dec!(28) {
            DtiStatus::Excellent
        } else if dti <= dec!(36) {
            DtiStatus::Good
        } else if dti <= dec!(43) {
            DtiStatus::Fair
        } else if dti <= dec!(50) {
            DtiStatus::Poor
        } else {
            DtiStatus::VeryPoor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DtiStatus::Excellent => "Excellent",
            DtiStatus::Good => "Good",
            DtiStatus::Fair => "Fair",
            DtiStatus::Poor => "Poor",
            DtiStatus::VeryPoor => "Very Poor",
        }
    }
}

impl fmt::Display for DtiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiInput {
    /// Full required housing payment (PITI + PMI + HOA).
    pub required_monthly_payment: Money,
    pub other_monthly_debts: Money,
    pub monthly_income: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiAnalysis {
    pub snapshot: DtiSnapshot,
    pub front_end_status: DtiStatus,
    pub back_end_status: DtiStatus,
    pub total_monthly_debt: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Both ratios are zero when income is zero or negative.
pub fn calculate_dti(
    required_monthly_payment: Money,
    other_monthly_debts: Money,
    monthly_income: Money,
) -> DtiSnapshot {
    if monthly_income <= Decimal::ZERO {
        return DtiSnapshot {
            front_end_dti: Decimal::ZERO,
            back_end_dti: Decimal::ZERO,
        };
    }
    DtiSnapshot {
        front_end_dti: required_monthly_payment / monthly_income * dec!(100),
        back_end_dti: (required_monthly_payment + other_monthly_debts) / monthly_income
            * dec!(100),
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

pub fn analyze_dti(input: &DtiInput) -> FirstKeyResult<ComputationOutput<DtiAnalysis>> {
    let start = Instant::now();
    validate_dti_input(input)?;

    let mut warnings: Vec<String> = Vec::new();
    if input.monthly_income <= Decimal::ZERO {
        warnings.push("Monthly income is zero; ratios reported as 0".to_string());
    }

    let snapshot = calculate_dti(
        input.required_monthly_payment,
        input.other_monthly_debts,
        input.monthly_income,
    );
    if snapshot.back_end_dti > BACK_END_WARNING_PCT {
        warnings.push(format!(
            "Back-end DTI of {:.1}% exceeds the {BACK_END_WARNING_PCT}% conventional limit",
            snapshot.back_end_dti
        ));
    }

    debug!(
        front_end = %snapshot.front_end_dti,
        back_end = %snapshot.back_end_dti,
        "dti calculated"
    );

    let output = DtiAnalysis {
        front_end_status: DtiStatus::classify(snapshot.front_end_dti),
        back_end_status: DtiStatus::classify(snapshot.back_end_dti),
        total_monthly_debt: input.required_monthly_payment + input.other_monthly_debts,
        snapshot,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Front-end and back-end debt-to-income",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_dti_input(input: &DtiInput) -> FirstKeyResult<()> {
    if input.required_monthly_payment < Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "required_monthly_payment",
            "Monthly payment cannot be negative",
        ));
    }
    if input.other_monthly_debts < Decimal::ZERO {
        return Err(FirstKeyError::invalid(
            "other_monthly_debts",
            "Other debts cannot be negative",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
