use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use firstkey_core::formatting;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(value: &str) -> NapiResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_mortgage(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::mortgage::analysis::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        firstkey_core::mortgage::analysis::analyze_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn monthly_cost(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::mortgage::monthly_cost::MonthlyCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = firstkey_core::mortgage::monthly_cost::analyze_monthly_cost(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn debt_to_income(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::mortgage::dti::DtiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = firstkey_core::mortgage::dti::analyze_dti(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn pre_qualification(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::mortgage::prequalification::PreQualificationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = firstkey_core::mortgage::prequalification::analyze_pre_qualification(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::amortization::schedule::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = firstkey_core::amortization::schedule::analyze_amortization(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payment_strategies(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::amortization::biweekly::PaymentStrategyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = firstkey_core::amortization::biweekly::analyze_payment_strategies(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Refinance
// ---------------------------------------------------------------------------

#[napi]
pub fn refinance_comparison(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::refinance::comparison::RefinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = firstkey_core::refinance::comparison::analyze_refinance(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cash to close
// ---------------------------------------------------------------------------

#[napi]
pub fn closing_costs(input_json: String) -> NapiResult<String> {
    let input: firstkey_core::closing_costs::estimator::ClosingCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = firstkey_core::closing_costs::estimator::analyze_closing_costs(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[napi]
pub fn default_inputs() -> NapiResult<String> {
    let defaults = firstkey_core::defaults::MortgageDefaults::default();
    serde_json::to_string(&defaults).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    Ok(formatting::format_currency(parse_decimal(&amount)?))
}

#[napi]
pub fn format_percentage(value: String) -> NapiResult<String> {
    Ok(formatting::format_percentage(parse_decimal(&value)?))
}

#[napi]
pub fn format_tax_rate(value: String) -> NapiResult<String> {
    Ok(formatting::format_tax_rate(parse_decimal(&value)?))
}

#[napi]
pub fn format_number(value: String) -> NapiResult<String> {
    Ok(formatting::format_number(parse_decimal(&value)?))
}

/// Decimal string for `"330,000"`; blank input reads as `"0"`.
#[napi]
pub fn parse_formatted_number(formatted: String) -> NapiResult<String> {
    formatting::parse_formatted_number(&formatted)
        .map(|d| d.to_string())
        .ok_or_else(|| to_napi_error(format!("'{}' is not a number", formatted)))
}
