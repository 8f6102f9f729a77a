use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_core::amortization::LoanConfiguration;
use mortgage_core::lookup::{RateQuote, TaxRateInfo};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_config(input_json: &str) -> NapiResult<LoanConfiguration> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let config = parse_config(&input_json)?;
    let output =
        mortgage_core::amortization::compute_schedule(&config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn apply_loan_program(input_json: String) -> NapiResult<String> {
    let config = parse_config(&input_json)?;
    let adjusted = mortgage_core::amortization::loan_programs::apply_loan_program(&config);
    serde_json::to_string(&adjusted).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_terms(input_json: String, quote_json: String) -> NapiResult<String> {
    let config = parse_config(&input_json)?;
    let quote: RateQuote = serde_json::from_str(&quote_json).map_err(to_napi_error)?;
    let output =
        mortgage_core::comparison::compare_terms(&config, &quote).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(scenario_a_json: String, scenario_b_json: String) -> NapiResult<String> {
    let a = parse_config(&scenario_a_json)?;
    let b = parse_config(&scenario_b_json)?;
    let output = mortgage_core::comparison::compare_scenarios(&a, &b).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Annual property tax for a price, given a tax-rate lookup result as JSON.
#[napi]
pub fn property_tax(tax_info_json: String, home_price: String) -> NapiResult<String> {
    let info: TaxRateInfo = serde_json::from_str(&tax_info_json).map_err(to_napi_error)?;
    info.validate().map_err(to_napi_error)?;
    let price = home_price
        .parse::<rust_decimal::Decimal>()
        .map_err(to_napi_error)?;
    let annual = info.annual_tax_for(price).map_err(to_napi_error)?;
    Ok(annual.to_string())
}
