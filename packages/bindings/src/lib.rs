use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use kommwert_core::config::ModelConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Defaults when `config_json` is absent or empty.
fn parse_config(config_json: Option<String>) -> NapiResult<ModelConfig> {
    let config = match config_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => {
            serde_json::from_str::<ModelConfig>(json).map_err(to_napi_error)?
        }
        _ => ModelConfig::default(),
    };
    config.validate().map_err(to_napi_error)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Estimate
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_revenue(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: kommwert_core::revenue::estimate::EstimateInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = kommwert_core::revenue::estimate::estimate_municipal_revenue(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn normalize_capacities(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: kommwert_core::capacity::normalizer::NormalizeInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output =
        kommwert_core::capacity::normalizer::normalize_capacities(&input, &config.capacity)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_scenario(input_json: String) -> NapiResult<String> {
    let input: kommwert_core::simulation::profit::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        kommwert_core::simulation::profit::run_simulation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TradeTaxRequest {
    profit: Decimal,
    tax_free_allowance: Decimal,
    base_rate: Decimal,
    municipal_multiplier: Decimal,
}

/// Income as a decimal string, e.g. `"40000"`; returns the tax as a string.
#[napi]
pub fn personal_income_tax(income: String) -> NapiResult<String> {
    let income: Decimal = income.trim().parse().map_err(to_napi_error)?;
    let tax = kommwert_core::tax::income_tax::personal_income_tax(income).map_err(to_napi_error)?;
    Ok(tax.to_string())
}

#[napi]
pub fn trade_tax(input_json: String) -> NapiResult<String> {
    let req: TradeTaxRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = kommwert_core::tax::trade_tax::trade_tax(
        req.profit,
        req.tax_free_allowance,
        req.base_rate,
        req.municipal_multiplier,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}
