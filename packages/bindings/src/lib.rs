use napi::Result as NapiResult;
use napi_derive::napi;

use fraud_scoring_core::scoring::engine::{self, ScoringInput};
use fraud_scoring_core::scoring::ScoringConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score a JSON scoring request (candidate, recent history, optional
/// threshold overrides) and return the JSON output envelope.
#[napi]
pub fn score_transaction(input_json: String) -> NapiResult<String> {
    let input: ScoringInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::score_transaction(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// The thresholds used when a request supplies no overrides.
#[napi]
pub fn default_scoring_config() -> NapiResult<String> {
    serde_json::to_string(&ScoringConfig::default()).map_err(to_napi_error)
}
