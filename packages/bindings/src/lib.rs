use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Run the loan-first / invest-first / split comparison over a JSON
/// input document and return the full output envelope as JSON.
#[napi]
pub fn run_comparison(input_json: String) -> NapiResult<String> {
    let input: paydown_core::compare::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = paydown_core::compare::run_comparison(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
