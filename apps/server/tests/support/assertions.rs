use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "{context}: unexpected status {actual}");
}

/// Assert a successful listing envelope and return its rows.
pub fn listing_rows(body: &Value) -> anyhow::Result<&Vec<Value>> {
    assert_eq!(body["success"], Value::Bool(true), "expected success: {body}");
    body.get("data")
        .and_then(Value::as_array)
        .context("listing data is array")
}

pub fn listing_total(body: &Value) -> anyhow::Result<u64> {
    body.pointer("/meta/total")
        .and_then(Value::as_u64)
        .context("meta.total is a number")
}

/// `postName` of every row, in order.
pub fn post_names(body: &Value) -> anyhow::Result<Vec<String>> {
    Ok(listing_rows(body)?
        .iter()
        .filter_map(|row| row["postName"].as_str().map(str::to_string))
        .collect())
}

/// Assert the error envelope and return the first error message entry.
pub fn assert_error_envelope(body: &Value) -> anyhow::Result<&Value> {
    assert_eq!(body["success"], Value::Bool(false), "expected failure: {body}");
    assert!(body["message"].is_string(), "message is string: {body}");
    body.pointer("/errorMessages/0")
        .context("errorMessages has an entry")
}
