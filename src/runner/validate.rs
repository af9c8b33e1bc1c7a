//! Response validation against a test case's expectations

use serde_json::Value;

use crate::plan::TestCase;

use super::http::HttpResponse;

/// Message recorded for a passing test
pub const PASS_MESSAGE: &str = "All validations passed";

/// Outcome of validating one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub passed: bool,
    pub message: String,
}

/// Check status, body and headers; every violation is collected
///
/// `contains`/`contains_keys` only apply when the body is a JSON object.
/// `expected_headers` are checked for presence; the declared type hint is
/// not compared.
pub fn validate(case: &TestCase, response: &HttpResponse) -> Validation {
    let mut errors = Vec::new();

    if let Some(expected) = case.expected_status() {
        if i64::from(response.status) != expected {
            errors.push(format!(
                "Status code mismatch: expected {}, got {}",
                expected, response.status
            ));
        }
    }

    if let Some(expected) = case.expected_response() {
        let data = response.json_or_text();

        if let (Some(fields), Some(object)) = (&expected.contains, data.as_object()) {
            for field in fields {
                if !object.contains_key(field) {
                    errors.push(format!("Response missing expected field: {}", field));
                }
            }
        }

        if let Some(shape) = expected.shape() {
            if !shape.matches(&data) {
                errors.push(format!(
                    "Response type mismatch: expected {}, got {}",
                    shape.as_str(),
                    json_type_name(&data)
                ));
            }
        }

        if let (Some(keys), Some(object)) = (&expected.contains_keys, data.as_object()) {
            for key in keys {
                if !object.contains_key(key) {
                    errors.push(format!("Response missing expected key: {}", key));
                }
            }
        }
    }

    for header in case.expected_headers() {
        if !response.headers.contains_key(header) {
            errors.push(format!("Response missing expected header: {}", header));
        }
    }

    if errors.is_empty() {
        Validation {
            passed: true,
            message: PASS_MESSAGE.to_string(),
        }
    } else {
        Validation {
            passed: false,
            message: errors.join("; "),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
