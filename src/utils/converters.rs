use crate::utils::error::{Result, SuiteError};
use serde_json::{Map, Value};

/// Parses JSON text into a mapping. Malformed input and non-object documents are rejected.
pub fn json_to_map(text: &str, context: &str) -> Result<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| SuiteError::MalformedJsonError {
            context: context.to_string(),
            source,
        })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(SuiteError::UnexpectedResponseError {
            operation: context.to_string(),
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
