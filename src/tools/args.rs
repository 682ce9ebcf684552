//! Argument checks shared by the tool handlers.
//!
//! Several tools take JSON as text (`rows`, `data`, `params`). These are parsed
//! and shape-checked here so that malformed input fails before any request.

use crate::error::{RestError, RestResult};
use serde_json::Value as JsonValue;

/// Trim a table or function name and reject it if empty.
pub fn require_name(field: &str, value: &str) -> RestResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RestError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Parse a text argument as JSON.
pub fn parse_json_text(field: &str, text: &str) -> RestResult<JsonValue> {
    serde_json::from_str(text)
        .map_err(|e| RestError::validation(format!("{} is not valid JSON: {}", field, e)))
}

/// Parse `rows` for insert: a JSON array of row objects, or a single row object.
pub fn parse_rows(text: &str) -> RestResult<JsonValue> {
    match parse_json_text("rows", text)? {
        rows @ (JsonValue::Array(_) | JsonValue::Object(_)) => Ok(rows),
        other => Err(RestError::validation(format!(
            "rows must be a JSON array of row objects, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Parse a text argument that must be a JSON object.
pub fn parse_object(field: &str, text: &str) -> RestResult<JsonValue> {
    match parse_json_text(field, text)? {
        object @ JsonValue::Object(_) => Ok(object),
        other => Err(RestError::validation(format!(
            "{} must be a JSON object, got {}",
            field,
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
