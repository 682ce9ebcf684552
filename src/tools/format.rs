//! Output formatting for tool results.
//!
//! Every tool answers with one text block holding the response body as
//! pretty-printed JSON (two-space indent).

use serde_json::Value as JsonValue;

pub fn format_json_text(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
