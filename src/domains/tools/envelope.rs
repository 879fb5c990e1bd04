//! Result envelope rendering.
//!
//! Successes become pretty-printed JSON text. Failures become
//! `{"error": message, "kind": kind}` with `is_error` set, so a client
//! always receives exactly one JSON text payload per call.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

use super::error::ToolResult;

/// Render a tool outcome into an MCP call result.
pub fn into_call_result(result: ToolResult<Value>) -> CallToolResult {
    match result {
        Ok(value) => CallToolResult::success(vec![Content::text(to_text(&value))]),
        Err(err) => CallToolResult::error(vec![Content::text(err.to_payload().to_string())]),
    }
}

fn to_text(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Parse the JSON payload back out of a rendered result.
#[cfg(test)]
pub(crate) fn payload_of(result: &CallToolResult) -> Value {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => serde_json::from_str(&text.text).unwrap(),
        _ => panic!("Expected text content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;
    use serde_json::json;

    #[test]
    fn test_success_is_plain_json() {
        let result = into_call_result(Ok(json!({"tables": ["users"]})));
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(payload_of(&result), json!({"tables": ["users"]}));
    }

    #[test]
    fn test_failure_is_error_envelope() {
        let result = into_call_result(Err(ToolError::not_found("File not found: /tmp/x")));
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(
            payload_of(&result),
            json!({"error": "File not found: /tmp/x", "kind": "not_found"})
        );
    }
}
