//! Best-effort extraction of an error message from a failed response body.
//!
//! Bodies come in a few shapes depending on who produced them:
//!
//! - upstream: `{"error": {"message": "..."}}`
//! - relay: `{"error": "Failed to get AI response", "openaiError": "<upstream body>"}`
//! - anything else, including plain text or an empty body

use serde_json::Value;

/// Pick the most specific message available in `body`.
///
/// Falls back to `fallback` (typically the status reason phrase) when the
/// body is empty.
pub fn parse_error_message(body: &str, fallback: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return fallback.to_string();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => message_from_value(&value).unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    if let Some(message) = value.pointer("/error/message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    // The relay wraps the upstream body as a string.
    if let Some(inner) = value.get("openaiError").and_then(Value::as_str) {
        let nested = serde_json::from_str::<Value>(inner)
            .ok()
            .and_then(|v| message_from_value(&v));
        return Some(nested.unwrap_or_else(|| inner.to_string()));
    }

    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}
