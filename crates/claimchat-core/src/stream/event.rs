//! Line classification and delta extraction for the completion event stream.
//!
//! Each meaningful line has the form `data: <JSON>`; the JSON carries the
//! incremental text at `choices[0].delta.content`. Lines starting with `:`
//! are comments/keep-alives. `data: [DONE]` terminates the stream.

use serde_json::Value;

/// Prefix of a data-bearing line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload of the terminator line.
pub const DONE_PAYLOAD: &str = "[DONE]";

/// JSON pointer to the incremental text in a completion chunk.
const DELTA_CONTENT_POINTER: &str = "/choices/0/delta/content";

/// What a single line means to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank line, comment, or a field this client does not use.
    Ignored,
    /// `data: [DONE]`.
    Terminator,
    /// Trimmed payload of a `data: ` line.
    Data(&'a str),
}

/// Classify one framed line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with(':') || line.trim().is_empty() {
        return LineKind::Ignored;
    }
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return LineKind::Ignored;
    };

    let payload = rest.trim();
    if payload == DONE_PAYLOAD {
        LineKind::Terminator
    } else if payload.is_empty() {
        LineKind::Ignored
    } else {
        LineKind::Data(payload)
    }
}

/// Result of extracting text from one data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    /// A non-empty text fragment.
    Text(String),
    /// Valid JSON without text at the delta path (role header, finish
    /// reason, usage chunk, ...).
    NoContent,
    /// The payload did not parse; it is assumed to be cut short.
    Incomplete,
}

/// Parse a data payload and pull out its text fragment.
///
/// Shapes other than the expected one are accepted; anything not at
/// `choices[0].delta.content` is ignored.
pub fn extract_delta(payload: &str) -> Delta {
    let Ok(value) = serde_json::from_str::<Value>(payload) else {
        return Delta::Incomplete;
    };

    match value.pointer(DELTA_CONTENT_POINTER).and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Delta::Text(text.to_owned()),
        _ => Delta::NoContent,
    }
}
