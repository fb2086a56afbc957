//! Text extraction from loosely structured model output
//!
//! The upstream payload shape varies between the Responses API and workflow
//! runs, so extraction walks a fixed list of known locations and always ends
//! with some non-empty string.

use serde_json::Value;

/// Returned when nothing usable came back
pub const PLACEHOLDER_TEXT: &str =
    "I'm here, but I didn't get any text back. Try asking again in different words.";

/// Field holding the aggregated text in Responses payloads
const PRIMARY_FIELD: &str = "output_text";
/// Other single-field locations, checked in order
const ALTERNATE_FIELDS: &[&str] = &["text", "result"];
/// Content part types that carry text
const TEXT_PART_TYPES: &[&str] = &["output_text", "text"];

/// What to do when no text field is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFallback {
    /// Return the compact JSON of the payload
    Serialize,
    /// Go straight to the placeholder
    Placeholder,
}

/// Extract display text from an upstream result. Never returns an empty
/// string.
pub fn extract_text(value: &Value, fallback: RawFallback) -> String {
    if let Some(text) = non_empty(value.as_str()) {
        return text;
    }
    if let Some(text) = non_empty(value.get(PRIMARY_FIELD).and_then(Value::as_str)) {
        return text;
    }
    for field in ALTERNATE_FIELDS {
        if let Some(text) = non_empty(value.get(*field).and_then(text_of)) {
            return text;
        }
    }
    if let Some(text) = non_empty(Some(flatten_content(value).as_str())) {
        return text;
    }
    if fallback == RawFallback::Serialize && !is_blank(value) {
        return value.to_string();
    }
    PLACEHOLDER_TEXT.to_string()
}

/// Join text parts from `output[*].content[*]` and a top-level `content`
/// array, newline separated. A bare array is read as the `output` item list.
fn flatten_content(value: &Value) -> String {
    let items = match value {
        Value::Array(items) => Some(items),
        other => other.get("output").and_then(Value::as_array),
    };
    let from_output = items
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten();
    let top_level = value
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();

    from_output
        .chain(top_level)
        .filter(|part| {
            part.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| TEXT_PART_TYPES.contains(&t))
        })
        .filter_map(|part| part.get("text").and_then(text_of))
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A text value is either a plain string or an object with a string `value`
fn text_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("value").and_then(Value::as_str),
        _ => None,
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
