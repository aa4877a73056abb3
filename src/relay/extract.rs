use serde_json::Value;

/// Fixed reply for a flow response no extractor recognizes. Shape
/// mismatch degrades to this string; it is never an error.
pub const UNRECOGNIZED_REPLY: &str =
    "I'm not sure about that. (no parsable text in the flow response)";

type Extractor = fn(&Value) -> Option<String>;

/// Candidate reply locations, tried in order; the first non-empty string
/// wins. Flow response shape varies by LangFlow deployment and flow
/// version, so the order is load-bearing: append, never reorder.
static EXTRACTORS: [Extractor; 8] = [
    |v| string_at(v, "/output_text"),
    |v| string_at(v, "/output"),
    |v| string_at(v, "/result"),
    |v| string_at(v, "/outputs/0/text"),
    |v| string_at(v, "/outputs/0/data/text"),
    |v| string_at(v, "/outputs/0/outputs/0/results/message/text"),
    |v| string_at(v, "/message"),
    first_string,
];

pub fn extract_reply(response: &Value) -> Option<String> {
    EXTRACTORS.iter().find_map(|extract| extract(response))
}

pub fn reply_or_fallback(response: &Value) -> String {
    extract_reply(response).unwrap_or_else(|| UNRECOGNIZED_REPLY.to_string())
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Last resort: depth-first walk for the first string with visible
/// content anywhere in the body.
fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.values().find_map(walk),
        Value::Array(items) => items.iter().find_map(walk),
        _ => None,
    }
}

fn walk(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(_) | Value::Array(_) => first_string(value),
        _ => None,
    }
}
