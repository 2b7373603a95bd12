//! Field-alias normalization for candidate tool-call objects.
//!
//! Different model families name the same fields differently. A candidate
//! object is reduced to `(name, arguments)` here; resolving the name against
//! the catalog happens in the extractor.

use praxis_contracts::action::Arguments;
use serde_json::Value;

use crate::repair::parse_object_lenient;

/// Keys that may carry the tool name, in priority order.
pub const NAME_KEYS: &[&str] = &["name", "tool", "tool_name", "action", "function"];

/// Keys that may carry the argument map, in priority order.
pub const ARGUMENT_KEYS: &[&str] = &["arguments", "parameters", "params", "args", "input"];

/// Wrapper keys whose value is itself a tool-call object.
const WRAPPER_KEYS: &[&str] = &["function", "tool_call", "function_call"];

/// A tool call pulled out of an object, before catalog resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub arguments: Arguments,
}

/// Reduce a parsed JSON value to a candidate tool call.
///
/// Accepts the flat shape (`{"name": .., "arguments": {..}}` and its
/// aliases), a wrapped shape (`{"function": {..}}`, `{"tool_call": {..}}`),
/// and the first element of a `tool_calls` array. A missing argument key
/// yields an empty map; arguments given as a JSON-encoded string are decoded.
pub fn candidate_from_value(value: &Value) -> Option<Candidate> {
    let object = value.as_object()?;

    for key in WRAPPER_KEYS {
        if let Some(inner @ Value::Object(_)) = object.get(*key) {
            if let Some(candidate) = candidate_from_value(inner) {
                return Some(candidate);
            }
        }
    }

    if let Some(Value::Array(calls)) = object.get("tool_calls") {
        if let Some(candidate) = calls.iter().find_map(candidate_from_value) {
            return Some(candidate);
        }
    }

    let name = NAME_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())?
        .to_string();

    let arguments = match ARGUMENT_KEYS.iter().find_map(|key| object.get(*key)) {
        None | Some(Value::Null) => Arguments::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(encoded)) if encoded.trim().is_empty() => Arguments::new(),
        Some(Value::String(encoded)) => parse_object_lenient(encoded)?,
        Some(_) => return None,
    };

    Some(Candidate { name, arguments })
}

// ── Tests ────────────────────────────────────────────────────────────────────
