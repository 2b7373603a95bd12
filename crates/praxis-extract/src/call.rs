//! Function-call syntax recognition: `tool_name({...})` and
//! `tool_name(key="value", other=3)`.
//!
//! Only identifiers that resolve against the tool catalog are considered, so
//! ordinary prose with parentheses is never mistaken for a call.

use std::ops::Range;

use praxis_contracts::{action::Arguments, catalog::ToolCatalog};
use serde_json::Value;

use crate::repair::{parse_object_lenient, repair_json};
use crate::scan::{closing_index, split_top_level, top_level_assignment};

/// A call recognized in free text.
#[derive(Debug, Clone, PartialEq)]
pub struct CallMatch {
    /// Canonical catalog name.
    pub name: String,
    pub arguments: Arguments,
    /// Byte range of the whole call, name through closing parenthesis.
    pub span: Range<usize>,
}

/// First well-formed call to a catalog tool in `text`, in document order.
pub fn find_call(text: &str, catalog: &ToolCatalog) -> Option<CallMatch> {
    identifiers(text).find_map(|ident| {
        let entry = catalog.resolve(&text[ident.clone()])?;
        let open = text[ident.end..]
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .filter(|(_, c)| *c == '(')
            .map(|(offset, _)| ident.end + offset)?;
        let close = closing_index(text, open, '(', ')')?;
        let arguments = parse_call_arguments(&text[open + 1..close])?;
        Some(CallMatch {
            name: entry.name.clone(),
            arguments,
            span: ident.start..close + 1,
        })
    })
}

/// Maximal runs of identifier characters.
fn identifiers(text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '-';
    let mut rest = 0;
    std::iter::from_fn(move || {
        let start = rest + text[rest..].find(is_ident)?;
        let end = text[start..]
            .find(|c: char| !is_ident(c))
            .map_or(text.len(), |offset| start + offset);
        rest = end;
        Some(start..end)
    })
}

/// Parse the text between the parentheses.
///
/// Empty means no arguments; a leading `{` means a single JSON object;
/// otherwise every comma-separated segment must be `key=value` or
/// `key: value`. Any positional argument makes the whole call unusable.
fn parse_call_arguments(inner: &str) -> Option<Arguments> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Some(Arguments::new());
    }
    if inner.starts_with('{') {
        return parse_object_lenient(inner);
    }

    let mut arguments = Arguments::new();
    for segment in split_top_level(inner, ',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let at = top_level_assignment(segment)?;
        let key = unquote(segment[..at].trim());
        if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return None;
        }
        arguments.insert(key.to_string(), parse_value(segment[at + 1..].trim()));
    }
    Some(arguments)
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner;
        }
    }
    text
}

/// Interpret a keyword-argument value.
///
/// Quoted text becomes a string, JSON literals keep their type, Python
/// literals are mapped, and anything else is taken verbatim as a string.
fn parse_value(raw: &str) -> Value {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return serde_json::from_str::<String>(raw)
            .map(Value::String)
            .unwrap_or_else(|_| Value::String(raw[1..raw.len() - 1].to_string()));
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return Value::String(raw[1..raw.len() - 1].replace("\\'", "'"));
    }
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return value;
    }
    match raw {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        "None" => return Value::Null,
        _ => {}
    }
    if raw.starts_with('{') || raw.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(&repair_json(raw)) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

// ── Tests ────────────────────────────────────────────────────────────────────
