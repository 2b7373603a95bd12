//! Lenient repair of almost-JSON.
//!
//! Models frequently emit Python-flavoured literals: single quotes, bare
//! keys, `True`/`None`, trailing commas, typographic quotes. [`repair_json`]
//! rewrites those into strict JSON text; the caller still runs the strict
//! parser on the result, so repair can never produce a value that the strict
//! parser would not accept.

use praxis_contracts::action::Arguments;
use serde_json::Value;

/// Rewrite common near-JSON forms into strict JSON text.
pub fn repair_json(text: &str) -> String {
    let text = normalize_quotes(text);
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                let end = string_end(&chars, i, '"');
                out.extend(&chars[i..end]);
                i = end;
            }
            '\'' => {
                let end = string_end(&chars, i, '\'');
                let inner_end = if end > i + 1 && chars[end - 1] == '\'' { end - 1 } else { end };
                push_json_string(&mut out, &chars[i + 1..inner_end]);
                i = end;
            }
            ',' => {
                if !matches!(next_significant(&chars, i + 1), Some('}') | Some(']')) {
                    out.push(',');
                }
                i += 1;
            }
            c if (c.is_alphabetic() || c == '_') && !continues_number(&chars, i) => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if next_significant(&chars, i) == Some(':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&literal(&word));
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Parse `text` as a JSON object, falling back to [`repair_json`].
pub fn parse_object_lenient(text: &str) -> Option<Arguments> {
    parse_strict(text).or_else(|| parse_strict(&repair_json(text)))
}

/// Strict parse that only accepts a JSON object.
pub fn parse_strict(text: &str) -> Option<Arguments> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
            other => other,
        })
        .collect()
}

/// Index one past the closing quote of the string opened at `start`, or the
/// end of input if the string never closes.
fn string_end(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// Exponent markers such as the `e` in `1e5` belong to the number literal.
fn continues_number(chars: &[char], i: usize) -> bool {
    i > 0 && (chars[i - 1].is_ascii_digit() || chars[i - 1] == '.')
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

/// Re-encode the body of a single-quoted string as a JSON string literal.
fn push_json_string(out: &mut String, body: &[char]) {
    out.push('"');
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            '\\' if body.get(i + 1) == Some(&'\'') => {
                out.push('\'');
                i += 2;
                continue;
            }
            '\\' => {
                out.push('\\');
                if let Some(next) = body.get(i + 1) {
                    out.push(*next);
                }
                i += 2;
                continue;
            }
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
        i += 1;
    }
    out.push('"');
}

/// Map Python-style literals; any other bare word becomes a string.
fn literal(word: &str) -> String {
    match word {
        "true" | "True" | "TRUE" => "true".to_string(),
        "false" | "False" | "FALSE" => "false".to_string(),
        "null" | "None" | "none" | "NULL" | "nil" => "null".to_string(),
        other => format!("\"{other}\""),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
