//! Bracket-balancing scanners.
//!
//! JSON objects nest, so their extent cannot be found with a pattern match.
//! These scanners walk the text once, tracking nesting depth and string
//! state, and report byte ranges of syntactically closed blocks.

use std::ops::Range;

/// Byte ranges of every top-level, balanced `{...}` block in `text`, in
/// document order.
///
/// Braces inside quoted strings do not count. An opener that is never closed
/// is skipped and scanning resumes just after it, so a stray `{` in prose does
/// not swallow a well-formed block that follows.
pub fn balanced_blocks(text: &str) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut from = 0;

    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        match closing_index(text, start, '{', '}') {
            Some(end) => {
                blocks.push(start..end + 1);
                from = end + 1;
            }
            None => from = start + 1,
        }
    }

    blocks
}

/// Index of the character that closes the bracket opened at `open_at`.
///
/// Tracks `()`, `[]` and `{}` together so mismatched inner brackets do not
/// end the block early, and skips over single- or double-quoted strings.
/// Returns `None` when the opener is never closed.
pub fn closing_index(text: &str, open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text[open_at..].char_indices() {
        let i = open_at + i;

        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' if depth > 0 && !is_apostrophe(text, i) => quote = Some(c),
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }

    None
}

/// A `'` between two letters (as in "don't") is prose, not a string quote.
fn is_apostrophe(text: &str, i: usize) -> bool {
    if !text[i..].starts_with('\'') {
        return false;
    }
    let before = text[..i].chars().next_back();
    let after = text[i + 1..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if b.is_alphanumeric() && a.is_alphanumeric())
}

/// Split `text` on `sep` wherever it occurs outside quotes and brackets.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if !is_apostrophe(text, i) => quote = Some(c),
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Byte index of the first `=` or `:` outside quotes and brackets.
pub fn top_level_assignment(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if !is_apostrophe(text, i) => quote = Some(c),
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            '=' | ':' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

// ── Tests ────────────────────────────────────────────────────────────────────
