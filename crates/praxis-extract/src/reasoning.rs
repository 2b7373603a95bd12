//! Isolation of explicitly delimited reasoning, e.g. `<think>...</think>`.

/// Delimiter tags recognized by default.
pub const DEFAULT_REASONING_TAGS: &[&str] = &["think", "thinking", "reasoning", "thought"];

/// Output text split into its delimited reasoning and the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Content of the first closed reasoning block, trimmed.
    pub reasoning: Option<String>,
    /// Everything outside that block.
    pub body: String,
}

/// Split off the earliest closed `<tag>...</tag>` block among `tags`.
///
/// Tag matching ignores ASCII case. An opening tag with no closing tag is
/// left in place.
pub fn split_reasoning(text: &str, tags: &[String]) -> Split {
    let lowered = text.to_ascii_lowercase();

    let earliest = tags
        .iter()
        .filter_map(|tag| {
            let open = format!("<{}>", tag.to_ascii_lowercase());
            let close = format!("</{}>", tag.to_ascii_lowercase());
            let start = lowered.find(&open)?;
            let inner_start = start + open.len();
            let inner_end = inner_start + lowered[inner_start..].find(&close)?;
            Some((start, inner_start, inner_end, inner_end + close.len()))
        })
        .min_by_key(|(start, ..)| *start);

    match earliest {
        Some((start, inner_start, inner_end, end)) => {
            let reasoning = text[inner_start..inner_end].trim();
            Split {
                reasoning: (!reasoning.is_empty()).then(|| reasoning.to_string()),
                body: format!("{}{}", &text[..start], &text[end..]),
            }
        }
        None => Split {
            reasoning: None,
            body: text.to_string(),
        },
    }
}

/// Remove markdown code-fence markers (and their language tags), keeping
/// the fenced content.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find("```") {
        out.push_str(&rest[..at]);
        rest = &rest[at + 3..];
        let tag_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        rest = &rest[tag_len..];
    }
    out.push_str(rest);
    out
}
