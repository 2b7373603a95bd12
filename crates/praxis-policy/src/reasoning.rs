//! Reasoning-quality policy for high-stakes tools.

use std::collections::BTreeSet;

/// Default tools that require an accompanying justification.
pub const DEFAULT_HIGH_STAKES_TOOLS: &[&str] = &["shell", "file_tool"];

/// Default minimum justification length, in characters.
pub const DEFAULT_MIN_REASONING_CHARS: usize = 5;

/// Requires non-trivial reasoning text before a high-stakes tool may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningPolicy {
    high_stakes_tools: BTreeSet<String>,
    min_chars: usize,
}

impl ReasoningPolicy {
    pub fn new<I, S>(high_stakes_tools: I, min_chars: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            high_stakes_tools: high_stakes_tools
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
            min_chars,
        }
    }

    pub fn is_high_stakes(&self, tool_name: &str) -> bool {
        self.high_stakes_tools
            .contains(&tool_name.trim().to_lowercase())
    }

    /// Return true if `reasoning` is adequate for calling `tool_name`.
    pub fn is_sufficient(&self, tool_name: &str, reasoning: &str) -> bool {
        !self.is_high_stakes(tool_name) || reasoning.trim().chars().count() >= self.min_chars
    }
}

impl Default for ReasoningPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_STAKES_TOOLS.iter(), DEFAULT_MIN_REASONING_CHARS)
    }
}
