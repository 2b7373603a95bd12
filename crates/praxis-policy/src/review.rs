//! The human-review gate.
//!
//! Flags actions that need manual confirmation before they run: every call
//! to a configured critical tool, and any call whose argument values carry a
//! destructive-intent marker.

use std::collections::BTreeSet;

use praxis_contracts::action::Arguments;

use crate::rule::contains_text;

/// Default tools that always require human approval.
pub const DEFAULT_CRITICAL_TOOLS: &[&str] = &["shell_tool", "file_tool", "macos_tool"];

/// Default substrings that mark destructive intent in argument values.
pub const DEFAULT_DESTRUCTIVE_MARKERS: &[&str] = &["delete", "remove"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewGate {
    critical_tools: BTreeSet<String>,
    destructive_markers: Vec<String>,
}

impl ReviewGate {
    pub fn new<I, J, S, T>(critical_tools: I, destructive_markers: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            critical_tools: critical_tools
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
            destructive_markers: destructive_markers
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Return true if the call must be confirmed by a human first.
    pub fn requires_review(&self, tool_name: &str, arguments: &Arguments) -> bool {
        self.review_reason(tool_name, arguments).is_some()
    }

    /// Why the call needs review, or `None` if it does not.
    pub fn review_reason(&self, tool_name: &str, arguments: &Arguments) -> Option<String> {
        if self
            .critical_tools
            .contains(&tool_name.trim().to_lowercase())
        {
            return Some(format!(
                "tool '{tool_name}' is critical and requires manual approval"
            ));
        }

        self.destructive_markers
            .iter()
            .find(|marker| arguments.values().any(|v| contains_text(v, marker)))
            .map(|marker| {
                format!("arguments for '{tool_name}' contain destructive marker '{marker}'")
            })
    }
}

impl Default for ReviewGate {
    fn default() -> Self {
        Self::new(DEFAULT_CRITICAL_TOOLS.iter(), DEFAULT_DESTRUCTIVE_MARKERS.iter())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
