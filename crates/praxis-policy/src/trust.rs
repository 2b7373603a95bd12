//! The trust gate.
//!
//! A pure function of the agent's fixed `TrustLevel` and a static risk table.
//! Trust is a hard boundary: the executor consults this gate before any
//! review, reasoning, or axiom check.

use std::collections::BTreeSet;

use tracing::warn;

use praxis_contracts::trust::{RiskTier, TrustLevel};

/// Default high-risk tools: require `Full` trust.
pub const DEFAULT_HIGH_RISK: &[&str] = &["shell_command", "file_system", "web_browser"];

/// Default medium-risk tools: require `Standard` trust or above.
pub const DEFAULT_MEDIUM_RISK: &[&str] = &["read_file", "search_web"];

/// Static classification of tool names into risk tiers.
///
/// Names are compared case-insensitively. A name listed in both tiers is
/// treated as high risk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskTable {
    high: BTreeSet<String>,
    medium: BTreeSet<String>,
}

impl RiskTable {
    pub fn new<I, J, S, T>(high: I, medium: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            high: high.into_iter().map(|s| normalize(s.as_ref())).collect(),
            medium: medium.into_iter().map(|s| normalize(s.as_ref())).collect(),
        }
    }

    /// The risk tier of `tool_name`. Unclassified tools are low risk.
    pub fn classify(&self, tool_name: &str) -> RiskTier {
        let name = normalize(tool_name);
        if self.high.contains(&name) {
            RiskTier::High
        } else if self.medium.contains(&name) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl Default for RiskTable {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_RISK.iter(), DEFAULT_MEDIUM_RISK.iter())
    }
}

/// Capability allow-list keyed by a fixed trust level.
#[derive(Debug, Clone)]
pub struct TrustGate {
    level: TrustLevel,
    table: RiskTable,
}

impl TrustGate {
    pub fn new(level: TrustLevel, table: RiskTable) -> Self {
        Self { level, table }
    }

    /// A gate at `level` using the default risk table.
    pub fn with_level(level: TrustLevel) -> Self {
        Self::new(level, RiskTable::default())
    }

    pub fn level(&self) -> TrustLevel {
        self.level
    }

    pub fn risk_of(&self, tool_name: &str) -> RiskTier {
        self.table.classify(tool_name)
    }

    /// Return true if the agent may call `tool_name` at all.
    pub fn can_execute(&self, tool_name: &str) -> bool {
        let tier = self.table.classify(tool_name);
        let allowed = self.level.permits(tier);
        if !allowed {
            warn!(
                tool = %tool_name,
                tier = ?tier,
                level = %self.level,
                "tool denied by trust level"
            );
        }
        allowed
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

// ── Tests ────────────────────────────────────────────────────────────────────
