//! Trust levels and tool risk tiers.
//!
//! A trust level is fixed when an agent is constructed and is never elevated
//! at runtime. It caps which risk tiers the agent may call at all, before any
//! axiom or human review is consulted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The capability ceiling of one agent instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    /// Only low-risk tools.
    Isolated,
    /// Low and medium risk tools.
    #[default]
    Standard,
    /// Every tool.
    Full,
}

impl TrustLevel {
    /// Return true if this level may call tools of the given tier.
    pub fn permits(self, tier: RiskTier) -> bool {
        match self {
            TrustLevel::Isolated => tier == RiskTier::Low,
            TrustLevel::Standard => tier != RiskTier::High,
            TrustLevel::Full => true,
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrustLevel::Isolated => "isolated",
            TrustLevel::Standard => "standard",
            TrustLevel::Full => "full",
        };
        f.write_str(s)
    }
}

/// Static risk classification of a tool name. Unclassified tools are `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}
