//! TOML governance configuration.
//!
//! Every policy table the runtime consults is declared here so deployments
//! can swap them without code changes. Omitted sections fall back to the
//! built-in defaults.
//!
//! Example:
//! ```toml
//! [trust]
//! level = "standard"
//! high_risk = ["shell_command", "file_system"]
//!
//! [review]
//! critical_tools = ["shell_tool"]
//!
//! [[axioms]]
//! name = "no_root_wipe"
//! on_violation = "block"
//! rule = { type = "forbid_pattern", pattern = "rm -rf /" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use praxis_contracts::{
    error::{PraxisError, PraxisResult},
    trust::TrustLevel,
};

use crate::{
    axiom::{Axiom, AxiomRegistry, ViolationPolicy},
    reasoning::{ReasoningPolicy, DEFAULT_HIGH_STAKES_TOOLS, DEFAULT_MIN_REASONING_CHARS},
    review::{ReviewGate, DEFAULT_CRITICAL_TOOLS, DEFAULT_DESTRUCTIVE_MARKERS},
    rule::AxiomRule,
    trust::{RiskTable, TrustGate, DEFAULT_HIGH_RISK, DEFAULT_MEDIUM_RISK},
    Governance,
};

fn strings(defaults: &[&str]) -> Vec<String> {
    defaults.iter().map(|s| s.to_string()).collect()
}

/// `[trust]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    #[serde(default)]
    pub level: TrustLevel,
    #[serde(default = "default_high_risk")]
    pub high_risk: Vec<String>,
    #[serde(default = "default_medium_risk")]
    pub medium_risk: Vec<String>,
}

fn default_high_risk() -> Vec<String> {
    strings(DEFAULT_HIGH_RISK)
}

fn default_medium_risk() -> Vec<String> {
    strings(DEFAULT_MEDIUM_RISK)
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            level: TrustLevel::default(),
            high_risk: default_high_risk(),
            medium_risk: default_medium_risk(),
        }
    }
}

/// `[review]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_critical_tools")]
    pub critical_tools: Vec<String>,
    #[serde(default = "default_destructive_markers")]
    pub destructive_markers: Vec<String>,
}

fn default_critical_tools() -> Vec<String> {
    strings(DEFAULT_CRITICAL_TOOLS)
}

fn default_destructive_markers() -> Vec<String> {
    strings(DEFAULT_DESTRUCTIVE_MARKERS)
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            critical_tools: default_critical_tools(),
            destructive_markers: default_destructive_markers(),
        }
    }
}

/// `[reasoning]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningConfig {
    #[serde(default = "default_high_stakes_tools")]
    pub high_stakes_tools: Vec<String>,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_high_stakes_tools() -> Vec<String> {
    strings(DEFAULT_HIGH_STAKES_TOOLS)
}

fn default_min_chars() -> usize {
    DEFAULT_MIN_REASONING_CHARS
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            high_stakes_tools: default_high_stakes_tools(),
            min_chars: default_min_chars(),
        }
    }
}

/// One `[[axioms]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxiomSpec {
    pub name: String,
    #[serde(default)]
    pub on_violation: ViolationPolicy,
    /// Tools the axiom applies to. Empty means every tool.
    #[serde(default)]
    pub tools: Vec<String>,
    pub rule: AxiomRule,
}

impl AxiomSpec {
    pub fn to_axiom(&self) -> Axiom {
        Axiom::from_rule(self.name.clone(), self.on_violation, self.rule.clone())
            .for_tools(&self.tools)
    }
}

/// The full governance document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default)]
    pub trust: TrustConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub reasoning: ReasoningConfig,
    /// Declarative axioms, in evaluation order.
    #[serde(default)]
    pub axioms: Vec<AxiomSpec>,
}

impl GovernanceConfig {
    /// Parse `s` as a TOML governance document.
    ///
    /// Returns `PraxisError::ConfigError` if the TOML is malformed or does not
    /// match the expected schema.
    pub fn from_toml_str(s: &str) -> PraxisResult<Self> {
        toml::from_str(s).map_err(|e| PraxisError::ConfigError {
            reason: format!("failed to parse governance TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a governance document.
    pub fn from_file(path: &Path) -> PraxisResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PraxisError::ConfigError {
            reason: format!("failed to read governance file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build the runtime gates described by this document.
    pub fn build(&self) -> Governance {
        let mut axioms = AxiomRegistry::new();
        for spec in &self.axioms {
            axioms.register(spec.to_axiom());
        }

        Governance {
            trust: TrustGate::new(
                self.trust.level,
                RiskTable::new(&self.trust.high_risk, &self.trust.medium_risk),
            ),
            review: ReviewGate::new(&self.review.critical_tools, &self.review.destructive_markers),
            reasoning: ReasoningPolicy::new(
                &self.reasoning.high_stakes_tools,
                self.reasoning.min_chars,
            ),
            axioms,
        }
    }
}
