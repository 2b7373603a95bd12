//! Runtime configuration for the reference agent.
//!
//! One TOML document carries the agent identity (`[agent]`), the goal-run
//! settings (`[driver]`) and every governance section understood by
//! `GovernanceConfig` (`[trust]`, `[review]`, `[reasoning]`, `[[axioms]]`).
//! Omitted sections fall back to the built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use praxis_contracts::{
    error::{PraxisError, PraxisResult},
    trust::TrustLevel,
};
use praxis_core::{AgentSettings, DriverSettings};
use praxis_policy::{Governance, GovernanceConfig};

/// The embedded plant-control configuration.
pub const INDUSTRIAL_CONFIG: &str = include_str!("../config/industrial.toml");

/// The full runtime document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub driver: DriverSettings,
    #[serde(flatten)]
    pub governance: GovernanceConfig,
}

impl RuntimeConfig {
    /// Parse `s` as a TOML runtime document.
    pub fn from_toml_str(s: &str) -> PraxisResult<Self> {
        toml::from_str(s).map_err(|e| PraxisError::ConfigError {
            reason: format!("failed to parse runtime TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> PraxisResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PraxisError::ConfigError {
            reason: format!("failed to read runtime file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded plant-control configuration.
    pub fn industrial() -> PraxisResult<Self> {
        Self::from_toml_str(INDUSTRIAL_CONFIG)
    }

    /// Same document with the trust level replaced.
    pub fn with_trust_level(mut self, level: TrustLevel) -> Self {
        self.governance.trust.level = level;
        self
    }

    pub fn governance(&self) -> Governance {
        self.governance.build()
    }
}
