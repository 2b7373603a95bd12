//! # praxis-policy
//!
//! Deterministic governance for the praxis agent runtime.
//!
//! ## Overview
//!
//! Every proposed tool call passes through four independent gates, always in
//! this order:
//!
//! 1. [`TrustGate`]: hard capability ceiling keyed by the agent's trust level.
//! 2. [`ReviewGate`]: flags calls that need a human decision first.
//! 3. [`ReasoningPolicy`]: high-stakes tools need a real justification.
//! 4. [`AxiomRegistry`]: ordered rules that pass, patch, or veto arguments.
//!
//! The gates hold no mutable state after construction. [`Governance`] bundles
//! them for the executor; [`GovernanceConfig`] builds one from TOML.

pub mod axiom;
pub mod config;
pub mod reasoning;
pub mod review;
pub mod rule;
pub mod trust;

pub use axiom::{Axiom, AxiomRegistry, AxiomVerdict, AxiomViolation, ViolationPolicy};
pub use config::{AxiomSpec, GovernanceConfig};
pub use reasoning::ReasoningPolicy;
pub use review::ReviewGate;
pub use rule::AxiomRule;
pub use trust::{RiskTable, TrustGate};

use praxis_contracts::trust::TrustLevel;

/// The governance gates of one agent, fixed at construction.
#[derive(Debug)]
pub struct Governance {
    pub trust: TrustGate,
    pub review: ReviewGate,
    pub reasoning: ReasoningPolicy,
    pub axioms: AxiomRegistry,
}

impl Governance {
    /// Default tables at the given trust level, with no axioms.
    pub fn new(level: TrustLevel) -> Self {
        Self {
            trust: TrustGate::with_level(level),
            review: ReviewGate::default(),
            reasoning: ReasoningPolicy::default(),
            axioms: AxiomRegistry::new(),
        }
    }

    /// Register an axiom after the ones already present.
    pub fn with_axiom(mut self, axiom: Axiom) -> Self {
        self.axioms.register(axiom);
        self
    }

    pub fn with_review(mut self, review: ReviewGate) -> Self {
        self.review = review;
        self
    }

    pub fn with_reasoning(mut self, reasoning: ReasoningPolicy) -> Self {
        self.reasoning = reasoning;
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
