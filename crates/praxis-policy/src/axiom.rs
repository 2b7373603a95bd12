//! The axiom registry.
//!
//! Axioms are deterministic rules that run over a proposed action's
//! arguments before execution. Each one answers with an `AxiomVerdict`:
//!
//! - `Pass` → arguments unchanged, continue with the next axiom
//! - `Override(args)` → adopt `args` as the working copy; later axioms see the patch
//! - `Block` → veto, unless the axiom's policy is `Limit` or `Alert`
//!
//! Axioms run in registration order. A veto discards every patch made so
//! far; the caller never sees partially patched arguments.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use praxis_contracts::action::Arguments;

use crate::rule::AxiomRule;

/// How an axiom's block verdict is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// A block verdict vetoes the action.
    Block,
    /// The axiom normally rewrites arguments; a block verdict still vetoes.
    #[default]
    Override,
    /// Clamp-style axiom: overrides apply, a block verdict is only logged.
    Limit,
    /// Observation only: overrides apply, a block verdict is only logged.
    Alert,
}

impl ViolationPolicy {
    /// Return true if a block verdict under this policy stops the action.
    pub fn vetoes(self) -> bool {
        matches!(self, ViolationPolicy::Block | ViolationPolicy::Override)
    }
}

impl fmt::Display for ViolationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationPolicy::Block => "block",
            ViolationPolicy::Override => "override",
            ViolationPolicy::Limit => "limit",
            ViolationPolicy::Alert => "alert",
        };
        f.write_str(s)
    }
}

/// The answer of a single axiom.
#[derive(Debug, Clone, PartialEq)]
pub enum AxiomVerdict {
    Pass,
    Override(Arguments),
    Block,
}

impl From<bool> for AxiomVerdict {
    fn from(pass: bool) -> Self {
        if pass {
            AxiomVerdict::Pass
        } else {
            AxiomVerdict::Block
        }
    }
}

/// A caller-supplied axiom body.
pub type AxiomFn = Box<dyn Fn(&Arguments) -> AxiomVerdict + Send + Sync>;

enum AxiomCheck {
    Closure(AxiomFn),
    Rule(AxiomRule),
}

/// A named, deterministic predicate or transform over tool arguments.
pub struct Axiom {
    name: String,
    policy: ViolationPolicy,
    /// Lowercased tool names this axiom applies to. Empty means every tool.
    scope: Vec<String>,
    check: AxiomCheck,
}

impl Axiom {
    /// Build an axiom from a closure.
    pub fn new<F>(name: impl Into<String>, policy: ViolationPolicy, check: F) -> Self
    where
        F: Fn(&Arguments) -> AxiomVerdict + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            policy,
            scope: Vec::new(),
            check: AxiomCheck::Closure(Box::new(check)),
        }
    }

    /// Build an axiom from a declarative rule.
    pub fn from_rule(name: impl Into<String>, policy: ViolationPolicy, rule: AxiomRule) -> Self {
        Self {
            name: name.into(),
            policy,
            scope: Vec::new(),
            check: AxiomCheck::Rule(rule),
        }
    }

    /// Restrict the axiom to the given tools.
    pub fn for_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scope = tools
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> ViolationPolicy {
        self.policy
    }

    /// Return true if this axiom should inspect calls to `tool_name`.
    pub fn applies_to(&self, tool_name: &str) -> bool {
        self.scope.is_empty() || self.scope.contains(&tool_name.trim().to_lowercase())
    }

    /// Run the axiom body against `arguments`.
    pub fn evaluate(&self, arguments: &Arguments) -> AxiomVerdict {
        match &self.check {
            AxiomCheck::Closure(f) => f(arguments),
            AxiomCheck::Rule(rule) => rule.evaluate(arguments),
        }
    }
}

impl fmt::Debug for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axiom")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// An axiom vetoed the action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation blocked by safety axiom: {axiom}")]
pub struct AxiomViolation {
    /// Name of the axiom that blocked.
    pub axiom: String,
}

/// Ordered, construction-time collection of axioms.
///
/// Holds no mutable state once built, so it can be shared read-only across
/// turns.
#[derive(Debug, Default)]
pub struct AxiomRegistry {
    axioms: Vec<Axiom>,
}

impl AxiomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an axiom. Re-registering a name replaces the earlier axiom in
    /// its original position.
    pub fn register(&mut self, axiom: Axiom) {
        match self.axioms.iter_mut().find(|a| a.name == axiom.name) {
            Some(existing) => *existing = axiom,
            None => self.axioms.push(axiom),
        }
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    /// Axiom names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.axioms.iter().map(|a| a.name())
    }

    /// Run every applicable axiom against a working copy of `arguments`.
    ///
    /// Returns the (possibly patched) arguments, or the first vetoing axiom.
    pub fn validate(
        &self,
        tool_name: &str,
        arguments: &Arguments,
    ) -> Result<Arguments, AxiomViolation> {
        let mut working = arguments.clone();

        for axiom in self.axioms.iter().filter(|a| a.applies_to(tool_name)) {
            match axiom.evaluate(&working) {
                AxiomVerdict::Pass => {
                    debug!(axiom = %axiom.name, tool = %tool_name, "axiom passed");
                }

                AxiomVerdict::Override(patched) => {
                    if patched != working {
                        warn!(
                            axiom = %axiom.name,
                            tool = %tool_name,
                            before = %serde_json::Value::Object(working.clone()),
                            after = %serde_json::Value::Object(patched.clone()),
                            "axiom intervention: arguments overridden"
                        );
                    }
                    working = patched;
                }

                AxiomVerdict::Block if axiom.policy.vetoes() => {
                    warn!(
                        axiom = %axiom.name,
                        tool = %tool_name,
                        policy = %axiom.policy,
                        "axiom block: action vetoed"
                    );
                    return Err(AxiomViolation {
                        axiom: axiom.name.clone(),
                    });
                }

                AxiomVerdict::Block => {
                    warn!(
                        axiom = %axiom.name,
                        tool = %tool_name,
                        policy = %axiom.policy,
                        "axiom violation recorded without stopping"
                    );
                }
            }
        }

        Ok(working)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
