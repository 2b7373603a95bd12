//! Schema-based argument verifier for the praxis runtime.
//!
//! `SchemaArgumentVerifier` implements the `ArgumentVerifier` trait from
//! `praxis-core`. Verification runs in two phases:
//!
//! 1. **Structural**: the final arguments are validated against the
//!    catalog entry's `parameters` schema using the `jsonschema` crate.
//!    A null or empty schema imposes no constraint.
//! 2. **Checks**: each function registered for the tool is evaluated in
//!    registration order.
//!
//! All failures are collected before returning so operators see the full
//! failure set in one pass.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use praxis_contracts::{
    action::{Arguments, ProposedAction},
    catalog::ToolCatalog,
    error::{PraxisError, PraxisResult},
    verify::{VerificationFailure, VerificationReport},
};
use praxis_core::traits::ArgumentVerifier;

/// A caller-supplied argument check.
///
/// Returns `Some(message)` when the check fails, or `None` on success.
pub type ArgumentCheckFn = Box<dyn Fn(&Arguments) -> Option<String> + Send + Sync>;

struct NamedCheck {
    name: String,
    check: ArgumentCheckFn,
}

/// The praxis argument verifier.
pub struct SchemaArgumentVerifier {
    /// Checks keyed by lowercase tool name.
    checks: HashMap<String, Vec<NamedCheck>>,
}

impl SchemaArgumentVerifier {
    /// Create a verifier with no checks registered.
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Register a check named `name` for `tool_name`.
    ///
    /// Registering the same name twice for one tool replaces the earlier
    /// function in place.
    pub fn register_check(
        &mut self,
        tool_name: &str,
        name: impl Into<String>,
        check: ArgumentCheckFn,
    ) {
        let name = name.into();
        let checks = self.checks.entry(tool_name.trim().to_lowercase()).or_default();
        match checks.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.check = check,
            None => checks.push(NamedCheck { name, check }),
        }
    }

    fn is_unconstrained(schema: &Value) -> bool {
        match schema {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl Default for SchemaArgumentVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentVerifier for SchemaArgumentVerifier {
    /// Verify `action` against its catalog entry.
    ///
    /// # Errors
    ///
    /// `SchemaValidation` when the entry's schema document does not compile.
    fn verify(
        &self,
        action: &ProposedAction,
        catalog: &ToolCatalog,
    ) -> PraxisResult<VerificationReport> {
        let Some(entry) = catalog.resolve(&action.tool_name) else {
            warn!(tool = %action.tool_name, "verification of a tool outside the catalog");
            return Ok(VerificationReport::from_failures(vec![VerificationFailure {
                check: "catalog".to_string(),
                message: format!("tool '{}' is not in the current catalog", action.tool_name),
            }]));
        };

        let mut failures: Vec<VerificationFailure> = Vec::new();

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        if !Self::is_unconstrained(&entry.parameters) {
            let validator = jsonschema::validator_for(&entry.parameters).map_err(|e| {
                PraxisError::SchemaValidation {
                    reason: format!("invalid parameter schema for tool '{}': {e}", entry.name),
                }
            })?;

            let instance = Value::Object(action.arguments.clone());
            for error in validator.iter_errors(&instance) {
                let message = format!("JSON Schema violation at '{}': {}", error.instance_path, error);
                warn!(tool = %entry.name, %message, "argument schema violation");
                failures.push(VerificationFailure {
                    check: "json-schema".to_string(),
                    message,
                });
            }
        }

        // ── Phase 2: registered checks ────────────────────────────────────────
        let checks = self
            .checks
            .get(&entry.name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for named in checks {
            debug!(tool = %entry.name, check = %named.name, "evaluating argument check");
            if let Some(message) = (named.check)(&action.arguments) {
                warn!(tool = %entry.name, check = %named.name, %message, "argument check failed");
                failures.push(VerificationFailure {
                    check: named.name.clone(),
                    message,
                });
            }
        }

        let report = VerificationReport::from_failures(failures);
        debug!(
            tool = %entry.name,
            passed = report.passed,
            failure_count = report.failures.len(),
            "verification complete"
        );
        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
