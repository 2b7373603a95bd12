//! Argument verification report types.
//!
//! After axioms have run, the executor hands the final arguments to an
//! argument verifier. Only a passing `VerificationReport` lets the action be
//! dispatched.

use serde::{Deserialize, Serialize};

/// The result of verifying one proposed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if no check failed.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn pass() -> Self {
        Self {
            passed: true,
            failures: Vec::new(),
        }
    }

    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    /// `[check] message; [check] message` summary for logs and error results.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.check, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single failed check within a `VerificationReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Identifier of the check that failed (e.g. "json-schema").
    pub check: String,
    /// Human-readable explanation.
    pub message: String,
}
