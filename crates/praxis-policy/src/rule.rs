//! Declarative axiom rules.
//!
//! Most safety constraints fall into a few shapes: clamp a numeric field,
//! forbid a substring, require a field. These can be declared in TOML and
//! evaluated without custom code.
//!
//! Example in TOML:
//! ```toml
//! [[axioms]]
//! name = "enforce_thermal_limits"
//! on_violation = "override"
//! tools = ["set_actuator"]
//! rule = { type = "clamp", field = "value", max = 400.0 }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use praxis_contracts::action::Arguments;

use crate::axiom::AxiomVerdict;

/// A declarative axiom body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AxiomRule {
    /// Clamp the numeric field at `field` into `[min, max]`. Missing or
    /// non-numeric fields pass.
    Clamp {
        field: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },

    /// Block when a string argument contains `pattern` (case-insensitive).
    /// With `field` set only that field is inspected, otherwise every string
    /// value at any depth.
    ForbidPattern {
        pattern: String,
        #[serde(default)]
        field: Option<String>,
    },

    /// Block when the field at `field` is missing or null.
    RequireField { field: String },
}

impl AxiomRule {
    pub fn evaluate(&self, arguments: &Arguments) -> AxiomVerdict {
        match self {
            AxiomRule::Clamp { field, min, max } => {
                let Some(current) = resolve_path(arguments, field).and_then(Value::as_f64) else {
                    return AxiomVerdict::Pass;
                };
                let mut clamped = current;
                if let Some(max) = max {
                    clamped = clamped.min(*max);
                }
                if let Some(min) = min {
                    clamped = clamped.max(*min);
                }
                if clamped == current {
                    return AxiomVerdict::Pass;
                }
                let Some(number) = Number::from_f64(clamped) else {
                    return AxiomVerdict::Block;
                };
                let mut patched = arguments.clone();
                if set_path(&mut patched, field, Value::Number(number)) {
                    AxiomVerdict::Override(patched)
                } else {
                    AxiomVerdict::Block
                }
            }

            AxiomRule::ForbidPattern { pattern, field } => {
                let needle = pattern.to_lowercase();
                let hit = match field {
                    Some(path) => resolve_path(arguments, path)
                        .map(|v| contains_text(v, &needle))
                        .unwrap_or(false),
                    None => arguments.values().any(|v| contains_text(v, &needle)),
                };
                AxiomVerdict::from(!hit)
            }

            AxiomRule::RequireField { field } => {
                AxiomVerdict::from(resolve_path(arguments, field).is_some())
            }
        }
    }
}

/// Resolve a dot-notation path (e.g. `"target.value"`). Returns `None` when a
/// segment is missing or the value is JSON `null`.
pub(crate) fn resolve_path<'v>(arguments: &'v Arguments, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = arguments.get(segments.next()?)?;
    for segment in segments {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Overwrite the value at an existing dot-notation path.
fn set_path(arguments: &mut Arguments, path: &str, value: Value) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = arguments;
    for segment in parents {
        match current.get_mut(*segment) {
            Some(Value::Object(next)) => current = next,
            _ => return false,
        }
    }
    match current.get_mut(*last) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// Return true if any string inside `value` contains `needle` (already lowercased).
pub(crate) fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
        _ => false,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
