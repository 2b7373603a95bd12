//! # praxis-verify
//!
//! Argument verification for the praxis runtime.
//!
//! This crate provides [`engine::SchemaArgumentVerifier`], which implements
//! the [`praxis_core::traits::ArgumentVerifier`] trait. It runs after the
//! axioms, on the arguments that will actually be dispatched:
//!
//! 1. **Structural**: the arguments are validated against the catalog
//!    entry's JSON Schema via the `jsonschema` crate.
//! 2. **Checks**: named per-tool functions registered by the host.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use praxis_verify::engine::SchemaArgumentVerifier;
//!
//! let mut verifier = SchemaArgumentVerifier::new();
//! verifier.register_check("set_actuator", "known-target", Box::new(|args| {
//!     match args.get("target_id").and_then(|v| v.as_str()) {
//!         Some("core_temp") | Some("coolant_pump") => None,
//!         _ => Some("unknown actuator target".to_string()),
//!     }
//! }));
//! ```

pub mod engine;

pub use engine::{ArgumentCheckFn, SchemaArgumentVerifier};
