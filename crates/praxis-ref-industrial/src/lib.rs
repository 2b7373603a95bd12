//! # praxis-ref-industrial
//!
//! Industrial-control reference runtime for the praxis agent runtime.
//!
//! Demonstrates five scenarios against a simulated process plant:
//!
//! 1. **Human review** (A): a critical tool suspends the turn until a
//!    reviewer approves or rejects it.
//! 2. **Thermal limits** (B): an override axiom clamps an unsafe set point;
//!    the argument verifier refuses an unknown actuator.
//! 3. **Isolated trust** (C): the trust gate refuses a high-risk tool before
//!    review or axioms run.
//! 4. **Nested extraction** (D): a tool call with nested objects is
//!    recovered whole from surrounding prose.
//! 5. **Autonomous run** (E): the driver works toward a goal through tools,
//!    an override, a review, and a completion phrase.
//!
//! All readings are hardcoded and fictional. No model endpoint, shell or
//! filesystem is touched.

pub mod bridge;
pub mod config;
pub mod plant;
pub mod provider;
pub mod runtime;
pub mod scenarios;
pub mod tools;
