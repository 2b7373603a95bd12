//! # praxis-contracts
//!
//! Shared types, events, and contracts for the praxis agent runtime.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod action;
pub mod catalog;
pub mod error;
pub mod event;
pub mod outcome;
pub mod trust;
pub mod verify;
