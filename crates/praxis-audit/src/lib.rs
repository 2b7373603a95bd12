//! # praxis-audit
//!
//! Append-only, SHA-256 hash-chained event stores for the praxis runtime.
//!
//! ## Overview
//!
//! Every event the executor records is wrapped in a `ChainedEvent` that
//! links to the previous entry via its SHA-256 hash. Tampering with any
//! entry, even a single byte, breaks the chain and is detected by
//! `verify_chain`.
//!
//! Two stores implement `praxis_core::traits::EventStore`:
//!
//! - [`InMemoryEventStore`] for tests and short-lived sessions
//! - [`JsonlEventStore`], one JSON line per event, re-verified on open
//!
//! ## Usage
//!
//! ```rust,ignore
//! use praxis_audit::JsonlEventStore;
//! use praxis_core::traits::EventStore;
//!
//! let store = JsonlEventStore::open("agent.jsonl")?;
//! store.append(event)?;
//! let log = store.export_log()?;
//! ```

pub mod chain;
pub mod file;
pub mod memory;
pub mod record;

pub use chain::{first_broken_link, hash_event, verify_chain};
pub use file::JsonlEventStore;
pub use memory::InMemoryEventStore;
pub use record::{ChainedEvent, EventLog};

// ── Tests ─────────────────────────────────────────────────────────────────────
