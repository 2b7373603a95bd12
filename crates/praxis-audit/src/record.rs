//! Chained event and exported log types.
//!
//! `ChainedEvent` wraps an `Event` with its position and the SHA-256 hashes
//! that make tampering detectable. `EventLog` is the sealed export of a
//! whole chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use praxis_contracts::event::Event;

/// A single entry in an agent's hash chain.
///
/// Modifying any field, including those of the embedded `event`,
/// invalidates `this_hash` and every later `prev_hash`, which
/// `verify_chain` detects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainedEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The recorded event.
    pub event: Event,

    /// Hash of the previous entry, or `GENESIS_HASH` for the first entry.
    pub prev_hash: String,

    /// Hash over (sequence, prev_hash, canonical JSON of event).
    pub this_hash: String,
}

impl ChainedEvent {
    /// The sentinel `prev_hash` of the first entry in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed export of an event chain.
///
/// `terminal_hash` is the `this_hash` of the last entry and commits to the
/// entire log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// All entries in chain order.
    pub entries: Vec<ChainedEvent>,

    /// Wall-clock time (UTC) of the export.
    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last entry. Empty when the log is empty.
    pub terminal_hash: String,
}

impl EventLog {
    pub(crate) fn seal(entries: Vec<ChainedEvent>) -> Self {
        let terminal_hash = entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();
        Self {
            entries,
            exported_at: Utc::now(),
            terminal_hash,
        }
    }
}
