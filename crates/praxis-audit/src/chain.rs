//! Hash-chain primitives: hashing, chain verification, and the in-memory
//! chain state shared by every store.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   3. canonical JSON of the event (serde_json, no pretty-printing)

use sha2::{Digest, Sha256};

use praxis_contracts::event::Event;

use crate::record::ChainedEvent;

/// Compute the SHA-256 hash of one chained event.
///
/// The hash commits to the event's position (`sequence`), its link to the
/// previous entry (`prev_hash`), and the full event including its id,
/// timestamp and agent.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `event` cannot be serialized to JSON, which cannot happen for
/// the well-formed `Event` type.
pub fn hash_event(sequence: u64, event: &Event, prev_hash: &str) -> String {
    let event_json = serde_json::to_vec(event).expect("Event must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&event_json);

    hex::encode(hasher.finalize())
}

/// Position of the first entry that breaks the chain, if any.
///
/// An entry breaks the chain when its sequence is out of place, its
/// `prev_hash` does not match the previous `this_hash` (or `GENESIS_HASH`
/// for the first entry), or its `this_hash` does not match the recomputed
/// hash.
pub fn first_broken_link(entries: &[ChainedEvent]) -> Option<usize> {
    let mut expected_prev = ChainedEvent::GENESIS_HASH;

    for (index, entry) in entries.iter().enumerate() {
        if entry.sequence != index as u64 || entry.prev_hash != expected_prev {
            return Some(index);
        }
        if entry.this_hash != hash_event(entry.sequence, &entry.event, &entry.prev_hash) {
            return Some(index);
        }
        expected_prev = &entry.this_hash;
    }

    None
}

/// Verify the integrity of a hash chain. An empty chain is valid.
pub fn verify_chain(entries: &[ChainedEvent]) -> bool {
    first_broken_link(entries).is_none()
}

/// Append-side state of a chain: the entries plus the link for the next one.
#[derive(Debug, Clone)]
pub(crate) struct Chain {
    pub(crate) entries: Vec<ChainedEvent>,
}

impl Chain {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub(crate) fn from_entries(entries: Vec<ChainedEvent>) -> Self {
        Self { entries }
    }

    /// Seal `event` as the next entry without appending it.
    ///
    /// The timestamp is raised to the previous entry's when it is earlier, so
    /// history stays in non-decreasing time order even if the clock steps back.
    pub(crate) fn seal(&self, mut event: Event) -> ChainedEvent {
        if let Some(last) = self.entries.last() {
            event.timestamp = event.timestamp.max(last.event.timestamp);
        }
        let sequence = self.entries.len() as u64;
        let prev_hash = self.last_hash().to_string();
        let this_hash = hash_event(sequence, &event, &prev_hash);
        ChainedEvent {
            sequence,
            event,
            prev_hash,
            this_hash,
        }
    }

    pub(crate) fn commit(&mut self, entry: ChainedEvent) {
        self.entries.push(entry);
    }

    pub(crate) fn last_hash(&self) -> &str {
        self.entries
            .last()
            .map_or(ChainedEvent::GENESIS_HASH, |e| e.this_hash.as_str())
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.entries.iter().map(|e| e.event.clone()).collect()
    }

    /// The `limit` most recent events, oldest first.
    pub(crate) fn recent(&self, limit: usize) -> Vec<Event> {
        let start = self.entries.len().saturating_sub(limit);
        self.entries[start..].iter().map(|e| e.event.clone()).collect()
    }
}
