//! In-memory implementation of `EventStore`.
//!
//! `InMemoryEventStore` keeps the chain in a `Vec` behind `Arc<Mutex<_>>`.
//! Clones share the same chain, so a caller can hand one clone to the
//! executor and keep another for inspection.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use praxis_contracts::{
    error::{PraxisError, PraxisResult},
    event::Event,
};
use praxis_core::traits::EventStore;

use crate::{
    chain::{verify_chain, Chain},
    record::EventLog,
};

/// An in-memory, append-only event store backed by a SHA-256 hash chain.
#[derive(Clone)]
pub struct InMemoryEventStore {
    pub(crate) state: Arc<Mutex<Chain>>,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Chain::new())),
        }
    }

    /// Export a sealed `EventLog` of every entry appended so far.
    pub fn export_log(&self) -> PraxisResult<EventLog> {
        Ok(EventLog::seal(self.lock()?.entries.clone()))
    }

    /// Verify that the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> PraxisResult<bool> {
        Ok(verify_chain(&self.lock()?.entries))
    }

    fn lock(&self) -> PraxisResult<MutexGuard<'_, Chain>> {
        self.state.lock().map_err(|e| PraxisError::EventStoreWrite {
            reason: format!("event store lock poisoned: {e}"),
        })
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, event: Event) -> PraxisResult<()> {
        let mut chain = self.lock()?;
        let entry = chain.seal(event);
        debug!(sequence = entry.sequence, kind = entry.event.kind_name(), "event appended");
        chain.commit(entry);
        Ok(())
    }

    fn history(&self) -> PraxisResult<Vec<Event>> {
        Ok(self.lock()?.events())
    }

    fn recent(&self, limit: usize) -> PraxisResult<Vec<Event>> {
        Ok(self.lock()?.recent(limit))
    }

    fn len(&self) -> PraxisResult<usize> {
        Ok(self.lock()?.entries.len())
    }
}
