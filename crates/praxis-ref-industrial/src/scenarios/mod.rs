//! Plant-control reference scenarios.
//!
//! Each scenario is a self-contained module that wires up real praxis
//! components (governance, extractor, event store, verifier, executor) with
//! the simulated plant and a scripted model, and demonstrates one
//! enforcement pattern.

pub mod autonomous;
pub mod hitl_review;
pub mod isolated_trust;
pub mod nested_extraction;
pub mod thermal_limits;

use praxis_contracts::{action::RawDecision, error::PraxisResult, event::Event};
use praxis_audit::InMemoryEventStore;
use praxis_core::{traits::EventStore, Executor};

use crate::{config::RuntimeConfig, plant::Plant, provider::ScriptedProvider, runtime::build_executor};

/// An executor over an inspectable in-memory store, driven by `script`.
pub(crate) fn scripted_agent<I>(
    config: &RuntimeConfig,
    plant: &Plant,
    script: I,
) -> (Executor, InMemoryEventStore)
where
    I: IntoIterator<Item = RawDecision>,
{
    let store = InMemoryEventStore::new();
    let executor = build_executor(
        config,
        plant,
        Box::new(ScriptedProvider::new(script)),
        Box::new(store.clone()),
        None,
    );
    (executor, store)
}

/// Number of events of kind `kind` (e.g. `"tool_execution"`).
pub(crate) fn count_kind(events: &[Event], kind: &str) -> usize {
    events.iter().filter(|e| e.kind_name() == kind).count()
}

/// Print the audit trail and its integrity.
pub(crate) fn print_audit(store: &InMemoryEventStore) -> PraxisResult<()> {
    let history = store.history()?;
    println!("  Event log ({} events):", history.len());
    for (index, event) in history.iter().enumerate() {
        println!("    {:>2}. {}", index, event.kind_name());
    }
    let verified = store.verify_integrity()?;
    println!(
        "  Hash chain integrity:   {}",
        if verified { "VERIFIED" } else { "FAILED" }
    );
    Ok(())
}
