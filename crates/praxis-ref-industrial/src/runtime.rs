//! Wiring of the plant-control agent.
//!
//! Builds an `Executor` from a `RuntimeConfig` with the plant's native tools,
//! the archive bridge, and a schema verifier that also refuses actuator
//! targets the plant does not have.

use serde_json::Value;

use praxis_contracts::action::Arguments;
use praxis_core::{
    traits::{EventStore, ModelProvider, ToolBridge},
    Executor,
};
use praxis_verify::SchemaArgumentVerifier;

use crate::{
    bridge::InProcessBridge,
    config::RuntimeConfig,
    plant::{Plant, INITIAL_READINGS},
    tools::{archive_tools, plant_tools},
};

fn known_target(arguments: &Arguments) -> Option<String> {
    let target = arguments.get("target_id").and_then(Value::as_str)?;
    if INITIAL_READINGS.iter().any(|(id, _)| *id == target) {
        None
    } else {
        Some(format!("'{target}' is not an actuator of this plant"))
    }
}

/// The argument verifier of the plant-control agent.
pub fn plant_verifier() -> SchemaArgumentVerifier {
    let mut verifier = SchemaArgumentVerifier::new();
    verifier.register_check("set_actuator", "known-target", Box::new(known_target));
    verifier
}

/// Build an executor for `config` over `plant`.
///
/// The archive tools are served through an [`InProcessBridge`] unless
/// `bridge` supplies another one.
pub fn build_executor(
    config: &RuntimeConfig,
    plant: &Plant,
    provider: Box<dyn ModelProvider>,
    store: Box<dyn EventStore>,
    bridge: Option<Box<dyn ToolBridge>>,
) -> Executor {
    let bridge: Box<dyn ToolBridge> = match bridge {
        Some(bridge) => bridge,
        None => Box::new(InProcessBridge::new(archive_tools())),
    };
    Executor::new(
        config.agent.clone(),
        config.governance(),
        provider,
        store,
        Box::new(plant_verifier()),
    )
    .with_tools(plant_tools(plant))
    .with_bridge(bridge)
}
