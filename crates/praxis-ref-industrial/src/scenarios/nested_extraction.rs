//! Scenario D: Nested JSON extraction
//!
//! The model wraps a tool call that contains a nested object in prose. A
//! regex that stops at the first `}` would cut the call in half; the
//! brace-balance scanner returns the whole outer object as one candidate.
//!
//! `file_system` is high risk, so the executor in this scenario runs at
//! `full` trust.

use praxis_contracts::{
    action::RawDecision, catalog::ToolCatalog, error::PraxisResult, trust::TrustLevel,
};
use praxis_extract::{ActionExtractor, Extraction};

use crate::{
    config::RuntimeConfig,
    plant::Plant,
    scenarios::{print_audit, scripted_agent},
    tools::plant_tools,
};

/// Prose around a call whose arguments nest an object.
pub const MODEL_OUTPUT: &str = "Let me look at the config tree before touching anything.\n\
{\"tool\": \"file_system\", \"arguments\": {\"path\": \"a\", \"nested\": {\"x\": 1}}}\n\
That listing tells us which profile is active.";

/// Run Scenario D: extract a nested call, then execute it.
pub async fn run_scenario() -> PraxisResult<()> {
    println!("=== Scenario D: Nested JSON Extraction ===");
    println!();

    let plant = Plant::new();
    let catalog: ToolCatalog = plant_tools(&plant).catalog_entries().collect();

    match ActionExtractor::new().extract(&RawDecision::text(MODEL_OUTPUT), &catalog) {
        Extraction::Action { action, strategy } => {
            println!("  Strategy:               {:?}", strategy);
            println!("  Tool:                   {}", action.tool_name);
            println!(
                "  Arguments:              {}",
                serde_json::Value::Object(action.arguments.clone())
            );
            println!("  Reasoning:              {}", action.reasoning_text());
        }
        Extraction::Text { content } => {
            println!("  UNEXPECTED text: {}", content);
        }
    }
    println!();

    let config = RuntimeConfig::industrial()?.with_trust_level(TrustLevel::Full);
    let (executor, store) = scripted_agent(&config, &plant, [RawDecision::text(MODEL_OUTPUT)]);
    let outcome = executor.process("Which profile is active?").await?;
    println!("  Outcome:                {} ({})", outcome.type_name(), outcome.content());
    println!();

    print_audit(&store)?;
    println!();
    println!("  Scenario D complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
