//! Scenario E: Autonomous goal run
//!
//! The driver works toward "bring the core to a safe temperature" with a
//! scripted model. The run touches every path a goal run can take:
//!
//!   1. native tool (`read_sensor`)
//!   2. bridge tool in call syntax (`read_file`)
//!   3. axiom override (`set_actuator` 550 → 400)
//!   4. human review, settled by the approval handler (`shell_tool`)
//!   5. a text reply containing a completion phrase ends the run
//!
//! With a log path the events go to a JSON-lines file that is reopened and
//! re-verified at the end.

use std::path::Path;
use std::sync::Arc;

use praxis_audit::{InMemoryEventStore, JsonlEventStore};
use praxis_contracts::{
    action::RawDecision,
    error::PraxisResult,
    outcome::{LoopHistory, ReviewDecision},
};
use praxis_core::{traits::EventStore, AutonomousDriver};

use crate::{
    config::RuntimeConfig,
    plant::Plant,
    provider::{ScriptedApprovals, ScriptedProvider},
    runtime::build_executor,
};

/// The goal of the run.
pub const GOAL: &str = "bring the reactor core to a safe temperature";

/// Step budget of the demo run.
pub const MAX_STEPS: u32 = 8;

/// One scripted model reply per step.
pub fn script() -> Vec<RawDecision> {
    vec![
        RawDecision::text(
            "<think>I need the current core temperature first.</think>\
             {\"name\": \"read_sensor\", \"arguments\": {\"sensor_id\": \"core_temp\"}}",
        ),
        RawDecision::text(
            "612 C is far too hot. The manual should say what the limit is.\n\
             read_file(path=\"manuals/cooling.md\")",
        ),
        RawDecision::text(
            "<think>The limit is 400 C but overshooting will cool faster.</think>\
             {\"name\": \"set_actuator\", \"arguments\": {\"target_id\": \"core_temp\", \"value\": 550}}",
        ),
        RawDecision::tool_call("shell_tool", "{\"command\": \"systemctl restart telemetry\"}"),
        RawDecision::text("Core temperature holds at 400 C. Goal achieved."),
    ]
}

/// Drive the plant agent toward [`GOAL`] over `store`.
pub async fn run_goal(
    config: &RuntimeConfig,
    plant: &Plant,
    store: Box<dyn EventStore>,
    approvals: ScriptedApprovals,
    max_steps: u32,
) -> PraxisResult<LoopHistory> {
    let executor = build_executor(
        config,
        plant,
        Box::new(ScriptedProvider::new(script())),
        store,
        None,
    );
    let driver = AutonomousDriver::new(executor, Box::new(approvals), config.driver.clone());
    driver.run(GOAL, max_steps).await
}

/// Run Scenario E. Reviews are answered with `decision`; events go to
/// `log` when given, otherwise to memory.
pub async fn run_scenario(log: Option<&Path>, decision: ReviewDecision) -> PraxisResult<()> {
    println!("=== Scenario E: Autonomous Goal Run ===");
    println!();

    let config = RuntimeConfig::industrial()?;
    let plant = Plant::new();
    let approvals = ScriptedApprovals::always(decision);

    println!("  Goal:                   {}", GOAL);
    println!("  Step budget:            {}", MAX_STEPS);
    println!("  Review decisions:       {:?}", decision);
    println!();

    let history = match log {
        Some(path) => {
            let store = Arc::new(JsonlEventStore::open(path)?);
            let history =
                run_goal(&config, &plant, Box::new(Arc::clone(&store)), approvals, MAX_STEPS).await?;
            drop(store);
            let reopened = JsonlEventStore::open(path)?;
            println!(
                "  Event log file:         {} ({} events, chain VERIFIED on reopen)",
                path.display(),
                reopened.len()?
            );
            history
        }
        None => {
            let store = InMemoryEventStore::new();
            let history =
                run_goal(&config, &plant, Box::new(store.clone()), approvals, MAX_STEPS).await?;
            println!(
                "  Event log:              {} events, chain {}",
                store.len()?,
                if store.verify_integrity()? { "VERIFIED" } else { "FAILED" }
            );
            history
        }
    };
    println!();

    for step in &history.steps {
        println!(
            "  Step {}: {:<14} {}",
            step.step,
            step.outcome.type_name(),
            step.outcome.content()
        );
        if let Some(review) = &step.review {
            let settled = review
                .outcome
                .as_ref()
                .map(|o| o.content())
                .unwrap_or_else(|| "not executed".to_string());
            println!("          review: {:?} → {}", review.decision, settled);
        }
    }
    println!();
    println!("  Run status:             {:?}", history.status);
    println!("  core_temp now reads:    {:.1}", plant.read("core_temp")?);
    println!();
    println!("  Scenario E complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
