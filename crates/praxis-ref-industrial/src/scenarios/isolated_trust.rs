//! Scenario C: Isolated trust ceiling
//!
//! An agent running at `isolated` trust proposes `shell_command`, a
//! high-risk tool. The trust gate refuses it before any other stage looks at
//! the action: the command would also trip the review markers and the
//! `no_root_wipe` axiom, but neither gets the chance to run.
//!
//! The same agent can still read sensors, which are low risk.

use praxis_contracts::{action::RawDecision, error::PraxisResult, trust::TrustLevel};

use praxis_core::traits::EventStore;

use crate::{
    config::RuntimeConfig,
    plant::Plant,
    scenarios::{count_kind, print_audit, scripted_agent},
};

/// A high-risk call whose arguments would also trip review and an axiom.
pub const SHELL_OUTPUT: &str = "{\"tool\": \"shell_command\", \"parameters\": \
{\"command\": \"delete /var/log --no-preserve-root\"}}";

/// A low-risk call in call syntax.
pub const SENSOR_OUTPUT: &str = "read_sensor(sensor_id=\"tank_pressure\")";

fn script() -> [RawDecision; 2] {
    [RawDecision::text(SHELL_OUTPUT), RawDecision::text(SENSOR_OUTPUT)]
}

fn isolated_config() -> PraxisResult<RuntimeConfig> {
    Ok(RuntimeConfig::industrial()?.with_trust_level(TrustLevel::Isolated))
}

/// Run Scenario C: refuse a high-risk tool at isolated trust.
pub async fn run_scenario() -> PraxisResult<()> {
    println!("=== Scenario C: Isolated Trust Ceiling ===");
    println!();

    let config = isolated_config()?;
    let plant = Plant::new();
    let (executor, store) = scripted_agent(&config, &plant, script());

    println!("  Agent trust level:      {}", executor.trust_level());
    println!("  Requested:              shell_command (high risk)");
    let outcome = executor.process("Clean up the log partition").await?;
    println!("  Outcome:                {} ({})", outcome.type_name(), outcome.content());

    let history = store.history()?;
    println!("  Review requests:        {}", count_kind(&history, "review_requested"));
    println!("  Tool executions:        {}", count_kind(&history, "tool_execution"));
    println!();

    println!("  Requested:              read_sensor (low risk)");
    let outcome = executor.process("Check the tank pressure").await?;
    println!("  Outcome:                {} ({})", outcome.type_name(), outcome.content());
    println!();

    print_audit(&store)?;
    println!();
    println!("  Scenario C complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
