//! praxis Industrial Reference Runtime: Demo CLI
//!
//! Runs one or all of the plant-control scenarios. Each scenario uses real
//! praxis components (governance, extractor, event store, verifier,
//! executor, driver) wired together with a simulated plant and a scripted
//! model.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- hitl-review
//!   cargo run -p demo -- thermal-limits
//!   cargo run -p demo -- isolated-trust
//!   cargo run -p demo -- nested-extraction
//!   cargo run -p demo -- autonomous --decision reject --log /tmp/plant.jsonl

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use praxis_contracts::{error::PraxisResult, outcome::ReviewDecision};
use praxis_ref_industrial::scenarios::{
    autonomous, hitl_review, isolated_trust, nested_extraction, thermal_limits,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// praxis: governed autonomous-agent runtime, industrial demo.
///
/// Each subcommand runs one or all of the plant-control scenarios,
/// demonstrating trust, review, axiom and verification enforcement.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "praxis industrial reference runtime demo",
    long_about = "Runs praxis plant-control scenarios showing trust ceilings, human review,\n\
                  axiom overrides, tolerant action extraction, and hash-chained event logs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five scenarios in sequence.
    RunAll,
    /// Scenario A: critical tool suspended for human review.
    HitlReview,
    /// Scenario B: override axiom clamps an unsafe set point.
    ThermalLimits,
    /// Scenario C: isolated agent refused a high-risk tool.
    IsolatedTrust,
    /// Scenario D: nested tool call recovered from prose.
    NestedExtraction,
    /// Scenario E: autonomous goal run.
    Autonomous {
        /// Answer to every review request ("approve" or "reject").
        #[arg(long, default_value = "approve")]
        decision: String,
        /// Write events to this JSON-lines file instead of memory.
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all().await,
        Command::HitlReview => hitl_review::run_scenario().await,
        Command::ThermalLimits => thermal_limits::run_scenario().await,
        Command::IsolatedTrust => isolated_trust::run_scenario().await,
        Command::NestedExtraction => nested_extraction::run_scenario().await,
        Command::Autonomous { decision, log } => {
            let decision = ReviewDecision::parse(&decision);
            info!(?decision, "autonomous run requested");
            autonomous::run_scenario(log.as_deref(), decision).await
        }
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run_all() -> PraxisResult<()> {
    hitl_review::run_scenario().await?;
    thermal_limits::run_scenario().await?;
    isolated_trust::run_scenario().await?;
    nested_extraction::run_scenario().await?;
    autonomous::run_scenario(None, ReviewDecision::Approve).await?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("praxis: Governed Autonomous-Agent Runtime");
    println!("Industrial Reference Demo");
    println!("==========================================");
    println!();
    println!("praxis pipeline per turn:");
    println!("  [1] Discovery: native tools + bridge tools (bridge failure degrades)");
    println!("  [2] Model decision → action extractor → tool call or plain text");
    println!("  [3] Trust gate: hard ceiling by trust level, checked first");
    println!("  [4] Review gate: critical or destructive calls suspend for a human");
    println!("  [5] Reasoning quality → axioms (pass / override / block) → schema check");
    println!("  [6] Dispatch, with every transition appended to a SHA-256 hash chain");
    println!();
}
