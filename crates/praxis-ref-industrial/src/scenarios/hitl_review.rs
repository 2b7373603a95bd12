//! Scenario A: Human review of a critical tool
//!
//! The model asks for `shell_tool`, which is on the critical-tool list. The
//! executor clears the trust gate, then suspends the turn with a
//! `hitl_review` outcome. Nothing runs until a reviewer decides.
//!
//! Pipeline walk-through for the demo run:
//!   1. Extractor finds the fenced JSON block → `shell_tool`
//!   2. Trust gate (standard): low-risk tool → pass
//!   3. Review gate: critical tool → suspend, `ReviewRequested` recorded
//!   4. Reviewer approves → `execute_approved` runs axioms, verification,
//!      the tool, and records the result
//!   5. Audit chain integrity verified at the end

use praxis_contracts::{
    action::RawDecision,
    error::PraxisResult,
    outcome::{ReviewRequest, TurnOutcome},
};

use praxis_core::traits::EventStore;

use crate::{
    config::RuntimeConfig,
    plant::Plant,
    scenarios::{count_kind, print_audit, scripted_agent},
};

/// Raw model output of the scenario.
pub const MODEL_OUTPUT: &str = "Clearing the scratch directory frees the controller disk.\n\
```json\n{\"name\": \"shell_tool\", \"arguments\": {\"command\": \"rm -rf /tmp/x\"}}\n```";

/// Run Scenario A: suspend a critical tool, then approve it.
pub async fn run_scenario() -> PraxisResult<()> {
    println!("=== Scenario A: Human Review of a Critical Tool ===");
    println!();

    let config = RuntimeConfig::industrial()?;
    let plant = Plant::new();
    let (executor, store) = scripted_agent(&config, &plant, [RawDecision::text(MODEL_OUTPUT)]);

    println!("  Model output:");
    for line in MODEL_OUTPUT.lines() {
        println!("    | {}", line);
    }
    println!();

    let outcome = executor.process("Free some disk space on the controller").await?;
    let review: ReviewRequest = match &outcome {
        TurnOutcome::HitlReview { review } => {
            println!("  Outcome:                hitl_review");
            println!("  Tool:                   {}", review.tool_name);
            println!("  Reason:                 {}", review.reason);
            review.clone()
        }
        other => {
            println!("  UNEXPECTED: {:?}", other);
            return Ok(());
        }
    };

    let executions = count_kind(&store.history()?, "tool_execution");
    println!("  Tool executions so far: {}", executions);
    println!();

    println!("  Reviewer decision:      APPROVE");
    let approved = executor.execute_approved(review.action).await?;
    println!("  Approved outcome:       {} ({})", approved.type_name(), approved.content());
    println!("  Operator log:           {:?}", plant.operator_log());
    println!();

    print_audit(&store)?;
    println!();
    println!("  Scenario A complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use praxis_contracts::{
        event::{EventKind, RejectionStage},
        outcome::TurnFailure,
    };
    use praxis_core::traits::EventStore;

    use super::*;

    /// The critical tool suspends the turn and nothing executes.
    #[tokio::test]
    async fn critical_tool_suspends_without_execution() {
        let config = RuntimeConfig::industrial().unwrap();
        let plant = Plant::new();
        let (executor, store) = scripted_agent(&config, &plant, [RawDecision::text(MODEL_OUTPUT)]);

        let outcome = executor.process("free disk").await.unwrap();
        match outcome {
            TurnOutcome::HitlReview { review } => {
                assert_eq!(review.tool_name, "shell_tool");
                assert_eq!(review.action.arguments["command"], "rm -rf /tmp/x");
            }
            other => panic!("expected hitl_review, got {:?}", other),
        }

        let history = store.history().unwrap();
        assert_eq!(count_kind(&history, "tool_execution"), 0);
        assert_eq!(count_kind(&history, "tool_result"), 0);
        assert_eq!(count_kind(&history, "review_requested"), 1);
        assert!(plant.operator_log().is_empty());
    }

    /// Approval runs the suspended action exactly once.
    #[tokio::test]
    async fn approval_executes_the_action() {
        let config = RuntimeConfig::industrial().unwrap();
        let plant = Plant::new();
        let (executor, store) = scripted_agent(&config, &plant, [RawDecision::text(MODEL_OUTPUT)]);

        let TurnOutcome::HitlReview { review } = executor.process("free disk").await.unwrap() else {
            panic!("expected hitl_review");
        };
        let outcome = executor.execute_approved(review.action).await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::ActionResult {
                tool_name: "shell_tool".into(),
                content: "simulated `rm -rf /tmp/x`: exit 0".into(),
            }
        );
        assert_eq!(plant.operator_log(), vec!["shell_tool: rm -rf /tmp/x"]);
        assert_eq!(count_kind(&store.history().unwrap(), "tool_execution"), 2);
        assert!(store.verify_integrity().unwrap());
    }

    /// Rejection is recorded against the human stage and nothing runs.
    #[tokio::test]
    async fn rejection_is_recorded() {
        let config = RuntimeConfig::industrial().unwrap();
        let plant = Plant::new();
        let (executor, store) = scripted_agent(&config, &plant, [RawDecision::text(MODEL_OUTPUT)]);

        let TurnOutcome::HitlReview { review } = executor.process("free disk").await.unwrap() else {
            panic!("expected hitl_review");
        };
        let outcome = executor.record_rejection(&review.action).unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::error(TurnFailure::Rejected {
                tool_name: "shell_tool".into()
            })
        );
        let last = store.history().unwrap().pop().unwrap();
        assert!(matches!(
            last.kind,
            EventKind::ActionRejected { stage: RejectionStage::Human, .. }
        ));
        assert!(plant.operator_log().is_empty());
    }
}
