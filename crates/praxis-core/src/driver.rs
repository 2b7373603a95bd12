//! The autonomous driver: repeated turns toward a goal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use praxis_contracts::{
    error::PraxisResult,
    outcome::{
        LoopHistory, LoopStep, ReviewDecision, ReviewRequest, ReviewResolution, RunStatus,
        TurnOutcome,
    },
};

use crate::executor::Executor;
use crate::traits::ApprovalHandler;

/// Phrases that mark a goal as achieved when they appear in a text reply.
pub const DEFAULT_COMPLETION_PHRASES: &[&str] =
    &["goal achieved", "task complete", "finished", "all done"];

/// Goal-run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub completion_phrases: Vec<String>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            completion_phrases: DEFAULT_COMPLETION_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl DriverSettings {
    /// True if `text` contains any completion phrase, ignoring case.
    pub fn is_completion(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.completion_phrases
            .iter()
            .any(|phrase| !phrase.is_empty() && text.contains(&phrase.to_lowercase()))
    }
}

/// Cloneable handle that stops a running driver before its next step.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives an [`Executor`] toward a goal, one turn at a time.
///
/// Each turn's outcome is folded into the next turn's input. Suspended
/// actions are settled through the [`ApprovalHandler`] before the loop
/// continues. Errors are never retried as-is; the model sees them and picks
/// another route.
pub struct AutonomousDriver {
    executor: Executor,
    approvals: Box<dyn ApprovalHandler>,
    settings: DriverSettings,
    stop: StopHandle,
}

impl AutonomousDriver {
    pub fn new(
        executor: Executor,
        approvals: Box<dyn ApprovalHandler>,
        settings: DriverSettings,
    ) -> Self {
        Self {
            executor,
            approvals,
            settings,
            stop: StopHandle::default(),
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run up to `max_steps` turns toward `goal`.
    ///
    /// Ends early when a text reply contains a completion phrase, or when the
    /// stop handle fires. The returned history never has more than
    /// `max_steps` entries.
    ///
    /// # Errors
    ///
    /// Only fatal executor errors (event store failures) end the run with
    /// `Err`.
    pub async fn run(&self, goal: &str, max_steps: u32) -> PraxisResult<LoopHistory> {
        let agent = self.executor.settings().name.as_str();
        info!(agent, goal, max_steps, "goal run starting");

        let mut steps = Vec::new();
        let mut status = RunStatus::StepBudgetExhausted;
        let mut input = format!(
            "Keep working towards this goal: {goal}. If the goal is fully achieved, end the session by stating it."
        );

        for step in 1..=max_steps {
            if self.stop.is_stopped() {
                info!(agent, step, "goal run stopped");
                status = RunStatus::Stopped;
                break;
            }

            let outcome = self.executor.process(&input).await?;
            debug!(agent, step, outcome = outcome.type_name(), "step finished");

            let achieved = matches!(
                &outcome,
                TurnOutcome::Text { content } if self.settings.is_completion(content)
            );

            let (review, next_input) = match &outcome {
                TurnOutcome::HitlReview { review } => {
                    let (resolution, next) = self.settle(review, goal).await?;
                    (Some(resolution), next)
                }
                other => (None, follow_up(other, goal)),
            };

            steps.push(LoopStep {
                step,
                outcome,
                review,
            });

            if achieved {
                info!(agent, step, "goal achieved");
                status = RunStatus::GoalAchieved;
                break;
            }
            input = next_input;
        }

        if status == RunStatus::StepBudgetExhausted {
            info!(agent, max_steps, "step budget exhausted");
        }

        Ok(LoopHistory {
            goal: goal.to_string(),
            steps,
            status,
        })
    }

    /// Ask the approval handler about a suspended action and act on it.
    async fn settle(
        &self,
        review: &ReviewRequest,
        goal: &str,
    ) -> PraxisResult<(ReviewResolution, String)> {
        let decision = self.approvals.decide(review).await;
        let tool = &review.tool_name;

        match decision {
            ReviewDecision::Approve => {
                let outcome = self.executor.execute_approved(review.action.clone()).await?;
                let next = format!(
                    "Action '{tool}' was approved and executed. Result: {}. Continue towards goal: {goal}",
                    outcome.content()
                );
                Ok((
                    ReviewResolution {
                        decision,
                        outcome: Some(outcome),
                    },
                    next,
                ))
            }
            ReviewDecision::Reject => {
                self.executor.record_rejection(&review.action)?;
                let next = format!(
                    "Action '{tool}' was REJECTED by the user. Find another way to achieve the goal: {goal}"
                );
                Ok((
                    ReviewResolution {
                        decision,
                        outcome: None,
                    },
                    next,
                ))
            }
        }
    }
}

/// The next turn's input after a non-suspended outcome.
fn follow_up(outcome: &TurnOutcome, goal: &str) -> String {
    match outcome {
        TurnOutcome::ActionResult { content, .. } => {
            format!("The previous action returned: {content}. Continue working on the goal: {goal}")
        }
        TurnOutcome::Error { failure } => format!(
            "The previous action failed: {failure}. Try a different approach to achieve the goal: {goal}"
        ),
        TurnOutcome::Text { .. } | TurnOutcome::HitlReview { .. } => {
            format!("I've noted your response. Continue towards the goal: {goal}")
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use praxis_contracts::{
        action::{Arguments, ProposedAction, RawDecision},
        catalog::ToolCatalog,
        error::PraxisResult,
        event::Event,
        outcome::{ReviewDecision, ReviewRequest, RunStatus, TurnOutcome},
        trust::TrustLevel,
        verify::VerificationReport,
    };
    use praxis_policy::Governance;

    use crate::context::ChatMessage;
    use crate::executor::{AgentSettings, Executor};
    use crate::registry::ToolRegistry;
    use crate::traits::{ApprovalHandler, ArgumentVerifier, EventStore, ModelProvider, NativeTool};

    use super::{AutonomousDriver, DriverSettings, StopHandle};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// Replays a script; once exhausted, answers with `fallback` forever.
    struct ScriptedProvider {
        script: Mutex<VecDeque<RawDecision>>,
        fallback: String,
        inputs: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<RawDecision>, fallback: &str) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback: fallback.to_string(),
                inputs: Arc::new(Mutex::new(vec![])),
            }
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        async fn infer(
            &self,
            _system_prompt: &str,
            history: &[ChatMessage],
            _catalog: &ToolCatalog,
        ) -> PraxisResult<RawDecision> {
            if let Some(last) = history.last() {
                self.inputs.lock().unwrap().push(last.content.clone());
            }
            Ok(self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| RawDecision::text(self.fallback.clone())))
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore(Arc<Mutex<Vec<Event>>>);

    impl EventStore for MemoryStore {
        fn append(&self, event: Event) -> PraxisResult<()> {
            self.0.lock().unwrap().push(event);
            Ok(())
        }

        fn history(&self) -> PraxisResult<Vec<Event>> {
            Ok(self.0.lock().unwrap().clone())
        }

        fn recent(&self, limit: usize) -> PraxisResult<Vec<Event>> {
            let events = self.0.lock().unwrap();
            Ok(events[events.len().saturating_sub(limit)..].to_vec())
        }

        fn len(&self) -> PraxisResult<usize> {
            Ok(self.0.lock().unwrap().len())
        }
    }

    struct AcceptAll;

    impl ArgumentVerifier for AcceptAll {
        fn verify(&self, _: &ProposedAction, _: &ToolCatalog) -> PraxisResult<VerificationReport> {
            Ok(VerificationReport::pass())
        }
    }

    struct CountingTool {
        name: &'static str,
        calls: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl NativeTool for CountingTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "counts calls"
        }

        async fn execute(&self, _arguments: &Arguments) -> PraxisResult<String> {
            *self.calls.lock().unwrap() += 1;
            Ok(format!("{} finished", self.name))
        }
    }

    /// Answers every review with a fixed decision and remembers the requests.
    struct FixedApprovals {
        decision: ReviewDecision,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ApprovalHandler for FixedApprovals {
        async fn decide(&self, request: &ReviewRequest) -> ReviewDecision {
            self.seen.lock().unwrap().push(request.tool_name.clone());
            self.decision
        }
    }

    fn json_call(tool: &str) -> RawDecision {
        RawDecision::text(format!(
            "Proceeding as planned. {{\"name\": \"{tool}\", \"arguments\": {{}}}}"
        ))
    }

    fn driver(
        provider: ScriptedProvider,
        tools: ToolRegistry,
        decision: ReviewDecision,
    ) -> (AutonomousDriver, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(vec![]));
        let executor = Executor::new(
            AgentSettings::default(),
            Governance::new(TrustLevel::Full),
            Box::new(provider),
            Box::new(MemoryStore::default()),
            Box::new(AcceptAll),
        )
        .with_tools(tools);
        let driver = AutonomousDriver::new(
            executor,
            Box::new(FixedApprovals {
                decision,
                seen: seen.clone(),
            }),
            DriverSettings::default(),
        );
        (driver, seen)
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    #[test]
    fn completion_detection_ignores_case() {
        let settings = DriverSettings::default();
        assert!(settings.is_completion("The GOAL ACHIEVED, shutting down."));
        assert!(settings.is_completion("All done!"));
        assert!(!settings.is_completion("Still working on it."));
    }

    #[test]
    fn stop_handle_is_shared() {
        let handle = StopHandle::default();
        let clone = handle.clone();
        clone.stop();
        assert!(handle.is_stopped());
    }

    #[tokio::test]
    async fn run_stops_on_completion_phrase() {
        let calls = Arc::new(Mutex::new(0));
        let provider = ScriptedProvider::new(
            vec![json_call("read_sensor"), RawDecision::text("Reading is nominal. Task complete.")],
            "unreachable",
        );
        let (driver, _) = driver(
            provider,
            ToolRegistry::new().with(Arc::new(CountingTool {
                name: "read_sensor",
                calls: calls.clone(),
            })),
            ReviewDecision::Approve,
        );

        let history = driver.run("check the sensor", 10).await.unwrap();

        assert_eq!(history.status, RunStatus::GoalAchieved);
        assert_eq!(history.len(), 2);
        assert_eq!(history.steps[0].outcome.type_name(), "action_result");
        assert_eq!(history.steps[1].step, 2);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn run_never_exceeds_step_budget() {
        for max_steps in [0u32, 1, 3, 7] {
            let provider = ScriptedProvider::new(vec![], "Still thinking about it.");
            let (driver, _) = driver(provider, ToolRegistry::new(), ReviewDecision::Approve);

            let history = driver.run("an endless goal", max_steps).await.unwrap();

            assert_eq!(history.len(), max_steps as usize);
            assert_eq!(history.status, RunStatus::StepBudgetExhausted);
        }
    }

    /// Tool output that happens to contain a completion phrase does not end
    /// the run; only text replies count.
    #[tokio::test]
    async fn completion_phrase_in_tool_output_does_not_stop() {
        let provider = ScriptedProvider::new(vec![json_call("wrap_up")], "working");
        let (driver, _) = driver(
            provider,
            ToolRegistry::new().with(Arc::new(CountingTool {
                name: "wrap_up",
                calls: Arc::new(Mutex::new(0)),
            })),
            ReviewDecision::Approve,
        );

        let history = driver.run("goal", 2).await.unwrap();

        assert_eq!(history.steps[0].outcome.content(), "wrap_up finished");
        assert_eq!(history.len(), 2);
        assert!(!history.succeeded());
    }

    #[tokio::test]
    async fn outcomes_are_fed_back_as_next_input() {
        let provider = ScriptedProvider::new(
            vec![json_call("read_sensor"), RawDecision::text("thinking")],
            "goal achieved",
        );
        let inputs = provider.inputs.clone();
        let (driver, _) = driver(
            provider,
            ToolRegistry::new().with(Arc::new(CountingTool {
                name: "read_sensor",
                calls: Arc::new(Mutex::new(0)),
            })),
            ReviewDecision::Approve,
        );

        driver.run("stabilize line 3", 5).await.unwrap();

        let inputs = inputs.lock().unwrap();
        assert!(inputs[0].starts_with("Keep working towards this goal: stabilize line 3."));
        assert_eq!(
            inputs[1],
            "The previous action returned: read_sensor finished. Continue working on the goal: stabilize line 3"
        );
        assert_eq!(
            inputs[2],
            "I've noted your response. Continue towards the goal: stabilize line 3"
        );
    }

    #[tokio::test]
    async fn approved_review_executes_and_continues() {
        let calls = Arc::new(Mutex::new(0));
        let provider = ScriptedProvider::new(vec![json_call("shell_tool")], "all done");
        let (driver, seen) = driver(
            provider,
            ToolRegistry::new().with(Arc::new(CountingTool {
                name: "shell_tool",
                calls: calls.clone(),
            })),
            ReviewDecision::Approve,
        );

        let history = driver.run("rotate logs", 5).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["shell_tool".to_string()]);
        assert_eq!(*calls.lock().unwrap(), 1);
        let first = &history.steps[0];
        assert_eq!(first.outcome.type_name(), "hitl_review");
        let resolution = first.review.as_ref().unwrap();
        assert_eq!(resolution.decision, ReviewDecision::Approve);
        assert_eq!(
            resolution.outcome.as_ref().map(TurnOutcome::type_name),
            Some("action_result")
        );
        assert!(history.succeeded());
    }

    #[tokio::test]
    async fn rejected_review_never_executes() {
        let calls = Arc::new(Mutex::new(0));
        let provider = ScriptedProvider::new(vec![json_call("shell_tool")], "task complete");
        let inputs = provider.inputs.clone();
        let (driver, _) = driver(
            provider,
            ToolRegistry::new().with(Arc::new(CountingTool {
                name: "shell_tool",
                calls: calls.clone(),
            })),
            ReviewDecision::Reject,
        );

        let history = driver.run("rotate logs", 5).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(history.steps[0].review.as_ref().unwrap().decision, ReviewDecision::Reject);
        assert_eq!(
            inputs.lock().unwrap()[1],
            "Action 'shell_tool' was REJECTED by the user. Find another way to achieve the goal: rotate logs"
        );
    }

    #[tokio::test]
    async fn stopped_driver_ends_before_next_step() {
        let provider = ScriptedProvider::new(vec![], "working");
        let (driver, _) = driver(provider, ToolRegistry::new(), ReviewDecision::Approve);

        driver.stop_handle().stop();
        let history = driver.run("goal", 5).await.unwrap();

        assert!(history.is_empty());
        assert_eq!(history.status, RunStatus::Stopped);
    }
}
