//! The praxis executor: one governed turn from user input to recorded outcome.
//!
//! The executor enforces the turn pipeline:
//!
//!   Discovery → Reasoning → Extraction → Trust → Review → ReasoningQuality
//!     → Axioms → ArgumentVerification → Execution → Recording
//!
//! The security invariant is structural: a tool is only dispatched from
//! `execute_governed()`, and that path is only reachable after the trust gate
//! has passed. Human review sits between trust and the remaining checks, so a
//! suspended action has already been cleared against the agent's trust level.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use praxis_contracts::{
    action::ProposedAction,
    catalog::{ToolCatalog, ToolSource},
    error::{PraxisError, PraxisResult},
    event::{Event, EventKind, ExecutionStatus, RejectionStage},
    outcome::{ReviewRequest, TurnFailure, TurnOutcome},
    trust::TrustLevel,
};
use praxis_extract::{ActionExtractor, Extraction};
use praxis_policy::Governance;

use crate::context::build_messages;
use crate::registry::ToolRegistry;
use crate::traits::{ArgumentVerifier, EventStore, ModelProvider, ToolBridge};

/// Identity and prompt configuration of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub name: String,
    pub system_prompt: String,
    /// Number of most recent events used to build model context.
    pub history_window: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "praxis".to_string(),
            system_prompt: "You are an autonomous agent. To use a tool, reply with a JSON object \
                            {\"name\": <tool>, \"arguments\": {...}} and explain your reasoning. \
                            When the goal is fully achieved, say so plainly."
                .to_string(),
            history_window: 10,
        }
    }
}

/// Drives single turns for one agent.
///
/// Construct one executor per agent. The executor owns the trusted components
/// (governance, event store, argument verifier) and the untrusted model
/// provider, and enforces stage ordering on every call to `process()`.
/// Turns must not overlap; the event store is the only shared state.
pub struct Executor {
    settings: AgentSettings,
    governance: Governance,
    provider: Box<dyn ModelProvider>,
    store: Box<dyn EventStore>,
    verifier: Box<dyn ArgumentVerifier>,
    tools: ToolRegistry,
    bridge: Option<Box<dyn ToolBridge>>,
    extractor: ActionExtractor,
    started: AtomicBool,
    turns: AtomicU64,
}

impl Executor {
    /// Create an executor with no native tools and no external bridge.
    pub fn new(
        settings: AgentSettings,
        governance: Governance,
        provider: Box<dyn ModelProvider>,
        store: Box<dyn EventStore>,
        verifier: Box<dyn ArgumentVerifier>,
    ) -> Self {
        Self {
            settings,
            governance,
            provider,
            store,
            verifier,
            tools: ToolRegistry::new(),
            bridge: None,
            extractor: ActionExtractor::new(),
            started: AtomicBool::new(false),
            turns: AtomicU64::new(0),
        }
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_bridge(mut self, bridge: Box<dyn ToolBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn with_extractor(mut self, extractor: ActionExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn trust_level(&self) -> TrustLevel {
        self.governance.trust.level()
    }

    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }

    /// Number of turns started so far.
    pub fn turns(&self) -> u64 {
        self.turns.load(Ordering::SeqCst)
    }

    /// Run one turn for `user_input`.
    ///
    /// # Pipeline
    ///
    /// 1. Record the input as a `UserMessage` event
    /// 2. Discovery: native catalog plus bridge tools (bridge failure is logged)
    /// 3. Reasoning: one provider call with the bounded, sanitized history
    /// 4. Extraction: a `ProposedAction` or a plain-text reply
    /// 5. Trust check: denied → `Error`, recorded as `ActionRejected`
    /// 6. Catalog check: unknown tool → `Error`, before anyone reviews it
    /// 7. Review check: flagged → `HitlReview`, nothing executes
    /// 8. Reasoning quality, axioms, argument verification, execution,
    ///    recording (see `execute_governed()`)
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the event store fails. Every governance,
    /// provider and tool failure is a `TurnOutcome::Error`.
    pub async fn process(&self, user_input: &str) -> PraxisResult<TurnOutcome> {
        let turn = self.begin_turn()?;
        let agent = self.settings.name.as_str();

        debug!(agent, turn, "turn starting");

        // ── Step 1: Record the input ─────────────────────────────────────────
        self.record(EventKind::UserMessage {
            content: user_input.to_string(),
        })?;

        // ── Step 2: Discovery ────────────────────────────────────────────────
        let catalog = self.discover(turn).await;

        // ── Step 3: Reasoning ────────────────────────────────────────────────
        let recent = self.store.recent(self.settings.history_window)?;
        let messages = build_messages(&recent);
        let system_prompt = self.system_prompt();

        let decision = match self
            .provider
            .infer(&system_prompt, &messages, &catalog)
            .await
        {
            Ok(decision) => decision,
            Err(err) => {
                warn!(agent, turn, error = %err, "model provider failed");
                let failure = TurnFailure::ProviderUnavailable {
                    reason: err.to_string(),
                };
                self.record(EventKind::ActionRejected {
                    tool_name: String::new(),
                    arguments: Default::default(),
                    stage: RejectionStage::Provider,
                    reason: failure.to_string(),
                })?;
                return Ok(TurnOutcome::error(failure));
            }
        };

        // ── Step 4: Extraction ───────────────────────────────────────────────
        let action = match self.extractor.extract(&decision, &catalog) {
            Extraction::Text { content } => {
                self.record(EventKind::ReasoningStep {
                    thought: content.clone(),
                    tool_call: None,
                })?;
                info!(agent, turn, "turn answered with text");
                return Ok(TurnOutcome::Text { content });
            }
            Extraction::Action { action, strategy } => {
                debug!(agent, turn, tool = %action.tool_name, ?strategy, "action extracted");
                action
            }
        };

        self.record(EventKind::ReasoningStep {
            thought: action.reasoning_text().to_string(),
            tool_call: Some(action.clone()),
        })?;

        // ── Step 5: Trust check ──────────────────────────────────────────────
        //
        // Trust is a hard boundary: nothing else looks at the action first.
        if let Some(outcome) = self.check_trust(turn, &action)? {
            return Ok(outcome);
        }

        // ── Step 6: Catalog check ────────────────────────────────────────────
        //
        // A reviewer is never asked to approve a tool that cannot run.
        if catalog.resolve(&action.tool_name).is_none() {
            return self.reject_unknown_tool(turn, &action);
        }

        // ── Step 7: Human review ─────────────────────────────────────────────
        if let Some(reason) = self
            .governance
            .review
            .review_reason(&action.tool_name, &action.arguments)
        {
            info!(agent, turn, tool = %action.tool_name, reason = %reason, "action suspended for human review");
            self.record(EventKind::ReviewRequested {
                tool_name: action.tool_name.clone(),
                arguments: action.arguments.clone(),
            })?;
            return Ok(TurnOutcome::HitlReview {
                review: ReviewRequest {
                    tool_name: action.tool_name.clone(),
                    action,
                    reason,
                },
            });
        }

        self.execute_governed(turn, action, &catalog).await
    }

    /// Execute an action a human approved after a `HitlReview` outcome.
    ///
    /// Extraction and review are not repeated. Trust, reasoning quality,
    /// axioms and argument verification all run again against a fresh
    /// catalog, so approval cannot widen what the agent is allowed to do.
    pub async fn execute_approved(&self, action: ProposedAction) -> PraxisResult<TurnOutcome> {
        let turn = self.turns();
        info!(agent = %self.settings.name, turn, tool = %action.tool_name, "executing approved action");

        let catalog = self.discover(turn).await;
        if let Some(outcome) = self.check_trust(turn, &action)? {
            return Ok(outcome);
        }
        self.execute_governed(turn, action, &catalog).await
    }

    /// Record that a human rejected a suspended action.
    pub fn record_rejection(&self, action: &ProposedAction) -> PraxisResult<TurnOutcome> {
        info!(agent = %self.settings.name, turn = self.turns(), tool = %action.tool_name, "action rejected by reviewer");
        self.reject(
            action,
            RejectionStage::Human,
            TurnFailure::Rejected {
                tool_name: action.tool_name.clone(),
            },
        )
    }

    /// Stages after review: reasoning quality, axioms, verification,
    /// dispatch and recording.
    async fn execute_governed(
        &self,
        turn: u64,
        action: ProposedAction,
        catalog: &ToolCatalog,
    ) -> PraxisResult<TurnOutcome> {
        let agent = self.settings.name.as_str();

        // ── Step 8: Reasoning quality ────────────────────────────────────────
        if !self
            .governance
            .reasoning
            .is_sufficient(&action.tool_name, action.reasoning_text())
        {
            warn!(agent, turn, tool = %action.tool_name, "high-stakes action lacks reasoning");
            let failure = TurnFailure::InsufficientReasoning {
                tool_name: action.tool_name.clone(),
            };
            return self.reject(&action, RejectionStage::Reasoning, failure);
        }

        // ── Step 9: Axiom validation ─────────────────────────────────────────
        //
        // A block leaves the caller's arguments untouched; an override is
        // adopted for everything downstream.
        let arguments = match self
            .governance
            .axioms
            .validate(&action.tool_name, &action.arguments)
        {
            Ok(arguments) => arguments,
            Err(violation) => {
                let failure = TurnFailure::AxiomBlocked {
                    axiom: violation.axiom,
                };
                return self.reject(&action, RejectionStage::Axiom, failure);
            }
        };
        let action = ProposedAction {
            arguments,
            ..action
        };

        // ── Step 10: Argument verification ───────────────────────────────────
        let Some(entry) = catalog.resolve(&action.tool_name) else {
            return self.reject_unknown_tool(turn, &action);
        };
        let source = entry.source;

        let rejection = match self.verifier.verify(&action, catalog) {
            Ok(report) if report.passed => None,
            Ok(report) => Some(report.summary()),
            Err(err) => Some(err.to_string()),
        };
        if let Some(reason) = rejection {
            warn!(agent, turn, tool = %action.tool_name, reason = %reason, "argument verification failed");
            let failure = TurnFailure::InvalidArguments {
                tool_name: action.tool_name.clone(),
                reason,
            };
            return self.reject(&action, RejectionStage::Verification, failure);
        }

        // ── Step 11: Execution ───────────────────────────────────────────────
        self.record(EventKind::ToolExecution {
            tool_name: action.tool_name.clone(),
            arguments: action.arguments.clone(),
            status: ExecutionStatus::Started,
        })?;

        debug!(agent, turn, tool = %action.tool_name, ?source, "dispatching tool");
        let result = self.dispatch(&action, source).await;

        // ── Step 12: Record the result ───────────────────────────────────────
        match result {
            Ok(output) => {
                self.record(EventKind::ToolExecution {
                    tool_name: action.tool_name.clone(),
                    arguments: action.arguments.clone(),
                    status: ExecutionStatus::Completed,
                })?;
                self.record(EventKind::ToolResult {
                    tool_name: action.tool_name.clone(),
                    output: output.clone(),
                    error: None,
                })?;
                info!(agent, turn, tool = %action.tool_name, "tool executed");
                Ok(TurnOutcome::ActionResult {
                    tool_name: action.tool_name,
                    content: output,
                })
            }
            Err(err) => {
                let message = match err {
                    PraxisError::ToolExecution { reason, .. } => reason,
                    other => other.to_string(),
                };
                warn!(agent, turn, tool = %action.tool_name, error = %message, "tool failed");
                self.record(EventKind::ToolExecution {
                    tool_name: action.tool_name.clone(),
                    arguments: action.arguments.clone(),
                    status: ExecutionStatus::Failed,
                })?;
                self.record(EventKind::ToolResult {
                    tool_name: action.tool_name.clone(),
                    output: String::new(),
                    error: Some(message.clone()),
                })?;
                Ok(TurnOutcome::error(TurnFailure::ToolFailed {
                    tool_name: action.tool_name,
                    message,
                }))
            }
        }
    }

    /// `Some(outcome)` when the trust gate denies the action.
    fn check_trust(&self, turn: u64, action: &ProposedAction) -> PraxisResult<Option<TurnOutcome>> {
        if self.governance.trust.can_execute(&action.tool_name) {
            return Ok(None);
        }
        warn!(
            agent = %self.settings.name,
            turn,
            tool = %action.tool_name,
            level = %self.trust_level(),
            "trust gate denied action"
        );
        let failure = TurnFailure::TrustViolation {
            tool_name: action.tool_name.clone(),
            level: self.trust_level(),
        };
        self.reject(action, RejectionStage::Trust, failure).map(Some)
    }

    fn reject_unknown_tool(&self, turn: u64, action: &ProposedAction) -> PraxisResult<TurnOutcome> {
        warn!(agent = %self.settings.name, turn, tool = %action.tool_name, "action names a tool outside the catalog");
        let failure = TurnFailure::UnknownTool {
            tool_name: action.tool_name.clone(),
        };
        self.reject(action, RejectionStage::UnknownTool, failure)
    }

    /// Merge native tools with whatever the bridge offers this turn.
    async fn discover(&self, turn: u64) -> ToolCatalog {
        let mut catalog: ToolCatalog = self.tools.catalog_entries().collect();

        if let Some(bridge) = &self.bridge {
            match bridge.list_tools().await {
                Ok(entries) => {
                    for mut entry in entries {
                        entry.source = ToolSource::External;
                        let name = entry.name.clone();
                        if !catalog.insert(entry) {
                            debug!(turn, tool = %name, "external tool shadowed by an earlier entry");
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        agent = %self.settings.name,
                        turn,
                        error = %err,
                        "tool discovery failed, continuing with native tools only"
                    );
                }
            }
        }

        debug!(turn, tools = catalog.len(), "catalog assembled");
        catalog
    }

    async fn dispatch(&self, action: &ProposedAction, source: ToolSource) -> PraxisResult<String> {
        match (source, self.tools.get(&action.tool_name), &self.bridge) {
            (ToolSource::Native, Some(tool), _) => tool.execute(&action.arguments).await,
            (ToolSource::External, _, Some(bridge)) => {
                bridge.call_tool(&action.tool_name, &action.arguments).await
            }
            _ => Err(PraxisError::UnknownTool {
                tool_name: action.tool_name.clone(),
            }),
        }
    }

    /// The configured prompt behind a short situational preamble.
    fn system_prompt(&self) -> String {
        format!(
            "You are {}. The current time is {}.\n\n{}",
            self.settings.name,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            self.settings.system_prompt
        )
    }

    /// Advance the turn counter, recording `AgentStart` before the first turn.
    fn begin_turn(&self) -> PraxisResult<u64> {
        if !self.started.swap(true, Ordering::SeqCst) {
            self.record(EventKind::AgentStart {
                agent_name: self.settings.name.clone(),
                trust_level: self.trust_level(),
            })?;
        }
        Ok(self.turns.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn reject(
        &self,
        action: &ProposedAction,
        stage: RejectionStage,
        failure: TurnFailure,
    ) -> PraxisResult<TurnOutcome> {
        self.record(EventKind::ActionRejected {
            tool_name: action.tool_name.clone(),
            arguments: action.arguments.clone(),
            stage,
            reason: failure.to_string(),
        })?;
        Ok(TurnOutcome::error(failure))
    }

    fn record(&self, kind: EventKind) -> PraxisResult<()> {
        self.store.append(Event::new(self.settings.name.as_str(), kind))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use praxis_contracts::{
        action::{Arguments, ProposedAction, RawDecision},
        catalog::{ToolCatalog, ToolCatalogEntry, ToolSource},
        error::{PraxisError, PraxisResult},
        event::{Event, EventKind, RejectionStage},
        outcome::{TurnFailure, TurnOutcome},
        trust::TrustLevel,
        verify::{VerificationFailure, VerificationReport},
    };
    use praxis_policy::{Axiom, AxiomRule, AxiomVerdict, Governance, ReviewGate, ViolationPolicy};

    use crate::context::ChatMessage;
    use crate::registry::ToolRegistry;
    use crate::traits::{ArgumentVerifier, EventStore, ModelProvider, NativeTool, ToolBridge};

    use super::{AgentSettings, Executor};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A provider that replays a fixed script and captures what it was sent.
    struct ScriptedProvider {
        script: Mutex<VecDeque<PraxisResult<RawDecision>>>,
        prompts: Arc<Mutex<Vec<String>>>,
        histories: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<PraxisResult<RawDecision>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                prompts: Arc::new(Mutex::new(vec![])),
                histories: Arc::new(Mutex::new(vec![])),
            }
        }

        fn text(text: &str) -> Self {
            Self::new(vec![Ok(RawDecision::text(text))])
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        async fn infer(
            &self,
            system_prompt: &str,
            history: &[ChatMessage],
            _catalog: &ToolCatalog,
        ) -> PraxisResult<RawDecision> {
            self.prompts.lock().unwrap().push(system_prompt.to_string());
            self.histories.lock().unwrap().push(history.to_vec());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawDecision::text("nothing left to do")))
        }
    }

    /// An event store that keeps everything in a shared vector.
    #[derive(Clone, Default)]
    struct MockStore {
        events: Arc<Mutex<Vec<Event>>>,
        fail: bool,
    }

    impl MockStore {
        fn kinds(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().iter().map(|e| e.kind_name()).collect()
        }
    }

    impl EventStore for MockStore {
        fn append(&self, event: Event) -> PraxisResult<()> {
            if self.fail {
                return Err(PraxisError::EventStoreWrite {
                    reason: "disk full".to_string(),
                });
            }
            self.events.lock().unwrap().push(event);
            Ok(())
        }

        fn history(&self) -> PraxisResult<Vec<Event>> {
            Ok(self.events.lock().unwrap().clone())
        }

        fn recent(&self, limit: usize) -> PraxisResult<Vec<Event>> {
            let events = self.events.lock().unwrap();
            Ok(events[events.len().saturating_sub(limit)..].to_vec())
        }

        fn len(&self) -> PraxisResult<usize> {
            Ok(self.events.lock().unwrap().len())
        }
    }

    /// A verifier that can be configured to pass or fail.
    struct MockVerifier {
        pass: bool,
    }

    impl ArgumentVerifier for MockVerifier {
        fn verify(
            &self,
            _action: &ProposedAction,
            _catalog: &ToolCatalog,
        ) -> PraxisResult<VerificationReport> {
            if self.pass {
                Ok(VerificationReport::pass())
            } else {
                Ok(VerificationReport::from_failures(vec![VerificationFailure {
                    check: "required".to_string(),
                    message: "'sensor_id' is a required property".to_string(),
                }]))
            }
        }
    }

    /// A native tool that records every call.
    struct MockTool {
        name: &'static str,
        calls: Arc<Mutex<Vec<Arguments>>>,
        fail: bool,
    }

    impl MockTool {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                calls: Arc::new(Mutex::new(vec![])),
                fail: false,
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::new(name)
            }
        }
    }

    #[async_trait]
    impl NativeTool for MockTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "mock tool"
        }

        async fn execute(&self, arguments: &Arguments) -> PraxisResult<String> {
            self.calls.lock().unwrap().push(arguments.clone());
            if self.fail {
                return Err(PraxisError::ToolExecution {
                    tool_name: self.name.to_string(),
                    reason: "device offline".to_string(),
                });
            }
            Ok(format!("{} ok: {}", self.name, serde_json::Value::Object(arguments.clone())))
        }
    }

    /// A bridge that serves one external tool, or is down entirely.
    struct MockBridge {
        up: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ToolBridge for MockBridge {
        async fn list_tools(&self) -> PraxisResult<Vec<ToolCatalogEntry>> {
            if !self.up {
                return Err(PraxisError::ToolBridge {
                    reason: "connection refused".to_string(),
                });
            }
            Ok(vec![ToolCatalogEntry::new(
                "remote_lookup",
                "external lookup",
                serde_json::Value::Null,
                ToolSource::External,
            )])
        }

        async fn call_tool(&self, name: &str, _arguments: &Arguments) -> PraxisResult<String> {
            self.calls.lock().unwrap().push(name.to_string());
            Ok("remote answer".to_string())
        }
    }

    fn call(tool: &str, args: serde_json::Value) -> RawDecision {
        RawDecision::text(format!(
            "Because the operator asked for it.\n{}",
            json!({"name": tool, "arguments": args})
        ))
    }

    fn executor(
        governance: Governance,
        provider: ScriptedProvider,
        store: &MockStore,
        tools: ToolRegistry,
    ) -> Executor {
        Executor::new(
            AgentSettings {
                name: "unit".to_string(),
                ..AgentSettings::default()
            },
            governance,
            Box::new(provider),
            Box::new(store.clone()),
            Box::new(MockVerifier { pass: true }),
        )
        .with_tools(tools)
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn text_reply_is_recorded_and_returned() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::text("Hello, how can I help?"),
            &store,
            ToolRegistry::new(),
        );

        let outcome = exec.process("hi").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Text {
                content: "Hello, how can I help?".to_string()
            }
        );
        assert_eq!(store.kinds(), vec!["agent_start", "user_message", "reasoning_step"]);
    }

    /// A critical tool suspends the turn and never executes.
    #[tokio::test]
    async fn critical_tool_suspends_for_review() {
        let store = MockStore::default();
        let shell = MockTool::new("shell_tool");
        let calls = shell.calls.clone();
        let exec = executor(
            Governance::new(TrustLevel::Full),
            ScriptedProvider::new(vec![Ok(RawDecision::text(
                "```json\n{\"name\": \"shell_tool\", \"arguments\": {\"command\": \"rm -rf /tmp/x\"}}\n```",
            ))]),
            &store,
            ToolRegistry::new().with(Arc::new(shell)),
        );

        let outcome = exec.process("clean up").await.unwrap();

        match outcome {
            TurnOutcome::HitlReview { review } => {
                assert_eq!(review.tool_name, "shell_tool");
                assert_eq!(review.action.arguments["command"], "rm -rf /tmp/x");
            }
            other => panic!("expected HitlReview, got {:?}", other),
        }
        assert!(calls.lock().unwrap().is_empty(), "tool must not run before approval");
        assert!(!store.kinds().contains(&"tool_execution"));
        assert_eq!(store.kinds().last(), Some(&"review_requested"));
    }

    /// Trust is checked before review and axioms, and a denial never
    /// produces a ToolExecution event.
    #[tokio::test]
    async fn trust_denial_precedes_review_and_axioms() {
        let store = MockStore::default();
        let axiom_calls = Arc::new(Mutex::new(0u32));
        let counter = axiom_calls.clone();
        let governance = Governance::new(TrustLevel::Isolated)
            .with_review(ReviewGate::new(["shell_command"], ["rm"]))
            .with_axiom(Axiom::new("count", ViolationPolicy::Block, move |_| {
                *counter.lock().unwrap() += 1;
                AxiomVerdict::Pass
            }));
        let exec = executor(
            governance,
            ScriptedProvider::new(vec![Ok(call("shell_command", json!({"cmd": "ls"})))]),
            &store,
            ToolRegistry::new().with(Arc::new(MockTool::new("shell_command"))),
        );

        let outcome = exec.process("list files").await.unwrap();

        match outcome {
            TurnOutcome::Error {
                failure: TurnFailure::TrustViolation { tool_name, level },
            } => {
                assert_eq!(tool_name, "shell_command");
                assert_eq!(level, TrustLevel::Isolated);
            }
            other => panic!("expected TrustViolation, got {:?}", other),
        }
        assert_eq!(*axiom_calls.lock().unwrap(), 0, "axioms must not run after a trust denial");
        assert!(!store.kinds().contains(&"tool_execution"));
        let events = store.events.lock().unwrap();
        assert!(matches!(
            events.last().map(|e| &e.kind),
            Some(EventKind::ActionRejected { stage: RejectionStage::Trust, .. })
        ));
    }

    /// An override axiom patches the arguments the tool receives.
    #[tokio::test]
    async fn axiom_override_reaches_the_tool() {
        let store = MockStore::default();
        let actuator = MockTool::new("set_actuator");
        let calls = actuator.calls.clone();
        let governance = Governance::new(TrustLevel::Standard).with_axiom(Axiom::from_rule(
            "enforce_thermal_limits",
            ViolationPolicy::Override,
            AxiomRule::Clamp {
                field: "value".to_string(),
                min: None,
                max: Some(400.0),
            },
        ));
        let exec = executor(
            governance,
            ScriptedProvider::new(vec![Ok(call(
                "set_actuator",
                json!({"target_id": "core_temp", "value": 550.0}),
            ))]),
            &store,
            ToolRegistry::new().with(Arc::new(actuator)),
        );

        let outcome = exec.process("heat the core").await.unwrap();

        assert_eq!(outcome.type_name(), "action_result");
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["value"], json!(400.0));
        assert_eq!(calls[0]["target_id"], "core_temp");
    }

    #[tokio::test]
    async fn axiom_block_stops_execution() {
        let store = MockStore::default();
        let tool = MockTool::new("set_actuator");
        let calls = tool.calls.clone();
        let governance = Governance::new(TrustLevel::Standard).with_axiom(Axiom::new(
            "no_overpressure",
            ViolationPolicy::Block,
            |args| AxiomVerdict::from(args.get("psi").and_then(|v| v.as_f64()) < Some(100.0)),
        ));
        let exec = executor(
            governance,
            ScriptedProvider::new(vec![Ok(call("set_actuator", json!({"psi": 250})))]),
            &store,
            ToolRegistry::new().with(Arc::new(tool)),
        );

        let outcome = exec.process("pressurize").await.unwrap();

        match &outcome {
            TurnOutcome::Error {
                failure: TurnFailure::AxiomBlocked { axiom },
            } => assert_eq!(axiom, "no_overpressure"),
            other => panic!("expected AxiomBlocked, got {:?}", other),
        }
        assert!(outcome.content().contains("blocked by safety axiom"));
        assert!(calls.lock().unwrap().is_empty());
    }

    /// Missing justification is reported differently from an axiom block.
    #[tokio::test]
    async fn high_stakes_tool_without_reasoning_is_rejected() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Full),
            ScriptedProvider::new(vec![Ok(RawDecision::tool_call("shell", r#"{"cmd": "ls"}"#))]),
            &store,
            ToolRegistry::new().with(Arc::new(MockTool::new("shell"))),
        );

        let outcome = exec.process("go").await.unwrap();

        match &outcome {
            TurnOutcome::Error {
                failure: TurnFailure::InsufficientReasoning { tool_name },
            } => assert_eq!(tool_name, "shell"),
            other => panic!("expected InsufficientReasoning, got {:?}", other),
        }
        assert!(outcome.content().starts_with("insufficient reasoning"));
    }

    #[tokio::test]
    async fn native_call_to_unknown_tool_is_rejected() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Full),
            ScriptedProvider::new(vec![Ok(RawDecision::tool_call("launch_rocket", "{}"))]),
            &store,
            ToolRegistry::new(),
        );

        let outcome = exec.process("go").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::error(TurnFailure::UnknownTool {
                tool_name: "launch_rocket".to_string()
            })
        );
    }

    /// An unknown tool is rejected before review, even when its name or
    /// arguments would otherwise trigger a review.
    #[tokio::test]
    async fn unknown_critical_tool_is_rejected_without_review() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Full)
                .with_review(ReviewGate::new(["wipe_disk"], ["delete"])),
            ScriptedProvider::new(vec![Ok(RawDecision::tool_call(
                "wipe_disk",
                r#"{"mode": "delete"}"#,
            ))]),
            &store,
            ToolRegistry::new(),
        );

        let outcome = exec.process("clean the disk").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::error(TurnFailure::UnknownTool {
                tool_name: "wipe_disk".to_string()
            })
        );
        assert!(!store.kinds().contains(&"review_requested"));
        assert_eq!(store.kinds().last(), Some(&"action_rejected"));
    }

    #[tokio::test]
    async fn failed_verification_is_invalid_arguments() {
        let store = MockStore::default();
        let tool = MockTool::new("read_sensor");
        let calls = tool.calls.clone();
        let exec = Executor::new(
            AgentSettings::default(),
            Governance::new(TrustLevel::Standard),
            Box::new(ScriptedProvider::new(vec![Ok(call("read_sensor", json!({})))])),
            Box::new(store.clone()),
            Box::new(MockVerifier { pass: false }),
        )
        .with_tools(ToolRegistry::new().with(Arc::new(tool)));

        let outcome = exec.process("read").await.unwrap();

        match outcome {
            TurnOutcome::Error {
                failure: TurnFailure::InvalidArguments { reason, .. },
            } => assert!(reason.contains("sensor_id"), "reason: {}", reason),
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    /// Tool errors are recorded and surfaced, not raised.
    #[tokio::test]
    async fn tool_error_is_recorded_as_result() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::new(vec![Ok(call("set_actuator", json!({"value": 1})))]),
            &store,
            ToolRegistry::new().with(Arc::new(MockTool::failing("set_actuator"))),
        );

        let outcome = exec.process("move").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::error(TurnFailure::ToolFailed {
                tool_name: "set_actuator".to_string(),
                message: "device offline".to_string(),
            })
        );
        let events = store.events.lock().unwrap();
        match &events.last().unwrap().kind {
            EventKind::ToolResult { error, .. } => {
                assert_eq!(error.as_deref(), Some("device offline"))
            }
            other => panic!("expected ToolResult, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn successful_execution_records_every_transition() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::new(vec![Ok(call("read_sensor", json!({"sensor_id": "T1"})))]),
            &store,
            ToolRegistry::new().with(Arc::new(MockTool::new("read_sensor"))),
        );

        let outcome = exec.process("read T1").await.unwrap();

        assert_eq!(outcome.type_name(), "action_result");
        assert_eq!(
            store.kinds(),
            vec![
                "agent_start",
                "user_message",
                "reasoning_step",
                "tool_execution",
                "tool_execution",
                "tool_result"
            ]
        );
    }

    #[tokio::test]
    async fn provider_failure_is_not_fatal() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::new(vec![Err(PraxisError::Provider {
                reason: "timeout".to_string(),
            })]),
            &store,
            ToolRegistry::new(),
        );

        let outcome = exec.process("hi").await.unwrap();

        match outcome {
            TurnOutcome::Error {
                failure: TurnFailure::ProviderUnavailable { reason },
            } => assert!(reason.contains("timeout")),
            other => panic!("expected ProviderUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn store_failure_is_fatal() {
        let store = MockStore {
            fail: true,
            ..MockStore::default()
        };
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::text("hi"),
            &store,
            ToolRegistry::new(),
        );

        match exec.process("hi").await {
            Err(PraxisError::EventStoreWrite { reason }) => assert_eq!(reason, "disk full"),
            other => panic!("expected EventStoreWrite, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn external_tools_are_dispatched_through_the_bridge() {
        let store = MockStore::default();
        let bridge_calls = Arc::new(Mutex::new(vec![]));
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::new(vec![Ok(call("remote_lookup", json!({"q": "x"})))]),
            &store,
            ToolRegistry::new(),
        )
        .with_bridge(Box::new(MockBridge {
            up: true,
            calls: bridge_calls.clone(),
        }));

        let outcome = exec.process("look it up").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::ActionResult {
                tool_name: "remote_lookup".to_string(),
                content: "remote answer".to_string(),
            }
        );
        assert_eq!(*bridge_calls.lock().unwrap(), vec!["remote_lookup".to_string()]);
    }

    #[tokio::test]
    async fn discovery_failure_degrades_to_native_tools() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::new(vec![Ok(call("read_sensor", json!({})))]),
            &store,
            ToolRegistry::new().with(Arc::new(MockTool::new("read_sensor"))),
        )
        .with_bridge(Box::new(MockBridge {
            up: false,
            calls: Arc::new(Mutex::new(vec![])),
        }));

        let outcome = exec.process("read").await.unwrap();

        assert_eq!(outcome.type_name(), "action_result");
    }

    #[tokio::test]
    async fn approved_action_executes_without_review() {
        let store = MockStore::default();
        let shell = MockTool::new("shell_tool");
        let calls = shell.calls.clone();
        let exec = executor(
            Governance::new(TrustLevel::Full),
            ScriptedProvider::new(vec![Ok(call("shell_tool", json!({"command": "ls"})))]),
            &store,
            ToolRegistry::new().with(Arc::new(shell)),
        );

        let review = match exec.process("list").await.unwrap() {
            TurnOutcome::HitlReview { review } => review,
            other => panic!("expected HitlReview, got {:?}", other),
        };
        let outcome = exec.execute_approved(review.action).await.unwrap();

        assert_eq!(outcome.type_name(), "action_result");
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    /// Approval cannot override the trust ceiling.
    #[tokio::test]
    async fn approved_action_still_checks_trust() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Standard),
            ScriptedProvider::text("unused"),
            &store,
            ToolRegistry::new().with(Arc::new(MockTool::new("file_system"))),
        );

        let action = ProposedAction::new("file_system", Arguments::new())
            .with_reasoning("cleanup requested by the operator");
        let outcome = exec.execute_approved(action).await.unwrap();

        assert!(matches!(
            outcome,
            TurnOutcome::Error {
                failure: TurnFailure::TrustViolation { .. }
            }
        ));
    }

    #[tokio::test]
    async fn rejection_is_recorded() {
        let store = MockStore::default();
        let exec = executor(
            Governance::new(TrustLevel::Full),
            ScriptedProvider::text("unused"),
            &store,
            ToolRegistry::new(),
        );

        let action = ProposedAction::new("shell_tool", Arguments::new());
        let outcome = exec.record_rejection(&action).unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::error(TurnFailure::Rejected {
                tool_name: "shell_tool".to_string()
            })
        );
        let events = store.events.lock().unwrap();
        assert!(matches!(
            &events.last().unwrap().kind,
            EventKind::ActionRejected { stage: RejectionStage::Human, .. }
        ));
    }

    #[tokio::test]
    async fn provider_sees_preamble_and_bounded_history() {
        let store = MockStore::default();
        let provider = ScriptedProvider::new(vec![
            Ok(RawDecision::text("one")),
            Ok(RawDecision::text("two")),
            Ok(RawDecision::text("three")),
        ]);
        let prompts = provider.prompts.clone();
        let histories = provider.histories.clone();
        let exec = Executor::new(
            AgentSettings {
                name: "plant-agent".to_string(),
                system_prompt: "Keep the plant safe.".to_string(),
                history_window: 3,
            },
            Governance::new(TrustLevel::Standard),
            Box::new(provider),
            Box::new(store.clone()),
            Box::new(MockVerifier { pass: true }),
        );

        for input in ["a", "b", "c"] {
            exec.process(input).await.unwrap();
        }

        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].starts_with("You are plant-agent. The current time is "));
        assert!(prompts[0].ends_with("Keep the plant safe."));

        let histories = histories.lock().unwrap();
        let last = histories.last().unwrap();
        assert!(last.len() <= 3);
        assert_eq!(last.last().map(|m| m.content.as_str()), Some("c"));
        assert_eq!(exec.turns(), 3);
    }
}
