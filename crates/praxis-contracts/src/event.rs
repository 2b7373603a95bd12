//! Agent events: the durable record of everything an agent does.
//!
//! Events are created once by the executor and never mutated. The event
//! store owns them for the lifetime of the agent session and orders them by
//! append sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{action::Arguments, action::ProposedAction, trust::TrustLevel};

/// Unique identifier of a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub uuid::Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// One immutable entry in an agent's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Wall-clock creation time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Name of the agent that produced the event.
    pub agent: String,
    /// The kind-specific payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Stamp a new event with a fresh id and the current time.
    pub fn new(agent: impl Into<String>, kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            agent: agent.into(),
            kind,
        }
    }

    /// The snake_case discriminant of this event's kind.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Lifecycle status carried by `EventKind::ToolExecution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Started,
    Completed,
    Failed,
}

/// The governance stage that turned an action down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionStage {
    Trust,
    Reasoning,
    Axiom,
    Verification,
    UnknownTool,
    Human,
    Provider,
}

/// Tagged payload of an `Event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// The agent was constructed.
    AgentStart {
        agent_name: String,
        trust_level: TrustLevel,
    },
    /// Input received at the start of a turn.
    UserMessage { content: String },
    /// The model's reasoning for this turn, with the extracted call if any.
    ReasoningStep {
        thought: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call: Option<ProposedAction>,
    },
    /// A governance stage refused the proposed action.
    ActionRejected {
        tool_name: String,
        arguments: Arguments,
        stage: RejectionStage,
        reason: String,
    },
    /// The action was suspended for human review.
    ReviewRequested {
        tool_name: String,
        arguments: Arguments,
    },
    /// A tool dispatch transition.
    ToolExecution {
        tool_name: String,
        arguments: Arguments,
        status: ExecutionStatus,
    },
    /// The output (or error) of a tool dispatch.
    ToolResult {
        tool_name: String,
        output: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::AgentStart { .. } => "agent_start",
            EventKind::UserMessage { .. } => "user_message",
            EventKind::ReasoningStep { .. } => "reasoning_step",
            EventKind::ActionRejected { .. } => "action_rejected",
            EventKind::ReviewRequested { .. } => "review_requested",
            EventKind::ToolExecution { .. } => "tool_execution",
            EventKind::ToolResult { .. } => "tool_result",
        }
    }
}
