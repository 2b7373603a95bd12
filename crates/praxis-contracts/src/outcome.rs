//! Turn outcomes and goal-run history.
//!
//! `TurnOutcome` is what `Executor::process()` returns for one turn. Callers
//! pattern-match on it exhaustively:
//! - `Text` → the model answered without calling a tool
//! - `ActionResult` → a tool ran and produced output
//! - `Error` → the turn ended on a typed failure (see `TurnFailure`)
//! - `HitlReview` → the action is suspended pending a human decision

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{action::ProposedAction, trust::TrustLevel};

/// The result of one execution-core turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Plain conversational reply.
    Text { content: String },
    /// Output of an executed tool.
    ActionResult { tool_name: String, content: String },
    /// The turn failed. Never retried automatically.
    Error { failure: TurnFailure },
    /// The action needs manual approval before it may run. The request's
    /// fields sit beside `type` when serialized.
    HitlReview {
        #[serde(flatten)]
        review: ReviewRequest,
    },
}

impl TurnOutcome {
    pub fn error(failure: TurnFailure) -> Self {
        TurnOutcome::Error { failure }
    }

    /// The snake_case discriminant, matching the serialized `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            TurnOutcome::Text { .. } => "text",
            TurnOutcome::ActionResult { .. } => "action_result",
            TurnOutcome::Error { .. } => "error",
            TurnOutcome::HitlReview { .. } => "hitl_review",
        }
    }

    /// Human-readable content of the outcome.
    pub fn content(&self) -> String {
        match self {
            TurnOutcome::Text { content } => content.clone(),
            TurnOutcome::ActionResult { content, .. } => content.clone(),
            TurnOutcome::Error { failure } => failure.to_string(),
            TurnOutcome::HitlReview { review } => review.reason.clone(),
        }
    }
}

/// A typed, non-fatal turn failure.
///
/// Each variant renders a distinct message so "policy blocked" can always be
/// told apart from "insufficient justification".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum TurnFailure {
    /// The tool is above the agent's trust ceiling.
    TrustViolation { tool_name: String, level: TrustLevel },
    /// An axiom vetoed the action.
    AxiomBlocked { axiom: String },
    /// A high-stakes tool was proposed without adequate reasoning.
    InsufficientReasoning { tool_name: String },
    /// The tool is not in this turn's catalog.
    UnknownTool { tool_name: String },
    /// The arguments failed verification against the tool's schema.
    InvalidArguments { tool_name: String, reason: String },
    /// The tool ran and reported an error.
    ToolFailed { tool_name: String, message: String },
    /// The model provider could not produce a decision.
    ProviderUnavailable { reason: String },
    /// A human rejected the action.
    Rejected { tool_name: String },
}

impl fmt::Display for TurnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnFailure::TrustViolation { tool_name, level } => write!(
                f,
                "trust violation: tool '{tool_name}' is not permitted at trust level '{level}'"
            ),
            TurnFailure::AxiomBlocked { axiom } => {
                write!(f, "operation blocked by safety axiom: {axiom}")
            }
            TurnFailure::InsufficientReasoning { tool_name } => write!(
                f,
                "insufficient reasoning: high-stakes tool '{tool_name}' requires a justification"
            ),
            TurnFailure::UnknownTool { tool_name } => {
                write!(f, "unknown tool '{tool_name}' is not in the current catalog")
            }
            TurnFailure::InvalidArguments { tool_name, reason } => {
                write!(f, "invalid arguments for tool '{tool_name}': {reason}")
            }
            TurnFailure::ToolFailed { tool_name, message } => {
                write!(f, "tool '{tool_name}' failed: {message}")
            }
            TurnFailure::ProviderUnavailable { reason } => {
                write!(f, "model provider unavailable: {reason}")
            }
            TurnFailure::Rejected { tool_name } => {
                write!(f, "action '{tool_name}' was rejected by a human reviewer")
            }
        }
    }
}

/// A suspended action awaiting a human decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub tool_name: String,
    /// The full action, handed back unchanged to `execute_approved`.
    pub action: ProposedAction,
    /// Why review was triggered.
    pub reason: String,
}

/// The out-of-band answer to a `ReviewRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// Interpret a free-form human answer. Anything unrecognised rejects.
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "approve" | "approved" | "yes" | "y" | "a" => ReviewDecision::Approve,
            _ => ReviewDecision::Reject,
        }
    }
}

/// How a suspended step was settled by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResolution {
    pub decision: ReviewDecision,
    /// Outcome of the approved execution. Absent on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TurnOutcome>,
}

/// One iteration of a goal run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStep {
    /// 1-based step index.
    pub step: u32,
    pub outcome: TurnOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewResolution>,
}

/// Why a goal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// A text outcome contained a completion phrase.
    GoalAchieved,
    /// `max_steps` iterations ran without completion.
    StepBudgetExhausted,
    /// The driver was stopped through its stop handle.
    Stopped,
}

/// In-memory record of one goal run. Durable history lives in the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopHistory {
    pub goal: String,
    pub steps: Vec<LoopStep>,
    pub status: RunStatus,
}

impl LoopHistory {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::GoalAchieved
    }
}
