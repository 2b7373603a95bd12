//! Proposed tool invocations and raw model decisions.
//!
//! A `RawDecision` is what the model-provider collaborator hands back for one
//! inference call. The extractor turns it into either a `ProposedAction` or a
//! plain conversational reply. A `ProposedAction` lives for exactly one turn.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keyword arguments of a tool call, keyed by name. Key order is not kept.
pub type Arguments = Map<String, Value>;

/// A structured tool call the agent intends to make.
///
/// Produced by the extractor, possibly rewritten by axioms, and consumed by
/// the executor. `tool_name` must resolve against the turn's catalog before
/// the executor will dispatch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    /// Canonical catalog name of the tool.
    pub tool_name: String,
    /// Arguments the tool will receive.
    pub arguments: Arguments,
    /// Free text the model produced alongside the call, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ProposedAction {
    /// Build an action with no accompanying reasoning.
    pub fn new(tool_name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            reasoning: None,
        }
    }

    /// Attach reasoning text, dropping it when it is blank.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        let reasoning = reasoning.into();
        let trimmed = reasoning.trim();
        self.reasoning = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// The reasoning text, or the empty string.
    pub fn reasoning_text(&self) -> &str {
        self.reasoning.as_deref().unwrap_or("")
    }
}

/// The unprocessed answer of one inference call.
///
/// Providers with native function calling return `ToolCall`; everything else
/// (including providers that emit JSON inside prose) returns `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawDecision {
    /// A native function call. `arguments_json` is the provider's raw argument string.
    ToolCall {
        tool_name: String,
        arguments_json: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reasoning: Option<String>,
    },
    /// Free-form model output.
    Text { content: String },
}

impl RawDecision {
    /// Convenience constructor for a text decision.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Convenience constructor for a native function call.
    pub fn tool_call(tool_name: impl Into<String>, arguments_json: impl Into<String>) -> Self {
        Self::ToolCall {
            tool_name: tool_name.into(),
            arguments_json: arguments_json.into(),
            reasoning: None,
        }
    }
}
