//! Construction of the bounded message history sent to the model provider.

use serde::{Deserialize, Serialize};

use praxis_contracts::event::{Event, EventKind};

/// Speaker of a context message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// One message of model context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Render events as conversation messages and sanitize the result.
///
/// Lifecycle events (agent start, execution status, review requests) carry
/// no conversational content and are skipped.
pub fn build_messages(events: &[Event]) -> Vec<ChatMessage> {
    let messages = events.iter().filter_map(|event| match &event.kind {
        EventKind::UserMessage { content } => Some(ChatMessage::new(Role::User, content.clone())),
        EventKind::ReasoningStep { thought, tool_call } => {
            let content = match tool_call {
                Some(call) if thought.trim().is_empty() => format!(
                    "Calling tool '{}' with {}",
                    call.tool_name,
                    serde_json::Value::Object(call.arguments.clone())
                ),
                _ => thought.clone(),
            };
            Some(ChatMessage::new(Role::Assistant, content))
        }
        EventKind::ToolResult {
            tool_name,
            output,
            error,
        } => Some(ChatMessage::new(
            Role::Tool,
            match error {
                Some(error) => format!("Tool '{tool_name}' failed: {error}"),
                None => format!("Tool '{tool_name}' returned: {output}"),
            },
        )),
        EventKind::ActionRejected {
            tool_name, reason, ..
        } if !tool_name.is_empty() => Some(ChatMessage::new(
            Role::Tool,
            format!("Action '{tool_name}' was not executed: {reason}"),
        )),
        _ => None,
    });

    sanitize(messages)
}

/// Drop empty messages and collapse runs of same-role messages, keeping the
/// latest of each run.
pub fn sanitize(messages: impl IntoIterator<Item = ChatMessage>) -> Vec<ChatMessage> {
    let mut out: Vec<ChatMessage> = Vec::new();
    for message in messages {
        if message.content.trim().is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.role == message.role => *last = message,
            _ => out.push(message),
        }
    }
    out
}
