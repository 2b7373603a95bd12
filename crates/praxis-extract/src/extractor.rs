//! The layered extraction pipeline.

use std::ops::Range;

use praxis_contracts::{
    action::{Arguments, ProposedAction, RawDecision},
    catalog::ToolCatalog,
};
use serde_json::Value;
use tracing::debug;

use crate::call::find_call;
use crate::normalize::{candidate_from_value, Candidate};
use crate::reasoning::{split_reasoning, strip_code_fences, DEFAULT_REASONING_TAGS};
use crate::repair::{parse_object_lenient, repair_json};
use crate::scan::balanced_blocks;

/// Which layer produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The provider returned a native function call.
    Native,
    /// A balanced JSON block parsed strictly.
    JsonBlock,
    /// A balanced block parsed only after lenient repair.
    RepairedJson,
    /// `tool_name(...)` call syntax.
    CallSyntax,
}

/// Result of extracting one raw decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Action {
        action: ProposedAction,
        strategy: Strategy,
    },
    /// No usable tool call; the reply is conversational.
    Text { content: String },
}

impl Extraction {
    pub fn action(&self) -> Option<&ProposedAction> {
        match self {
            Extraction::Action { action, .. } => Some(action),
            Extraction::Text { .. } => None,
        }
    }
}

/// Turns raw model output into a [`ProposedAction`] or plain text.
///
/// Strategies run in a fixed order and the first success wins:
///
/// 1. native function call from the provider
/// 2. balanced `{...}` blocks, strictly parsed, in document order
/// 3. the same blocks after lenient repair
/// 4. `tool_name(...)` call syntax for catalog tools
///
/// A JSON candidate is only accepted when its name resolves against the
/// catalog; the canonical catalog name replaces whatever casing the model
/// used. Extraction is pure and never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ActionExtractor {
    reasoning_tags: Vec<String>,
}

impl Default for ActionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionExtractor {
    pub fn new() -> Self {
        Self {
            reasoning_tags: DEFAULT_REASONING_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Replace the recognized reasoning delimiter tags.
    pub fn with_reasoning_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reasoning_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn extract(&self, decision: &RawDecision, catalog: &ToolCatalog) -> Extraction {
        match decision {
            RawDecision::ToolCall {
                tool_name,
                arguments_json,
                reasoning,
            } => self.from_native(tool_name, arguments_json, reasoning.as_deref(), catalog),
            RawDecision::Text { content } => self.from_text(content, catalog),
        }
    }

    fn from_native(
        &self,
        tool_name: &str,
        arguments_json: &str,
        reasoning: Option<&str>,
        catalog: &ToolCatalog,
    ) -> Extraction {
        let arguments = if arguments_json.trim().is_empty() {
            Some(Arguments::new())
        } else {
            parse_object_lenient(arguments_json)
        };
        let Some(arguments) = arguments else {
            debug!(tool = %tool_name, "native call carried unparseable arguments");
            return Extraction::Text {
                content: format!(
                    "Tool call to '{tool_name}' had unparseable arguments: {arguments_json}"
                ),
            };
        };

        // Unknown names pass through; the executor rejects them explicitly.
        let name = catalog
            .resolve(tool_name)
            .map_or_else(|| tool_name.trim().to_string(), |entry| entry.name.clone());

        let mut action = ProposedAction::new(name, arguments);
        if let Some(reasoning) = reasoning {
            action = action.with_reasoning(reasoning);
        }
        debug!(tool = %action.tool_name, strategy = "native", "extracted action");
        Extraction::Action {
            action,
            strategy: Strategy::Native,
        }
    }

    fn from_text(&self, text: &str, catalog: &ToolCatalog) -> Extraction {
        let split = split_reasoning(text, &self.reasoning_tags);
        let body = split.body.as_str();
        let blocks = balanced_blocks(body);

        let strict = blocks.iter().find_map(|range| {
            let value = serde_json::from_str::<Value>(&body[range.clone()]).ok()?;
            resolve(candidate_from_value(&value)?, catalog).map(|c| (c, range.clone()))
        });
        let repaired = || {
            blocks.iter().find_map(|range| {
                let block = &body[range.clone()];
                if serde_json::from_str::<Value>(block).is_ok() {
                    return None;
                }
                let value = serde_json::from_str::<Value>(&repair_json(block)).ok()?;
                resolve(candidate_from_value(&value)?, catalog).map(|c| (c, range.clone()))
            })
        };
        let called = || {
            find_call(body, catalog).map(|m| {
                let candidate = Candidate {
                    name: m.name,
                    arguments: m.arguments,
                };
                (candidate, m.span)
            })
        };

        let found = strict
            .map(|(c, span)| (c, span, Strategy::JsonBlock))
            .or_else(|| repaired().map(|(c, span)| (c, span, Strategy::RepairedJson)))
            .or_else(|| called().map(|(c, span)| (c, span, Strategy::CallSyntax)));

        match found {
            Some((candidate, span, strategy)) => {
                let reasoning = split
                    .reasoning
                    .clone()
                    .unwrap_or_else(|| surrounding_text(body, span));
                let action =
                    ProposedAction::new(candidate.name, candidate.arguments).with_reasoning(reasoning);
                debug!(tool = %action.tool_name, ?strategy, "extracted action");
                Extraction::Action { action, strategy }
            }
            None => {
                let visible = body.trim();
                let content = if visible.is_empty() { text.trim() } else { visible };
                Extraction::Text {
                    content: content.to_string(),
                }
            }
        }
    }
}

/// Keep the candidate only if its name is in the catalog, canonicalized.
fn resolve(candidate: Candidate, catalog: &ToolCatalog) -> Option<Candidate> {
    let entry = catalog.resolve(&candidate.name)?;
    Some(Candidate {
        name: entry.name.clone(),
        arguments: candidate.arguments,
    })
}

/// The text around an accepted call, without code fences.
fn surrounding_text(body: &str, span: Range<usize>) -> String {
    let outside = format!("{} {}", &body[..span.start], &body[span.end..]);
    strip_code_fences(&outside).trim().to_string()
}
