//! Scripted collaborators standing in for a model and a human reviewer.
//!
//! No model endpoint is contacted. [`ScriptedProvider`] replays a fixed list
//! of decisions, one per turn, and [`ScriptedApprovals`] answers review
//! requests from a fixed list of decisions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use praxis_contracts::{
    action::RawDecision,
    catalog::ToolCatalog,
    error::{PraxisError, PraxisResult},
    outcome::{ReviewDecision, ReviewRequest},
};
use praxis_core::{
    traits::{ApprovalHandler, ModelProvider},
    ChatMessage,
};

/// Text returned once the script is exhausted.
pub const SCRIPT_EXHAUSTED: &str = "I have no further actions planned.";

/// Replays decisions in order.
///
/// Clones share the script and the call log, so a test can keep one clone
/// after handing the other to the executor.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<RawDecision>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    offline: bool,
}

impl ScriptedProvider {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = RawDecision>,
    {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            ..Self::default()
        }
    }

    /// A provider whose endpoint is unreachable.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Number of inference calls made so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }

    /// The system prompts of every call, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn infer(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        catalog: &ToolCatalog,
    ) -> PraxisResult<RawDecision> {
        if self.offline {
            return Err(PraxisError::Provider {
                reason: "inference endpoint unreachable".to_string(),
            });
        }

        self.prompts
            .lock()
            .map_err(|e| PraxisError::Provider {
                reason: format!("provider state poisoned: {e}"),
            })?
            .push(system_prompt.to_string());

        let next = self
            .script
            .lock()
            .map_err(|e| PraxisError::Provider {
                reason: format!("provider state poisoned: {e}"),
            })?
            .pop_front();

        debug!(
            messages = history.len(),
            tools = catalog.len(),
            scripted = next.is_some(),
            "scripted inference"
        );
        Ok(next.unwrap_or_else(|| RawDecision::text(SCRIPT_EXHAUSTED)))
    }
}

/// Answers review requests from a fixed list, then with a fallback.
#[derive(Clone)]
pub struct ScriptedApprovals {
    decisions: Arc<Mutex<VecDeque<ReviewDecision>>>,
    fallback: ReviewDecision,
    seen: Arc<Mutex<Vec<ReviewRequest>>>,
}

impl ScriptedApprovals {
    pub fn new<I>(decisions: I) -> Self
    where
        I: IntoIterator<Item = ReviewDecision>,
    {
        Self {
            decisions: Arc::new(Mutex::new(decisions.into_iter().collect())),
            fallback: ReviewDecision::Reject,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every request with `decision`.
    pub fn always(decision: ReviewDecision) -> Self {
        Self {
            fallback: decision,
            ..Self::new(Vec::<ReviewDecision>::new())
        }
    }

    /// Every request decided so far, in order.
    pub fn requests(&self) -> Vec<ReviewRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ApprovalHandler for ScriptedApprovals {
    async fn decide(&self, request: &ReviewRequest) -> ReviewDecision {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        self.decisions
            .lock()
            .ok()
            .and_then(|mut d| d.pop_front())
            .unwrap_or(self.fallback)
    }
}
