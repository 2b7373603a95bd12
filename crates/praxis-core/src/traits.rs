//! Collaborator traits consumed by the praxis execution core.
//!
//! These traits define the boundary between the governed core and the
//! outside world:
//!
//! - `ModelProvider`: untrusted decision source (usually an LLM)
//! - `NativeTool`: locally registered side-effecting capability
//! - `ToolBridge`: externally hosted tools behind a protocol bridge
//! - `EventStore`: trusted append-only record of every turn
//! - `ArgumentVerifier`: trusted check of final arguments before dispatch
//! - `ApprovalHandler`: out-of-band human decision on suspended actions
//!
//! The executor wires them together. Whatever a tool's source, its call goes
//! through the same governance stages before it can run.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use praxis_contracts::{
    action::{Arguments, ProposedAction, RawDecision},
    catalog::{ToolCatalog, ToolCatalogEntry},
    error::PraxisResult,
    event::Event,
    outcome::{ReviewDecision, ReviewRequest},
    verify::VerificationReport,
};

use crate::context::ChatMessage;

/// The model-provider collaborator.
///
/// Implementations are **untrusted**. They must not fail on malformed model
/// output: anything that cannot be translated into a native call should be
/// returned as `RawDecision::Text`. An `Err` means the provider itself was
/// unreachable; the executor turns it into a non-fatal turn failure.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn infer(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        catalog: &ToolCatalog,
    ) -> PraxisResult<RawDecision>;
}

/// A tool implemented in-process.
#[async_trait]
pub trait NativeTool: Send + Sync {
    /// Catalog name. Matching is case-insensitive.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the arguments. `Null` imposes no constraint.
    fn parameters_schema(&self) -> Value {
        Value::Null
    }

    /// Run the tool. Errors are recorded as a failed `ToolResult`, never
    /// swallowed.
    async fn execute(&self, arguments: &Arguments) -> PraxisResult<String>;
}

/// Bridge to externally hosted tools.
///
/// Either call may fail when the remote side is unavailable. A failed
/// `list_tools` degrades the catalog to native tools only.
#[async_trait]
pub trait ToolBridge: Send + Sync {
    async fn list_tools(&self) -> PraxisResult<Vec<ToolCatalogEntry>>;

    async fn call_tool(&self, name: &str, arguments: &Arguments) -> PraxisResult<String>;
}

/// Append-only event log for one agent.
///
/// Implementations serialize writes. An append that returns `Ok` must be
/// durable enough to survive the end of the turn; a failed append is fatal
/// for the turn.
pub trait EventStore: Send + Sync {
    fn append(&self, event: Event) -> PraxisResult<()>;

    /// Full history in append order.
    fn history(&self) -> PraxisResult<Vec<Event>>;

    /// The `limit` most recent events, oldest first.
    fn recent(&self, limit: usize) -> PraxisResult<Vec<Event>>;

    fn len(&self) -> PraxisResult<usize>;

    fn is_empty(&self) -> PraxisResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: EventStore + ?Sized> EventStore for Arc<T> {
    fn append(&self, event: Event) -> PraxisResult<()> {
        (**self).append(event)
    }

    fn history(&self) -> PraxisResult<Vec<Event>> {
        (**self).history()
    }

    fn recent(&self, limit: usize) -> PraxisResult<Vec<Event>> {
        (**self).recent(limit)
    }

    fn len(&self) -> PraxisResult<usize> {
        (**self).len()
    }
}

/// Checks the final (post-axiom) arguments of an action before dispatch.
///
/// Return `Err` only when verification could not be carried out at all; a
/// failed check is a report with `passed = false`.
pub trait ArgumentVerifier: Send + Sync {
    fn verify(
        &self,
        action: &ProposedAction,
        catalog: &ToolCatalog,
    ) -> PraxisResult<VerificationReport>;
}

/// Decides suspended actions on behalf of a human reviewer.
///
/// The core places no timeout on the decision; liveness belongs to the
/// implementation.
#[async_trait]
pub trait ApprovalHandler: Send + Sync {
    async fn decide(&self, request: &ReviewRequest) -> ReviewDecision;
}
