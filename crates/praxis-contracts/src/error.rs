//! Runtime error types for the praxis agent runtime.
//!
//! Fatal conditions are `PraxisError`. Anything a turn can recover from is a
//! `TurnFailure` inside `TurnOutcome::Error` instead.

use thiserror::Error;

/// The unified error type for the praxis runtime.
#[derive(Debug, Error)]
pub enum PraxisError {
    /// The event store could not persist an event.
    ///
    /// Treated as fatal: a turn whose history cannot be recorded cannot proceed.
    #[error("event store write failed: {reason}")]
    EventStoreWrite { reason: String },

    /// Stored history failed integrity checks or could not be decoded.
    #[error("event store corrupted: {reason}")]
    EventStoreCorrupted { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A JSON Schema document could not be compiled.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// The model provider failed to answer.
    #[error("model provider error: {reason}")]
    Provider { reason: String },

    /// A tool ran and reported an error.
    #[error("tool '{tool_name}' execution failed: {reason}")]
    ToolExecution { tool_name: String, reason: String },

    /// The external tool bridge is unreachable or returned a protocol error.
    #[error("tool bridge error: {reason}")]
    ToolBridge { reason: String },

    /// No native or external tool answers to this name.
    #[error("unknown tool '{tool_name}'")]
    UnknownTool { tool_name: String },
}

/// Convenience alias used throughout the praxis crates.
pub type PraxisResult<T> = Result<T, PraxisError>;
