//! # praxis-core
//!
//! The governed execution runtime for praxis agents.
//!
//! This crate provides:
//! - The collaborator traits (`ModelProvider`, `NativeTool`, `ToolBridge`,
//!   `EventStore`, `ArgumentVerifier`, `ApprovalHandler`)
//! - The `ToolRegistry` of native tools
//! - The `Executor`, which runs one turn through every governance stage
//! - The `AutonomousDriver`, which runs turns toward a goal
//!
//! ## Usage
//!
//! ```rust,ignore
//! use praxis_core::{Executor, AutonomousDriver, traits::{ModelProvider, EventStore}};
//! ```

pub mod context;
pub mod driver;
pub mod executor;
pub mod registry;
pub mod traits;

pub use context::{ChatMessage, Role};
pub use driver::{AutonomousDriver, DriverSettings, StopHandle};
pub use executor::{AgentSettings, Executor};
pub use registry::ToolRegistry;
