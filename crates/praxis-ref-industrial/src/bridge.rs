//! Tool bridges for the reference runtime.
//!
//! `InProcessBridge` serves a `ToolRegistry` as if it were hosted remotely.
//! `OfflineBridge` models a bridge whose connection was never established.

use async_trait::async_trait;
use tracing::debug;

use praxis_contracts::{
    action::Arguments,
    catalog::{ToolCatalogEntry, ToolSource},
    error::{PraxisError, PraxisResult},
};
use praxis_core::{traits::ToolBridge, ToolRegistry};

/// Serves the tools of a registry through the `ToolBridge` contract.
pub struct InProcessBridge {
    tools: ToolRegistry,
}

impl InProcessBridge {
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl ToolBridge for InProcessBridge {
    async fn list_tools(&self) -> PraxisResult<Vec<ToolCatalogEntry>> {
        Ok(self
            .tools
            .catalog_entries()
            .map(|entry| ToolCatalogEntry {
                source: ToolSource::External,
                ..entry
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: &Arguments) -> PraxisResult<String> {
        let tool = self.tools.get(name).ok_or_else(|| PraxisError::UnknownTool {
            tool_name: name.to_string(),
        })?;
        debug!(tool = %name, "bridge call");
        tool.execute(arguments).await
    }
}

/// A bridge that cannot reach its server.
pub struct OfflineBridge;

#[async_trait]
impl ToolBridge for OfflineBridge {
    async fn list_tools(&self) -> PraxisResult<Vec<ToolCatalogEntry>> {
        Err(PraxisError::ToolBridge {
            reason: "connection not established".to_string(),
        })
    }

    async fn call_tool(&self, _name: &str, _arguments: &Arguments) -> PraxisResult<String> {
        Err(PraxisError::ToolBridge {
            reason: "connection not established".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tools::archive_tools;

    #[tokio::test]
    async fn in_process_bridge_lists_external_entries() {
        let bridge = InProcessBridge::new(archive_tools());
        let entries = bridge.list_tools().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.source == ToolSource::External));
    }

    #[tokio::test]
    async fn in_process_bridge_dispatches_by_name() {
        let bridge = InProcessBridge::new(archive_tools());
        let arguments = json!({ "path": "manuals/cooling.md" }).as_object().cloned().unwrap();

        let out = bridge.call_tool("READ_FILE", &arguments).await.unwrap();
        assert!(out.contains("400 C"));

        let missing = bridge.call_tool("launch", &Arguments::new()).await;
        assert!(matches!(missing, Err(PraxisError::UnknownTool { .. })));
    }

    #[tokio::test]
    async fn offline_bridge_always_fails() {
        assert!(matches!(
            OfflineBridge.list_tools().await,
            Err(PraxisError::ToolBridge { .. })
        ));
    }
}
