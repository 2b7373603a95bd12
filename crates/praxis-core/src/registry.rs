//! Registry of native tools.

use std::sync::Arc;

use praxis_contracts::catalog::{ToolCatalogEntry, ToolSource};
use tracing::debug;

use crate::traits::NativeTool;

/// Ordered set of native tools, owned by one executor.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn NativeTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name (ignoring case) is replaced
    /// in its original position.
    pub fn register(&mut self, tool: Arc<dyn NativeTool>) {
        debug!(tool = %tool.name(), "registered native tool");
        match self
            .tools
            .iter_mut()
            .find(|t| t.name().eq_ignore_ascii_case(tool.name()))
        {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, tool: Arc<dyn NativeTool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn NativeTool>> {
        let name = name.trim();
        self.tools
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Catalog entries for every registered tool, in registration order.
    pub fn catalog_entries(&self) -> impl Iterator<Item = ToolCatalogEntry> + '_ {
        self.tools.iter().map(|tool| {
            ToolCatalogEntry::new(
                tool.name(),
                tool.description(),
                tool.parameters_schema(),
                ToolSource::Native,
            )
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
