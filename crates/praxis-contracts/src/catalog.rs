//! Tool catalog types.
//!
//! The catalog is rebuilt at the start of every turn from the native tool
//! registry plus whatever the tool bridge reports. It is never persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a catalog entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSource {
    /// Registered in-process at agent construction.
    Native,
    /// Discovered through the external tool bridge.
    External,
}

/// One tool the model may call this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalogEntry {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's arguments. `Null` means unconstrained.
    pub parameters: Value,
    pub source: ToolSource,
}

impl ToolCatalogEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        source: ToolSource,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            source,
        }
    }
}

/// The ordered set of tools available for one turn.
///
/// Names are unique case-insensitively; the first registration of a name
/// wins, so native tools shadow external tools with the same name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalog {
    entries: Vec<ToolCatalogEntry>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry unless a tool with the same name (ignoring case) exists.
    ///
    /// Returns false when the entry was shadowed.
    pub fn insert(&mut self, entry: ToolCatalogEntry) -> bool {
        if self.resolve(&entry.name).is_some() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Look up a tool by name, ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Option<&ToolCatalogEntry> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Return true if a tool with this name (ignoring case) is present.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn entries(&self) -> &[ToolCatalogEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ToolCatalogEntry> for ToolCatalog {
    fn from_iter<I: IntoIterator<Item = ToolCatalogEntry>>(iter: I) -> Self {
        let mut catalog = ToolCatalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}
