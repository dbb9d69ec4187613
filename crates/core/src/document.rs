//! Typed views over document payloads and component type statistics.

use crate::error::{BridgeError, BridgeResult};
use crate::types::ComponentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Payload of `get_document_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "component_count")]
    pub component_count: usize,
    #[serde(default)]
    pub components: Vec<ComponentSummary>,
}

/// One entry of the document's component list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DocumentInfo {
    pub fn from_value(value: Value) -> BridgeResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| BridgeError::UnexpectedPayload(format!("document info: {}", e)))
    }

    /// Number of components per type identifier.
    pub fn type_counts(&self) -> BTreeMap<String, usize> {
        count_types(self.components.iter().map(|c| c.component_type.as_str()))
    }

    /// Ids of all components of the given type.
    pub fn ids_of_type(&self, component_type: &str) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.component_type == component_type)
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            document_name: self.name.clone(),
            total_components: self.component_count,
            component_types: self.type_counts(),
        }
    }
}

pub fn count_types<'a, I>(types: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for component_type in types {
        *counts.entry(component_type.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Aggregate view of a document: what grading and prompts work from.
///
/// Can be built from a live document or loaded from a JSON file so work can
/// be graded without the host running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub document_name: String,
    pub total_components: usize,
    pub component_types: BTreeMap<String, usize>,
}

impl DocumentSnapshot {
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            BridgeError::UnexpectedPayload(format!("snapshot {}: {}", path.display(), e))
        })
    }

    pub fn count(&self, component_type: &str) -> usize {
        self.component_types.get(component_type).copied().unwrap_or(0)
    }

    pub fn count_any(&self, component_types: &[String]) -> usize {
        component_types.iter().map(|t| self.count(t)).sum()
    }

    /// The `limit` most frequent types, most frequent first, ties by name.
    pub fn top_types(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .component_types
            .iter()
            .map(|(t, c)| (t.as_str(), *c))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(limit);
        entries
    }
}
