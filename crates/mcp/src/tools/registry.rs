// MCP tool registry and schema helpers

use crate::protocol::{CallToolResult, ToolAnnotations, ToolSchema};
use anyhow::Result;
use ghbridge_core::BridgeResult;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: Value) -> Result<CallToolResult>;

    /// Side-effect class of the tool
    fn tier(&self) -> ToolTier {
        ToolTier::Tier0
    }
}

/// Tool side-effect tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolTier {
    /// Read-only queries
    Tier0,
    /// Canvas edits that can be undone by further edits
    Tier1,
    /// Removes or replaces document content
    Tier2,
}

impl ToolTier {
    pub fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations {
            read_only_hint: *self == ToolTier::Tier0,
            destructive_hint: *self == ToolTier::Tier2,
        }
    }
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name, with tier annotations
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .map(|tool| {
                let mut schema = tool.schema();
                schema.annotations = Some(tool.tier().annotations());
                schema
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a command outcome as tool output: the payload on success,
/// an in-band error otherwise.
pub fn command_result(result: BridgeResult<Value>) -> Result<CallToolResult> {
    match result {
        Ok(data) => Ok(CallToolResult::text(serde_json::to_string_pretty(&data)?)),
        Err(e) => Ok(CallToolResult::error(e.to_string())),
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> Value {
    serde_json::json!({
        "type": "integer",
        "minimum": 0,
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

/// Free-form object whose values match `values`
pub fn json_schema_map(values: Value, description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": values,
        "description": description
    })
}
