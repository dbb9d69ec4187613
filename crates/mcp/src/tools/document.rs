// Document lifecycle tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{command_result, json_schema_object, json_schema_string, Tool, ToolTier};
use anyhow::{Context, Result};
use ghbridge_core::GrasshopperClient;
use serde::Deserialize;
use serde_json::Value;

/// Tool to clear the whole document
pub struct ClearDocumentTool {
    client: GrasshopperClient,
}

impl ClearDocumentTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ClearDocumentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "clear_document".to_string(),
            description: "Clear the Grasshopper document".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
            annotations: None,
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        command_result(self.client.document().clear().await)
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

#[derive(Debug, Deserialize)]
struct PathArgs {
    path: String,
}

/// Tool to save the document to a path
pub struct SaveDocumentTool {
    client: GrasshopperClient,
}

impl SaveDocumentTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for SaveDocumentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "save_document".to_string(),
            description: "Save the Grasshopper document".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "path": json_schema_string("Save path")
                }),
                vec!["path"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: PathArgs =
            serde_json::from_value(arguments).context("Invalid arguments for save_document")?;
        command_result(self.client.document().save(&args.path).await)
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to load a document, replacing the current one
pub struct LoadDocumentTool {
    client: GrasshopperClient,
}

impl LoadDocumentTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for LoadDocumentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "load_document".to_string(),
            description: "Load a Grasshopper document".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "path": json_schema_string("Document path")
                }),
                vec!["path"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: PathArgs =
            serde_json::from_value(arguments).context("Invalid arguments for load_document")?;
        command_result(self.client.document().load(&args.path).await)
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

/// Tool to get document name and component list
pub struct GetDocumentInfoTool {
    client: GrasshopperClient,
}

impl GetDocumentInfoTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetDocumentInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_document_info".to_string(),
            description: "Get information about the Grasshopper document".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
            annotations: None,
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        command_result(self.client.document().info_raw().await)
    }
}
