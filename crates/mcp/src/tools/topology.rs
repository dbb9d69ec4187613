// Wiring tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    command_result, json_schema_integer, json_schema_object, json_schema_string, Tool, ToolTier,
};
use anyhow::{Context, Result};
use ghbridge_core::api::{ConnectRequest, ParamRef};
use ghbridge_core::{ComponentId, GrasshopperClient};
use serde::Deserialize;
use serde_json::Value;

/// Tool to wire an output of one component into an input of another
pub struct ConnectComponentsTool {
    client: GrasshopperClient,
}

impl ConnectComponentsTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ConnectArgs {
    source_id: ComponentId,
    target_id: ComponentId,
    #[serde(default)]
    source_param: Option<String>,
    #[serde(default)]
    target_param: Option<String>,
    #[serde(default)]
    source_param_index: Option<u32>,
    #[serde(default)]
    target_param_index: Option<u32>,
}

impl From<ConnectArgs> for ConnectRequest {
    fn from(args: ConnectArgs) -> Self {
        ConnectRequest {
            source_id: args.source_id,
            target_id: args.target_id,
            source_param: ParamRef::pick(args.source_param, args.source_param_index),
            target_param: ParamRef::pick(args.target_param, args.target_param_index),
        }
    }
}

#[async_trait::async_trait]
impl Tool for ConnectComponentsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "connect_components".to_string(),
            description: "Connect two components. Parameters can be addressed by name or by index; \
                          the name wins when both are given"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "source_id": json_schema_string("ID of the source component"),
                    "target_id": json_schema_string("ID of the target component"),
                    "source_param": json_schema_string("Name of the source output parameter"),
                    "target_param": json_schema_string("Name of the target input parameter"),
                    "source_param_index": json_schema_integer("Index of the source output parameter"),
                    "target_param_index": json_schema_integer("Index of the target input parameter")
                }),
                vec!["source_id", "target_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ConnectArgs =
            serde_json::from_value(arguments).context("Invalid arguments for connect_components")?;
        let request = ConnectRequest::from(args);
        command_result(self.client.topology().connect(&request).await)
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to list every wire in the document
pub struct GetAllConnectionsTool {
    client: GrasshopperClient,
}

impl GetAllConnectionsTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetAllConnectionsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_all_connections".to_string(),
            description: "Get a list of all connections between components in the document"
                .to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
            annotations: None,
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        command_result(self.client.topology().all_connections().await)
    }
}
