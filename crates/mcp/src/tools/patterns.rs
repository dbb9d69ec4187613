// Pattern tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{command_result, json_schema_object, json_schema_string, Tool, ToolTier};
use anyhow::{Context, Result};
use ghbridge_core::GrasshopperClient;
use serde::Deserialize;
use serde_json::Value;

/// Tool to build a group of components from a description
pub struct CreatePatternTool {
    client: GrasshopperClient,
}

impl CreatePatternTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreatePatternArgs {
    description: String,
}

#[async_trait::async_trait]
impl Tool for CreatePatternTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_pattern".to_string(),
            description: "Create a pattern of components from a description (e.g. '3D voronoi cube')"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "description": json_schema_string("High-level description of what to create")
                }),
                vec!["description"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CreatePatternArgs =
            serde_json::from_value(arguments).context("Invalid arguments for create_pattern")?;
        command_result(self.client.patterns().create(&args.description).await)
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to search the host's pattern catalog
pub struct GetAvailablePatternsTool {
    client: GrasshopperClient,
}

impl GetAvailablePatternsTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct PatternQueryArgs {
    query: String,
}

#[async_trait::async_trait]
impl Tool for GetAvailablePatternsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_available_patterns".to_string(),
            description: "Get a list of available patterns matching a query".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("Query to search for patterns")
                }),
                vec!["query"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: PatternQueryArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_available_patterns")?;
        command_result(self.client.patterns().available(&args.query).await)
    }
}
