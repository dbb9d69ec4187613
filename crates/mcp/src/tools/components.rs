// Component lifecycle and discovery tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    command_result, json_schema_integer, json_schema_number, json_schema_object,
    json_schema_string, Tool, ToolTier,
};
use anyhow::{Context, Result};
use ghbridge_core::api::AddComponent;
use ghbridge_core::{ComponentId, GrasshopperClient};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Tool to add a component (basic version)
pub struct AddComponentTool {
    client: GrasshopperClient,
}

impl AddComponentTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct AddComponentArgs {
    component_type: String,
    x: f64,
    y: f64,
}

#[async_trait::async_trait]
impl Tool for AddComponentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_component".to_string(),
            description: "Add a component to the Grasshopper canvas (basic version)".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_type": json_schema_string("Component type (point, curve, circle, line, panel, slider)"),
                    "x": json_schema_number("X coordinate on the canvas"),
                    "y": json_schema_number("Y coordinate on the canvas")
                }),
                vec!["component_type", "x", "y"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AddComponentArgs =
            serde_json::from_value(arguments).context("Invalid arguments for add_component")?;
        command_result(
            self.client
                .components()
                .add(&args.component_type, args.x, args.y)
                .await,
        )
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to add a component with initial parameters, name and size
pub struct AddComponentAdvancedTool {
    client: GrasshopperClient,
}

impl AddComponentAdvancedTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct AddComponentAdvancedArgs {
    component_type: String,
    x: f64,
    y: f64,
    #[serde(default)]
    initial_params: Option<Map<String, Value>>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for AddComponentAdvancedTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_component_advanced".to_string(),
            description: format!(
                "Add a component with advanced options. component_type accepts one of {} aliases \
                 (e.g. 'slider', 'panel', 'list_item') or a Grasshopper type name. \
                 Example initial_params for a slider: {{\"min\": 0, \"max\": 100, \"value\": 50}}; \
                 for a panel: {{\"text\": \"Hello World\"}}",
                self.client.component_types().len()
            ),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_type": json_schema_string("Component alias or type name"),
                    "x": json_schema_number("X coordinate on the canvas"),
                    "y": json_schema_number("Y coordinate on the canvas"),
                    "initial_params": {
                        "type": "object",
                        "description": "Initial parameters for the component"
                    },
                    "name": json_schema_string("Custom name for the component"),
                    "width": json_schema_integer("Component width in pixels"),
                    "height": json_schema_integer("Component height in pixels")
                }),
                vec!["component_type", "x", "y"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AddComponentAdvancedArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for add_component_advanced")?;

        let options = AddComponent {
            component_type: args.component_type,
            x: args.x,
            y: args.y,
            initial_params: args.initial_params,
            name: args.name,
            width: args.width,
            height: args.height,
        };
        command_result(self.client.components().add_advanced(&options).await)
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

#[derive(Debug, Deserialize)]
struct ComponentIdArgs {
    component_id: String,
}

/// Tool to delete a component
pub struct DeleteComponentTool {
    client: GrasshopperClient,
}

impl DeleteComponentTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteComponentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_component".to_string(),
            description: "Delete a component from the canvas".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_id": json_schema_string("The ID of the component to delete")
                }),
                vec!["component_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ComponentIdArgs =
            serde_json::from_value(arguments).context("Invalid arguments for delete_component")?;
        command_result(
            self.client
                .components()
                .delete(&ComponentId(args.component_id))
                .await,
        )
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

/// Tool to inspect one component
pub struct GetComponentDetailsTool {
    client: GrasshopperClient,
}

impl GetComponentDetailsTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetComponentDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_component_details".to_string(),
            description: "Get detailed information about a component: type, name, position, size, \
                          parameters (slider value, panel text), inputs, outputs and connections"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_id": json_schema_string("The unique ID of the component")
                }),
                vec!["component_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ComponentIdArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_component_details")?;
        command_result(
            self.client
                .components()
                .details(&ComponentId(args.component_id))
                .await,
        )
    }
}

/// Tool to find all components of a type
pub struct FindComponentsByTypeTool {
    client: GrasshopperClient,
}

impl FindComponentsByTypeTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct FindComponentsArgs {
    component_type: String,
}

#[async_trait::async_trait]
impl Tool for FindComponentsByTypeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "find_components_by_type".to_string(),
            description: "Find all components of a specific type; returns their IDs".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_type": json_schema_string("The type to search for (e.g. 'slider' or 'GH_NumberSlider')")
                }),
                vec!["component_type"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: FindComponentsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for find_components_by_type")?;
        command_result(
            self.client
                .components()
                .find_by_type_raw(&args.component_type)
                .await,
        )
    }
}

/// Tool to read the data on a component output
pub struct GetComponentOutputDataTool {
    client: GrasshopperClient,
}

impl GetComponentOutputDataTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct OutputDataArgs {
    component_id: String,
    #[serde(default)]
    output_index: u32,
}

#[async_trait::async_trait]
impl Tool for GetComponentOutputDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_component_output_data".to_string(),
            description: "Get the output data from a component".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_id": json_schema_string("The ID of the component"),
                    "output_index": json_schema_integer("Index of the output parameter (default: 0)")
                }),
                vec!["component_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: OutputDataArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_component_output_data")?;
        command_result(
            self.client
                .components()
                .output_data(&ComponentId(args.component_id), args.output_index)
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghbridge_core::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: Arc<ScriptedTransport>) -> GrasshopperClient {
        GrasshopperClient::builder().transport(transport).build().unwrap()
    }

    #[tokio::test]
    async fn test_add_component_advanced_maps_arguments() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .reply(json!({"success": true, "data": {"componentId": "new-id"}}))
            .await;

        let tool = AddComponentAdvancedTool::new(client(transport.clone()));
        let result = tool
            .execute(json!({
                "component_type": "panel",
                "x": 200,
                "y": 200,
                "initial_params": {"text": "Hello World"},
                "width": 150
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, None);
        assert!(result.content[0].as_text().contains("new-id"));

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.command, "add_component_advanced");
        assert_eq!(
            Value::Object(request.parameters),
            json!({
                "type": "GH_Panel",
                "x": 200.0,
                "y": 200.0,
                "initialParams": {"text": "Hello World"},
                "width": 150
            })
        );
    }

    #[tokio::test]
    async fn test_output_index_defaults_to_zero() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(json!({"success": true, "data": [1, 2]})).await;

        let tool = GetComponentOutputDataTool::new(client(transport.clone()));
        tool.execute(json!({"component_id": "abc"})).await.unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.parameters["outputIndex"], json!(0));
    }

    #[tokio::test]
    async fn test_missing_argument_is_an_error() {
        let tool = DeleteComponentTool::new(client(Arc::new(ScriptedTransport::new())));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("delete_component"));
    }

    #[tokio::test]
    async fn test_host_failure_is_reported_in_band() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .reply(json!({"success": false, "error": "Component not found"}))
            .await;

        let tool = GetComponentDetailsTool::new(client(transport));
        let result = tool.execute(json!({"component_id": "missing"})).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(result.content[0].as_text().contains("Component not found"));
    }
}
