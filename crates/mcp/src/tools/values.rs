// Value mutation tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    command_result, json_schema_boolean, json_schema_map, json_schema_number, json_schema_object,
    json_schema_string, Tool, ToolTier,
};
use anyhow::{Context, Result};
use ghbridge_core::{ComponentId, GrasshopperClient};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Tool to set a number slider
pub struct SetSliderValueTool {
    client: GrasshopperClient,
}

impl SetSliderValueTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct SliderArgs {
    component_id: ComponentId,
    value: f64,
}

#[async_trait::async_trait]
impl Tool for SetSliderValueTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "set_slider_value".to_string(),
            description: "Set the value of a number slider".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_id": json_schema_string("The ID of the slider component"),
                    "value": json_schema_number("The new value")
                }),
                vec!["component_id", "value"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: SliderArgs =
            serde_json::from_value(arguments).context("Invalid arguments for set_slider_value")?;
        command_result(
            self.client
                .values()
                .set_slider(&args.component_id, args.value)
                .await,
        )
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to set several sliders in one round trip
pub struct BatchSetSlidersTool {
    client: GrasshopperClient,
}

impl BatchSetSlidersTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct BatchSlidersArgs {
    slider_values: BTreeMap<ComponentId, f64>,
}

#[async_trait::async_trait]
impl Tool for BatchSetSlidersTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "batch_set_sliders".to_string(),
            description: "Set multiple slider values at once. Example: {\"slider_values\": {\"id1\": 10, \"id2\": 20}}"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "slider_values": json_schema_map(
                        serde_json::json!({"type": "number"}),
                        "Map of slider component ID to new value"
                    )
                }),
                vec!["slider_values"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: BatchSlidersArgs =
            serde_json::from_value(arguments).context("Invalid arguments for batch_set_sliders")?;
        command_result(self.client.values().batch_set_sliders(&args.slider_values).await)
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to set the text of a panel
pub struct SetPanelTextTool {
    client: GrasshopperClient,
}

impl SetPanelTextTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct PanelArgs {
    component_id: ComponentId,
    text: String,
}

#[async_trait::async_trait]
impl Tool for SetPanelTextTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "set_panel_text".to_string(),
            description: "Set the text content of a panel".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_id": json_schema_string("The ID of the panel component"),
                    "text": json_schema_string("The text to display")
                }),
                vec!["component_id", "text"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: PanelArgs =
            serde_json::from_value(arguments).context("Invalid arguments for set_panel_text")?;
        command_result(
            self.client
                .values()
                .set_panel_text(&args.component_id, &args.text)
                .await,
        )
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to flip a boolean toggle
pub struct SetToggleStateTool {
    client: GrasshopperClient,
}

impl SetToggleStateTool {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ToggleArgs {
    component_id: ComponentId,
    state: bool,
}

#[async_trait::async_trait]
impl Tool for SetToggleStateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "set_toggle_state".to_string(),
            description: "Set the state of a boolean toggle".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "component_id": json_schema_string("The ID of the toggle component"),
                    "state": json_schema_boolean("True or False")
                }),
                vec!["component_id", "state"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ToggleArgs =
            serde_json::from_value(arguments).context("Invalid arguments for set_toggle_state")?;
        command_result(
            self.client
                .values()
                .set_toggle(&args.component_id, args.state)
                .await,
        )
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}
