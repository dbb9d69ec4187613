//! Value mutation commands.

use crate::client::GrasshopperClient;
use crate::error::BridgeResult;
use crate::types::{ComponentId, Params};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub struct ValuesApi<'a> {
    client: &'a GrasshopperClient,
}

impl<'a> ValuesApi<'a> {
    pub(crate) fn new(client: &'a GrasshopperClient) -> Self {
        Self { client }
    }

    pub async fn set_slider(&self, id: &ComponentId, value: f64) -> BridgeResult<Value> {
        self.client
            .execute(
                "set_slider_value",
                Params::new()
                    .with("componentId", id.as_str())
                    .with("value", value),
            )
            .await
    }

    /// Set several sliders in one command.
    pub async fn batch_set_sliders(
        &self,
        values: &BTreeMap<ComponentId, f64>,
    ) -> BridgeResult<Value> {
        let slider_values: Map<String, Value> = values
            .iter()
            .map(|(id, value)| (id.0.clone(), Value::from(*value)))
            .collect();

        self.client
            .execute(
                "batch_set_sliders",
                Params::new().with("sliderValues", slider_values),
            )
            .await
    }

    pub async fn set_panel_text(&self, id: &ComponentId, text: &str) -> BridgeResult<Value> {
        self.client
            .execute(
                "set_panel_text",
                Params::new()
                    .with("componentId", id.as_str())
                    .with("text", text),
            )
            .await
    }

    pub async fn set_toggle(&self, id: &ComponentId, state: bool) -> BridgeResult<Value> {
        self.client
            .execute(
                "set_toggle_state",
                Params::new()
                    .with("componentId", id.as_str())
                    .with("state", state),
            )
            .await
    }
}
