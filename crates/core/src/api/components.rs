//! Component lifecycle and discovery commands.

use crate::client::GrasshopperClient;
use crate::component_types::ComponentTypes;
use crate::error::{BridgeError, BridgeResult};
use crate::types::{ComponentId, Params};
use serde_json::{Map, Value};

pub struct ComponentsApi<'a> {
    client: &'a GrasshopperClient,
}

/// Options for `add_component_advanced`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddComponent {
    /// Alias or host type identifier.
    pub component_type: String,
    pub x: f64,
    pub y: f64,
    /// Type-specific setup, e.g. `{"min": 0, "max": 100, "value": 50}` for a slider.
    pub initial_params: Option<Map<String, Value>>,
    pub name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl AddComponent {
    pub fn new(component_type: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            component_type: component_type.into(),
            x,
            y,
            ..Default::default()
        }
    }

    pub fn initial_params(mut self, params: Map<String, Value>) -> Self {
        self.initial_params = Some(params);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Parameter mapping with the type resolved through `types`.
    ///
    /// Empty initial params, empty names and zero sizes are left out.
    pub fn to_params(&self, types: &ComponentTypes) -> Params {
        Params::new()
            .with("type", types.resolve(&self.component_type))
            .with("x", self.x)
            .with("y", self.y)
            .with_opt(
                "initialParams",
                self.initial_params.clone().filter(|p| !p.is_empty()),
            )
            .with_opt("name", self.name.clone().filter(|n| !n.is_empty()))
            .with_opt("width", self.width.filter(|w| *w > 0))
            .with_opt("height", self.height.filter(|h| *h > 0))
    }
}

impl<'a> ComponentsApi<'a> {
    pub(crate) fn new(client: &'a GrasshopperClient) -> Self {
        Self { client }
    }

    /// Basic creation. The type string is sent as given; the host resolves
    /// its own short names for this command.
    pub async fn add(&self, component_type: &str, x: f64, y: f64) -> BridgeResult<Value> {
        self.client
            .execute(
                "add_component",
                Params::new()
                    .with("type", component_type)
                    .with("x", x)
                    .with("y", y),
            )
            .await
    }

    pub async fn add_advanced(&self, options: &AddComponent) -> BridgeResult<Value> {
        let params = options.to_params(self.client.component_types());
        self.client.execute("add_component_advanced", params).await
    }

    pub async fn delete(&self, id: &ComponentId) -> BridgeResult<Value> {
        self.client
            .execute("delete_component", Params::new().with("componentId", id.as_str()))
            .await
    }

    /// Position, size, parameters, inputs, outputs and connections of one component.
    pub async fn details(&self, id: &ComponentId) -> BridgeResult<Value> {
        self.client
            .execute(
                "get_component_details",
                Params::new().with("componentId", id.as_str()),
            )
            .await
    }

    /// Raw result of `find_components_by_type`, type resolved through the alias table.
    pub async fn find_by_type_raw(&self, component_type: &str) -> BridgeResult<Value> {
        let resolved = self.client.component_types().resolve(component_type);
        self.client
            .execute(
                "find_components_by_type",
                Params::new().with("componentType", resolved),
            )
            .await
    }

    /// Ids of every component of the given type.
    pub async fn find_by_type(&self, component_type: &str) -> BridgeResult<Vec<ComponentId>> {
        component_ids(self.find_by_type_raw(component_type).await?)
    }

    pub async fn output_data(&self, id: &ComponentId, output_index: u32) -> BridgeResult<Value> {
        self.client
            .execute(
                "get_component_output_data",
                Params::new()
                    .with("componentId", id.as_str())
                    .with("outputIndex", output_index),
            )
            .await
    }

    /// Generic value setter of the basic command set (slider value or panel text).
    pub async fn set_value(&self, id: &ComponentId, value: &str) -> BridgeResult<Value> {
        self.client
            .execute(
                "set_component_value",
                Params::new().with("id", id.as_str()).with("value", value),
            )
            .await
    }
}

/// Extract the id of a freshly created component.
///
/// Basic creation answers `{"id": ...}`, advanced creation `{"componentId": ...}`.
pub fn created_id(data: &Value) -> Option<ComponentId> {
    ["componentId", "id"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
        .map(ComponentId::from)
}

/// Accepts a list of id strings or of objects carrying an `id`.
fn component_ids(data: Value) -> BridgeResult<Vec<ComponentId>> {
    let items = match data {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(BridgeError::UnexpectedPayload(format!(
                "expected a list of components, got {}",
                other
            )))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(id) => Ok(ComponentId(id)),
            Value::Object(ref map) => map
                .get("id")
                .and_then(Value::as_str)
                .map(ComponentId::from)
                .ok_or_else(|| BridgeError::UnexpectedPayload(format!("component without id: {}", item))),
            other => Err(BridgeError::UnexpectedPayload(format!(
                "unexpected component entry: {}",
                other
            ))),
        })
        .collect()
}
