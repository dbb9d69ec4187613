// MCP resources: read-only documents about the bridge and its host

use crate::protocol::{ReadResourceResult, ResourceContents, ResourceSchema};
use anyhow::Result;
use ghbridge_core::GrasshopperClient;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

const JSON_MIME: &str = "application/json";

/// How long the status resource waits for the host to accept a connection
pub const STATUS_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    fn schema(&self) -> ResourceSchema;

    /// Produce the current content of the resource
    async fn read(&self) -> Result<Value>;
}

/// Resources keyed by URI
pub struct ResourceRegistry {
    resources: BTreeMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        let schema = resource.schema();
        self.resources.insert(schema.uri, resource);
    }

    pub fn list_schemas(&self) -> Vec<ResourceSchema> {
        self.resources.values().map(|r| r.schema()).collect()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.resources.contains_key(uri)
    }

    /// Read a resource; `None` when the URI is unknown
    pub async fn read(&self, uri: &str) -> Option<Result<ReadResourceResult>> {
        let resource = self.resources.get(uri)?;
        Some(render(uri, resource.read().await))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn render(uri: &str, value: Result<Value>) -> Result<ReadResourceResult> {
    let text = serde_json::to_string_pretty(&value?)?;
    Ok(ReadResourceResult {
        contents: vec![ResourceContents {
            uri: uri.to_string(),
            mime_type: JSON_MIME.to_string(),
            text,
        }],
    })
}

/// Register the status, component type and guide resources
pub fn register_all(registry: &mut ResourceRegistry, client: &GrasshopperClient) {
    registry.register(Arc::new(StatusResource::new(client.clone())));
    registry.register(Arc::new(ComponentTypesResource::new(client.clone())));
    registry.register(Arc::new(ComponentGuideResource));
}

/// Connectivity of the Grasshopper host
pub struct StatusResource {
    client: GrasshopperClient,
}

impl StatusResource {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Resource for StatusResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            uri: "grasshopper://status".to_string(),
            name: "Grasshopper status".to_string(),
            description: "Whether the Grasshopper host accepts connections".to_string(),
            mime_type: JSON_MIME.to_string(),
        }
    }

    async fn read(&self) -> Result<Value> {
        let connected = self.client.probe(STATUS_PROBE_TIMEOUT).await;
        let config = self.client.config();
        Ok(json!({
            "status": if connected { "connected" } else { "disconnected" },
            "host": config.host,
            "port": config.port,
        }))
    }
}

/// Alias table with category grouping
pub struct ComponentTypesResource {
    client: GrasshopperClient,
}

impl ComponentTypesResource {
    pub fn new(client: GrasshopperClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Resource for ComponentTypesResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            uri: "grasshopper://component_types".to_string(),
            name: "Component types".to_string(),
            description: "Component aliases accepted by add_component_advanced and find_components_by_type"
                .to_string(),
            mime_type: JSON_MIME.to_string(),
        }
    }

    async fn read(&self) -> Result<Value> {
        let types = self.client.component_types();
        let categories: Map<String, Value> = types
            .categories()
            .into_iter()
            .map(|category| (category.name, json!(category.aliases)))
            .collect();

        Ok(json!({
            "title": "Supported Component Types",
            "description": "List of component types that can be used with add_component_advanced",
            "types": types.entries(),
            "categories": categories,
        }))
    }
}

/// Static usage guide for the tool catalog
pub struct ComponentGuideResource;

#[async_trait::async_trait]
impl Resource for ComponentGuideResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            uri: "grasshopper://component_guide".to_string(),
            name: "Component guide".to_string(),
            description: "How to create, configure and connect components".to_string(),
            mime_type: JSON_MIME.to_string(),
        }
    }

    async fn read(&self) -> Result<Value> {
        Ok(json!({
            "title": "Grasshopper Component Guide",
            "description": "Creating and connecting Grasshopper components",
            "components": [
                {
                    "name": "Number Slider",
                    "type": "slider",
                    "category": "UI",
                    "description": "Interactive number slider",
                    "initial_params": {
                        "min": "Minimum value",
                        "max": "Maximum value",
                        "value": "Initial value"
                    },
                    "example": {
                        "tool": "add_component_advanced",
                        "arguments": {
                            "component_type": "slider",
                            "x": 100,
                            "y": 100,
                            "initial_params": {"min": 0, "max": 100, "value": 50}
                        }
                    }
                },
                {
                    "name": "Panel",
                    "type": "panel",
                    "category": "UI",
                    "description": "Text display panel",
                    "initial_params": {"text": "Panel content"},
                    "example": {
                        "tool": "add_component_advanced",
                        "arguments": {
                            "component_type": "panel",
                            "x": 200,
                            "y": 200,
                            "initial_params": {"text": "Hello World"}
                        }
                    }
                },
                {
                    "name": "List Item",
                    "type": "list_item",
                    "category": "Lists",
                    "description": "Extract item from list by index",
                    "example": {
                        "tool": "add_component_advanced",
                        "arguments": {"component_type": "list_item", "x": 300, "y": 300}
                    }
                }
            ],
            "tips": [
                "Use add_component_advanced for more control over component creation",
                "Use get_component_details to inspect component state",
                "Use set_slider_value to control sliders programmatically",
                "Use find_components_by_type to locate specific component types",
                "Use batch_set_sliders to update multiple sliders efficiently"
            ]
        }))
    }
}
