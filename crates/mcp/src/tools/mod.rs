pub mod components;
pub mod document;
pub mod patterns;
pub mod topology;
pub mod values;
mod registry;

pub use components::{
    AddComponentAdvancedTool, AddComponentTool, DeleteComponentTool, FindComponentsByTypeTool,
    GetComponentDetailsTool, GetComponentOutputDataTool,
};
pub use document::{ClearDocumentTool, GetDocumentInfoTool, LoadDocumentTool, SaveDocumentTool};
pub use patterns::{CreatePatternTool, GetAvailablePatternsTool};
pub use registry::{
    command_result, json_schema_boolean, json_schema_integer, json_schema_map, json_schema_number,
    json_schema_object, json_schema_string, Tool, ToolRegistry, ToolTier,
};
pub use topology::{ConnectComponentsTool, GetAllConnectionsTool};
pub use values::{BatchSetSlidersTool, SetPanelTextTool, SetSliderValueTool, SetToggleStateTool};

use ghbridge_core::GrasshopperClient;
use std::sync::Arc;

/// Register the full Grasshopper tool catalog, every tool sharing `client`.
pub fn register_all(registry: &mut ToolRegistry, client: &GrasshopperClient) {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(AddComponentTool::new(client.clone())),
        Arc::new(ClearDocumentTool::new(client.clone())),
        Arc::new(SaveDocumentTool::new(client.clone())),
        Arc::new(LoadDocumentTool::new(client.clone())),
        Arc::new(GetDocumentInfoTool::new(client.clone())),
        Arc::new(ConnectComponentsTool::new(client.clone())),
        Arc::new(CreatePatternTool::new(client.clone())),
        Arc::new(GetAvailablePatternsTool::new(client.clone())),
        Arc::new(AddComponentAdvancedTool::new(client.clone())),
        Arc::new(DeleteComponentTool::new(client.clone())),
        Arc::new(GetComponentDetailsTool::new(client.clone())),
        Arc::new(FindComponentsByTypeTool::new(client.clone())),
        Arc::new(GetAllConnectionsTool::new(client.clone())),
        Arc::new(GetComponentOutputDataTool::new(client.clone())),
        Arc::new(SetSliderValueTool::new(client.clone())),
        Arc::new(BatchSetSlidersTool::new(client.clone())),
        Arc::new(SetPanelTextTool::new(client.clone())),
        Arc::new(SetToggleStateTool::new(client.clone())),
    ];

    for tool in tools {
        registry.register(tool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghbridge_core::testing::ScriptedTransport;

    #[test]
    fn test_register_all_catalog() {
        let client = GrasshopperClient::builder()
            .transport(Arc::new(ScriptedTransport::new()))
            .build()
            .unwrap();
        let mut registry = ToolRegistry::new();
        register_all(&mut registry, &client);

        assert_eq!(registry.len(), 18);
        for name in [
            "add_component",
            "add_component_advanced",
            "batch_set_sliders",
            "clear_document",
            "connect_components",
            "create_pattern",
            "delete_component",
            "find_components_by_type",
            "get_all_connections",
            "get_available_patterns",
            "get_component_details",
            "get_component_output_data",
            "get_document_info",
            "load_document",
            "save_document",
            "set_panel_text",
            "set_slider_value",
            "set_toggle_state",
        ] {
            assert!(registry.contains(name), "missing tool {}", name);
        }

        let read_only: Vec<String> = registry
            .list_schemas()
            .into_iter()
            .filter(|s| s.annotations.as_ref().is_some_and(|a| a.read_only_hint))
            .map(|s| s.name)
            .collect();
        assert_eq!(
            read_only,
            vec![
                "find_components_by_type",
                "get_all_connections",
                "get_available_patterns",
                "get_component_details",
                "get_component_output_data",
                "get_document_info",
            ]
        );
    }
}
