// MCP server: JSON-RPC 2.0 over stdio, one message per line

use crate::protocol::*;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "ghbridge";

pub struct McpServer {
    tools: ToolRegistry,
    resources: ResourceRegistry,
}

impl McpServer {
    pub fn new(tools: ToolRegistry, resources: ResourceRegistry) -> Self {
        Self { tools, resources }
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        info!(
            tools = self.tools.len(),
            resources = self.resources.len(),
            "MCP server listening on stdio"
        );

        let mut input = FramedRead::new(tokio::io::stdin(), LinesCodec::new());
        let mut output = FramedWrite::new(tokio::io::stdout(), LinesCodec::new());

        while let Some(line) = input.next().await {
            let line = line.context("Failed to read from stdin")?;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(reply) = self.handle_message(&line).await {
                output
                    .send(reply)
                    .await
                    .context("Failed to write to stdout")?;
            }
        }

        info!("stdin closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw message; `None` for notifications
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => {
                warn!(error = %e, "Unparsable message");
                Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
            }
            Ok(value) => match serde_json::from_value::<JsonRpcRequest>(value) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!(error = %e, "Malformed request");
                    Some(JsonRpcResponse::error(Value::Null, JsonRpcError::invalid_request()))
                }
            },
        }?;

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "Failed to serialize response");
                None
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "Request received");

        let Some(id) = request.id.clone() else {
            if request.method != "notifications/initialized" {
                debug!(method = %request.method, "Ignoring notification");
            }
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            "resources/list" => self.list_resources(),
            "resources/read" => self.read_resource(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        if let Some(params) = params {
            if let Ok(init) = serde_json::from_value::<InitializeParams>(params) {
                info!(
                    client = %init.client_info.name,
                    version = %init.client_info.version,
                    protocol = %init.protocol_version,
                    "Client connected"
                );
            }
        }

        to_result(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ListChangedCapability { list_changed: false }),
                resources: Some(ListChangedCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    fn list_tools(&self) -> Result<Value, JsonRpcError> {
        to_result(ListToolsResult {
            tools: self.tools.list_schemas(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;
        let tool = self
            .tools
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)))?;

        let arguments = match params.arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let result = match tool.execute(arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %params.name, error = %e, "Tool failed");
                CallToolResult::error(format!("{:#}", e))
            }
        };
        to_result(result)
    }

    fn list_resources(&self) -> Result<Value, JsonRpcError> {
        to_result(ListResourcesResult {
            resources: self.resources.list_schemas(),
        })
    }

    async fn read_resource(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: ReadResourceParams = parse_params(params)?;
        match self.resources.read(&params.uri).await {
            None => Err(JsonRpcError::invalid_params(format!(
                "Unknown resource: {}",
                params.uri
            ))),
            Some(Ok(result)) => to_result(result),
            Some(Err(e)) => Err(JsonRpcError::internal_error(format!("{:#}", e))),
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn to_result<T: serde::Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resources, tools};
    use ghbridge_core::testing::ScriptedTransport;
    use ghbridge_core::GrasshopperClient;
    use serde_json::json;
    use std::sync::Arc;

    fn server(transport: Arc<ScriptedTransport>) -> McpServer {
        let client = GrasshopperClient::builder()
            .port(1)
            .transport(transport)
            .build()
            .unwrap();
        let mut tool_registry = ToolRegistry::new();
        tools::register_all(&mut tool_registry, &client);
        let mut resource_registry = ResourceRegistry::new();
        resources::register_all(&mut resource_registry, &client);
        McpServer::new(tool_registry, resource_registry)
    }

    async fn call(server: &McpServer, message: Value) -> Value {
        let reply = server.handle_message(&message.to_string()).await.unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server(Arc::new(ScriptedTransport::new()));
        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "test", "version": "1.0"}
                }
            }),
        )
        .await;

        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(reply["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(reply["result"]["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_notification_has_no_reply() {
        let server = server(Arc::new(ScriptedTransport::new()));
        let reply = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_parse_error_and_unknown_method() {
        let server = server(Arc::new(ScriptedTransport::new()));

        let reply: Value =
            serde_json::from_str(&server.handle_message("{not json").await.unwrap()).unwrap();
        assert_eq!(reply["id"], Value::Null);
        assert_eq!(reply["error"]["code"], -32700);

        let reply = call(&server, json!({"jsonrpc": "2.0", "id": 7, "method": "bogus"})).await;
        assert_eq!(reply["id"], 7);
        assert_eq!(reply["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = server(Arc::new(ScriptedTransport::new()));
        let reply = call(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;

        let tools = reply["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 18);
        assert_eq!(tools[0]["name"], "add_component");
        assert!(tools[0]["inputSchema"]["properties"]["component_type"].is_object());
        assert_eq!(tools[0]["annotations"]["readOnlyHint"], false);
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .reply(json!({"success": true, "data": {"name": "doc", "componentCount": 0, "components": []}}))
            .await;

        let server = server(transport.clone());
        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "get_document_info"}
            }),
        )
        .await;

        assert!(reply["result"].get("isError").is_none());
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"componentCount\": 0"));
        assert_eq!(
            transport.last_request().await.unwrap().command,
            "get_document_info"
        );
    }

    #[tokio::test]
    async fn test_tools_call_failures_are_in_band() {
        let server = server(Arc::new(ScriptedTransport::new()));

        // Bad arguments
        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": {"name": "set_slider_value", "arguments": {"component_id": "s"}}
            }),
        )
        .await;
        assert_eq!(reply["result"]["isError"], true);
        assert!(reply["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Invalid arguments for set_slider_value"));

        // Host unreachable: the scripted transport has nothing queued
        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": {"name": "clear_document", "arguments": {}}
            }),
        )
        .await;
        assert_eq!(reply["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let server = server(Arc::new(ScriptedTransport::new()));
        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 6,
                "method": "tools/call",
                "params": {"name": "launch_rockets"}
            }),
        )
        .await;
        assert_eq!(reply["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_resources() {
        let server = server(Arc::new(ScriptedTransport::new()));

        let reply = call(&server, json!({"jsonrpc": "2.0", "id": 8, "method": "resources/list"})).await;
        assert_eq!(reply["result"]["resources"].as_array().unwrap().len(), 3);

        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 9,
                "method": "resources/read",
                "params": {"uri": "grasshopper://component_types"}
            }),
        )
        .await;
        let text = reply["result"]["contents"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["types"]["panel"], "GH_Panel");

        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 10,
                "method": "resources/read",
                "params": {"uri": "grasshopper://missing"}
            }),
        )
        .await;
        assert_eq!(reply["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_ping() {
        let server = server(Arc::new(ScriptedTransport::new()));
        let reply = call(&server, json!({"jsonrpc": "2.0", "id": "p", "method": "ping"})).await;
        assert_eq!(reply["id"], "p");
        assert_eq!(reply["result"], json!({}));
    }
}
