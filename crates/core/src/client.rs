//! Main client for the Grasshopper host.

use crate::api::*;
use crate::component_types::ComponentTypes;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::transport::{decode_response, TcpTransport, Transport};
use crate::types::{CommandRequest, CommandResponse, Params};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for sending commands to the Grasshopper host.
///
/// Holds no connection; every command opens its own.
#[derive(Clone)]
pub struct GrasshopperClient {
    config: Arc<BridgeConfig>,
    transport: Arc<dyn Transport>,
    component_types: Arc<ComponentTypes>,
}

impl GrasshopperClient {
    /// Create a new client builder.
    pub fn builder() -> GrasshopperClientBuilder {
        GrasshopperClientBuilder::new()
    }

    /// Client over TCP using `config`.
    pub fn from_config(config: BridgeConfig) -> BridgeResult<Self> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn component_types(&self) -> &ComponentTypes {
        &self.component_types
    }

    pub fn endpoint(&self) -> String {
        self.transport.endpoint()
    }

    /// Send one request and decode whatever JSON the host answers with.
    pub async fn send(&self, request: &CommandRequest) -> BridgeResult<Value> {
        let payload = request.to_wire()?;
        debug!(
            command = %request.command,
            endpoint = %self.transport.endpoint(),
            "Sending command"
        );

        let frame = self.transport.exchange(&payload).await?;
        let response = decode_response(&frame)?;
        debug!(command = %request.command, bytes = frame.len(), "Response received");

        Ok(response)
    }

    /// Send a command and return the response value, never failing.
    ///
    /// Any error along the way is folded into
    /// `{"success": false, "error": "<message>"}`.
    pub async fn send_command(&self, command: &str, params: Params) -> Value {
        let request = CommandRequest::new(command, params);
        match self.send(&request).await {
            Ok(value) => value,
            Err(e) => {
                warn!(command = %command, error = %e, "Command failed");
                CommandResponse::failure(format!("Error communicating with Grasshopper: {}", e))
                    .to_value()
            }
        }
    }

    /// Send a command and unwrap the `{success, data, error}` envelope.
    pub async fn execute(&self, command: &str, params: Params) -> BridgeResult<Value> {
        let request = CommandRequest::new(command, params);
        let value = self.send(&request).await?;
        let result = CommandResponse::from_value(value).into_result();
        if let Err(BridgeError::Remote { message }) = &result {
            warn!(command = %command, error = %message, "Host rejected command");
        }
        result
    }

    /// Sleep for the configured inter-command pause.
    pub async fn pause(&self) {
        let delay = self.config.command_delay();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
    }

    /// Check whether the host accepts connections, without sending a command.
    pub async fn probe(&self, timeout: Duration) -> bool {
        let connect = tokio::net::TcpStream::connect((self.config.host.as_str(), self.config.port));
        matches!(tokio::time::timeout(timeout, connect).await, Ok(Ok(_)))
    }

    /// Document lifecycle commands.
    pub fn document(&self) -> DocumentApi<'_> {
        DocumentApi::new(self)
    }

    /// Component lifecycle and discovery commands.
    pub fn components(&self) -> ComponentsApi<'_> {
        ComponentsApi::new(self)
    }

    /// Value mutation commands.
    pub fn values(&self) -> ValuesApi<'_> {
        ValuesApi::new(self)
    }

    /// Wiring commands.
    pub fn topology(&self) -> TopologyApi<'_> {
        TopologyApi::new(self)
    }

    /// Pattern instantiation commands.
    pub fn patterns(&self) -> PatternsApi<'_> {
        PatternsApi::new(self)
    }
}

/// Builder for creating a GrasshopperClient.
pub struct GrasshopperClientBuilder {
    config: BridgeConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl GrasshopperClientBuilder {
    pub fn new() -> Self {
        Self {
            config: BridgeConfig::default(),
            transport: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Send/receive timeout; `None` waits indefinitely.
    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.io_timeout_ms = timeout.map(|t| t.as_millis() as u64).unwrap_or(0);
        self
    }

    pub fn command_delay(mut self, delay: Duration) -> Self {
        self.config.command_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Add an alias on top of the built-in component table.
    pub fn alias(mut self, alias: impl Into<String>, component_type: impl Into<String>) -> Self {
        self.config.aliases.insert(alias.into(), component_type.into());
        self
    }

    /// Use a custom transport instead of TCP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> BridgeResult<GrasshopperClient> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(TcpTransport::new(&self.config)),
        };
        let component_types = ComponentTypes::builtin().with_aliases(
            self.config
                .aliases
                .iter()
                .map(|(alias, target)| (alias.clone(), target.clone())),
        );

        Ok(GrasshopperClient {
            config: Arc::new(self.config),
            transport,
            component_types: Arc::new(component_types),
        })
    }
}

impl Default for GrasshopperClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    fn client(transport: Arc<ScriptedTransport>) -> GrasshopperClient {
        GrasshopperClient::builder()
            .command_delay(Duration::ZERO)
            .transport(transport)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_send_command_returns_response() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(json!({"success": true, "data": {"name": "Doc"}})).await;

        let response = client(transport.clone())
            .send_command("get_document_info", Params::new())
            .await;

        assert_eq!(response, json!({"success": true, "data": {"name": "Doc"}}));
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.command, "get_document_info");
        assert!(request.parameters.is_empty());
    }

    #[tokio::test]
    async fn test_send_command_folds_transport_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .fail(|| BridgeError::Connect {
                addr: "localhost:8080".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            })
            .await;

        let response = client(transport).send_command("clear_document", Params::new()).await;

        assert_eq!(response["success"], json!(false));
        let message = response["error"].as_str().unwrap();
        assert!(message.starts_with("Error communicating with Grasshopper"));
        assert!(message.contains("localhost:8080"));
    }

    #[tokio::test]
    async fn test_send_command_folds_decode_errors() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_raw(b"not json\n").await;
        transport.reply_raw(b"\xC3\x28\n").await;
        transport.reply_raw(b"").await;

        let client = client(transport);
        for _ in 0..3 {
            let response = client.send_command("get_document_info", Params::new()).await;
            assert_eq!(response["success"], json!(false));
            assert!(!response["error"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_send_tolerates_bom() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_raw(b"\xEF\xBB\xBF{\"success\":true}\r\n").await;

        let value = client(transport)
            .send(&CommandRequest::bare("get_document_info"))
            .await
            .unwrap();
        assert_eq!(value, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_execute_distinguishes_failures() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .reply(json!({"success": false, "error": "Component not found"}))
            .await;
        transport.reply_raw(b"{oops\n").await;
        transport.fail(|| BridgeError::EmptyResponse).await;

        let client = client(transport);

        let remote = client.execute("delete_component", Params::new()).await.unwrap_err();
        assert_eq!(remote.kind(), crate::ErrorKind::Remote);

        let decode = client.execute("delete_component", Params::new()).await.unwrap_err();
        assert_eq!(decode.kind(), crate::ErrorKind::Decode);

        let transport_err = client.execute("delete_component", Params::new()).await.unwrap_err();
        assert_eq!(transport_err.kind(), crate::ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_builder_applies_aliases() {
        let client = GrasshopperClient::builder()
            .alias("xy_plane", "Component_XYPlane")
            .transport(Arc::new(ScriptedTransport::new()))
            .build()
            .unwrap();

        assert_eq!(client.component_types().resolve("xy_plane"), "Component_XYPlane");
        assert_eq!(client.component_types().resolve("slider"), "GH_NumberSlider");
    }

    #[test]
    fn test_builder_rejects_empty_host() {
        let result = GrasshopperClient::builder().host("").build();
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }
}
