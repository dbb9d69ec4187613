//! Document lifecycle commands.

use crate::client::GrasshopperClient;
use crate::document::DocumentInfo;
use crate::error::BridgeResult;
use crate::types::Params;
use serde_json::Value;

pub struct DocumentApi<'a> {
    client: &'a GrasshopperClient,
}

impl<'a> DocumentApi<'a> {
    pub(crate) fn new(client: &'a GrasshopperClient) -> Self {
        Self { client }
    }

    /// Remove every component from the canvas.
    pub async fn clear(&self) -> BridgeResult<Value> {
        self.client.execute("clear_document", Params::new()).await
    }

    pub async fn save(&self, path: &str) -> BridgeResult<Value> {
        self.client
            .execute("save_document", Params::new().with("path", path))
            .await
    }

    pub async fn load(&self, path: &str) -> BridgeResult<Value> {
        self.client
            .execute("load_document", Params::new().with("path", path))
            .await
    }

    /// Raw `get_document_info` payload.
    pub async fn info_raw(&self) -> BridgeResult<Value> {
        self.client.execute("get_document_info", Params::new()).await
    }

    /// Document name and component list.
    pub async fn info(&self) -> BridgeResult<DocumentInfo> {
        DocumentInfo::from_value(self.info_raw().await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::ScriptedTransport;
    use crate::GrasshopperClient;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_document_info_type_counts() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .reply(json!({
                "success": true,
                "data": {
                    "name": "Doc",
                    "componentCount": 2,
                    "components": [
                        {"type": "GH_NumberSlider", "id": "aaaaaaaa-1111-2222-3333-444444444444"},
                        {"type": "GH_Panel", "id": "bbbbbbbb-1111-2222-3333-444444444444"}
                    ]
                }
            }))
            .await;

        let client = GrasshopperClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();
        let info = client.document().info().await.unwrap();

        let mut expected = BTreeMap::new();
        expected.insert("GH_NumberSlider".to_string(), 1);
        expected.insert("GH_Panel".to_string(), 1);
        assert_eq!(info.type_counts(), expected);

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.command, "get_document_info");
        assert!(request.parameters.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_send_path() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(json!({"success": true})).await;
        transport.reply(json!({"success": true})).await;

        let client = GrasshopperClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();
        client.document().save("C:/work/a.gh").await.unwrap();
        client.document().load("C:/work/b.gh").await.unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests[0].command, "save_document");
        assert_eq!(requests[0].parameters["path"], json!("C:/work/a.gh"));
        assert_eq!(requests[1].command, "load_document");
        assert_eq!(requests[1].parameters["path"], json!("C:/work/b.gh"));
    }
}
