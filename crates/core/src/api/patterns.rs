//! Higher-level pattern instantiation.

use crate::client::GrasshopperClient;
use crate::error::BridgeResult;
use crate::types::Params;
use serde_json::Value;

pub struct PatternsApi<'a> {
    client: &'a GrasshopperClient,
}

impl<'a> PatternsApi<'a> {
    pub(crate) fn new(client: &'a GrasshopperClient) -> Self {
        Self { client }
    }

    /// Create a group of components from a free-text description,
    /// e.g. "3D voronoi cube".
    pub async fn create(&self, description: &str) -> BridgeResult<Value> {
        self.client
            .execute("create_pattern", Params::new().with("description", description))
            .await
    }

    /// Patterns whose description matches `query`.
    pub async fn available(&self, query: &str) -> BridgeResult<Value> {
        self.client
            .execute("get_available_patterns", Params::new().with("query", query))
            .await
    }
}
