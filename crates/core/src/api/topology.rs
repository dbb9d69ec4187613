//! Wiring between components.

use crate::client::GrasshopperClient;
use crate::error::BridgeResult;
use crate::types::{ComponentId, Params};
use serde_json::Value;

pub struct TopologyApi<'a> {
    client: &'a GrasshopperClient,
}

/// Which parameter of a component to wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamRef {
    Name(String),
    Index(u32),
}

impl ParamRef {
    /// A name takes precedence over an index when both are given.
    pub fn pick(name: Option<String>, index: Option<u32>) -> Option<Self> {
        name.map(Self::Name).or(index.map(Self::Index))
    }
}

/// A `connect_components` request. Without a parameter reference the host
/// uses the first output / input.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectRequest {
    pub source_id: ComponentId,
    pub target_id: ComponentId,
    pub source_param: Option<ParamRef>,
    pub target_param: Option<ParamRef>,
}

impl ConnectRequest {
    pub fn new(source_id: impl Into<ComponentId>, target_id: impl Into<ComponentId>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            source_param: None,
            target_param: None,
        }
    }

    pub fn source_param(mut self, param: ParamRef) -> Self {
        self.source_param = Some(param);
        self
    }

    pub fn target_param(mut self, param: ParamRef) -> Self {
        self.target_param = Some(param);
        self
    }

    pub fn to_params(&self) -> Params {
        let params = Params::new()
            .with("sourceId", self.source_id.as_str())
            .with("targetId", self.target_id.as_str());
        let params = with_param_ref(params, "sourceParam", "sourceParamIndex", &self.source_param);
        with_param_ref(params, "targetParam", "targetParamIndex", &self.target_param)
    }
}

fn with_param_ref(params: Params, name_key: &str, index_key: &str, param: &Option<ParamRef>) -> Params {
    match param {
        Some(ParamRef::Name(name)) => params.with(name_key, name.as_str()),
        Some(ParamRef::Index(index)) => params.with(index_key, *index),
        None => params,
    }
}

impl<'a> TopologyApi<'a> {
    pub(crate) fn new(client: &'a GrasshopperClient) -> Self {
        Self { client }
    }

    pub async fn connect(&self, request: &ConnectRequest) -> BridgeResult<Value> {
        self.client
            .execute("connect_components", request.to_params())
            .await
    }

    /// Every wire in the document as `{sourceId, sourceParam, targetId, targetParam}`.
    pub async fn all_connections(&self) -> BridgeResult<Value> {
        self.client.execute("get_all_connections", Params::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_prefers_name() {
        assert_eq!(
            ParamRef::pick(Some("Radius".to_string()), Some(1)),
            Some(ParamRef::Name("Radius".to_string()))
        );
        assert_eq!(ParamRef::pick(None, Some(1)), Some(ParamRef::Index(1)));
        assert_eq!(ParamRef::pick(None, None), None);
    }

    #[test]
    fn test_connect_params() {
        let request = ConnectRequest::new("src", "dst")
            .source_param(ParamRef::Index(0))
            .target_param(ParamRef::Name("Radius".to_string()));

        assert_eq!(
            Value::Object(request.to_params().into_map()),
            json!({
                "sourceId": "src",
                "targetId": "dst",
                "sourceParamIndex": 0,
                "targetParam": "Radius"
            })
        );
    }

    #[test]
    fn test_connect_params_minimal() {
        let params = ConnectRequest::new("src", "dst").to_params();
        assert_eq!(
            Value::Object(params.into_map()),
            json!({"sourceId": "src", "targetId": "dst"})
        );
    }
}
