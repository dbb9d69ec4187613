use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BridgeError, BridgeResult};

/// Identifier of a component on the Grasshopper canvas
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, the way ids are abbreviated in reports
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single command sent to the host: `{"type": ..., "parameters": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(rename = "type")]
    pub command: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>, parameters: Params) -> Self {
        Self {
            command: command.into(),
            parameters: parameters.into_map(),
        }
    }

    /// Command with an empty parameter mapping
    pub fn bare(command: impl Into<String>) -> Self {
        Self::new(command, Params::new())
    }

    /// Wire encoding: compact JSON followed by a single newline byte
    pub fn to_wire(&self) -> BridgeResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec(self).map_err(BridgeError::Encode)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Conventional response envelope returned by the host.
///
/// The host is free to return any JSON value; this is only the shape every
/// known command uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    /// Interpret a raw response value.
    ///
    /// Values that are not objects, or objects without a boolean `success`
    /// field, are treated as a failed envelope.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let success = map.get("success").and_then(Value::as_bool).unwrap_or(false);
                let data = map.remove("data");
                let error = match map.remove("error") {
                    Some(Value::String(message)) => Some(message),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                };
                Self { success, data, error }
            }
            other => Self {
                success: false,
                data: None,
                error: Some(format!("Unexpected response shape: {}", other)),
            },
        }
    }

    /// Synthesized failure object, the shape every caller already handles
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Convert into the payload on success, or a remote error
    pub fn into_result(self) -> BridgeResult<Value> {
        if self.success {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(BridgeError::Remote {
                message: self
                    .error
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Host reported failure without a message".to_string()),
            })
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("success".to_string(), Value::Bool(self.success));
        if let Some(data) = &self.data {
            map.insert("data".to_string(), data.clone());
        }
        if let Some(error) = &self.error {
            map.insert("error".to_string(), Value::String(error.clone()));
        }
        Value::Object(map)
    }
}

/// Parameter mapping builder.
///
/// Optional values are only written when present, so the host never sees
/// explicit nulls for fields the caller left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn with_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
