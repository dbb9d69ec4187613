//! Configuration for talking to the Grasshopper host.

use crate::error::{BridgeError, BridgeResult};
use crate::grading::Rubric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

pub const HOST_ENV: &str = "GRASSHOPPER_HOST";
pub const PORT_ENV: &str = "GRASSHOPPER_PORT";

/// Connection and script settings.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Send/receive timeout in milliseconds, 0 disables it.
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,

    /// Upper bound on a single response.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    /// Pause inserted between consecutive commands by the scripts.
    #[serde(default = "default_command_delay_ms")]
    pub command_delay_ms: u64,

    /// Extra component aliases on top of the built-in table.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    #[serde(default)]
    pub grading: Rubric,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_io_timeout_ms() -> u64 {
    10_000
}

fn default_max_response_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_command_delay_ms() -> u64 {
    200
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_ms: default_connect_timeout_ms(),
            io_timeout_ms: default_io_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            command_delay_ms: default_command_delay_ms(),
            aliases: BTreeMap::new(),
            grading: Rubric::default(),
        }
    }
}

impl BridgeConfig {
    /// Load from a TOML file if it exists, otherwise use defaults, then apply
    /// `GRASSHOPPER_HOST` / `GRASSHOPPER_PORT` from the environment.
    pub fn load(config_path: &Path) -> BridgeResult<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).map_err(|e| {
                BridgeError::Config(format!(
                    "Failed to read configuration file {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml(&content)?
        } else {
            tracing::info!(
                path = %config_path.display(),
                "Configuration file not found, using defaults"
            );
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> BridgeResult<Self> {
        toml::from_str(content)
            .map_err(|e| BridgeError::Config(format!("Failed to parse configuration file: {}", e)))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> BridgeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| BridgeError::Config(format!("Invalid {}: {:?}", PORT_ENV, port)))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> BridgeResult<()> {
        if self.host.trim().is_empty() {
            return Err(BridgeError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(BridgeError::Config("port must be non-zero".to_string()));
        }
        if self.max_response_bytes == 0 {
            return Err(BridgeError::Config(
                "max_response_bytes must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port`, as used for connecting and in log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        (self.io_timeout_ms > 0).then(|| Duration::from_millis(self.io_timeout_ms))
    }

    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();

        assert_eq!(config.address(), "localhost:8080");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.io_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.command_delay(), Duration::from_millis(200));
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BridgeConfig::from_toml(
            r#"
            port = 9090
            io_timeout_ms = 0

            [aliases]
            xy_plane = "Component_XYPlane"
            "#,
        )
        .unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9090);
        assert_eq!(config.io_timeout(), None);
        assert_eq!(config.aliases.get("xy_plane").unwrap(), "Component_XYPlane");
        assert_eq!(config.grading, Rubric::default());
    }

    #[test]
    fn test_invalid_toml() {
        let result = BridgeConfig::from_toml("port = \"not a number\"");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BridgeConfig::default();
        config
            .apply_env(|key| match key {
                HOST_ENV => Some("10.0.0.5".to_string()),
                PORT_ENV => Some(" 9001 ".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.address(), "10.0.0.5:9001");
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = BridgeConfig::default();
        let result = config.apply_env(|key| (key == PORT_ENV).then(|| "eighty".to_string()));
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig::from_toml("").unwrap();
        assert_eq!(config, BridgeConfig::default());

        // load() also applies the process environment, so only check the file part
        let loaded = BridgeConfig::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(loaded.max_response_bytes, default_max_response_bytes());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "command_delay_ms = 500\nmax_response_bytes = 1024").unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.command_delay(), Duration::from_millis(500));
        assert_eq!(config.max_response_bytes, 1024);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = BridgeConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
