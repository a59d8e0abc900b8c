//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional YAML config file
pub const CONFIG_PATH_ENV: &str = "ORDERFILE_CONFIG";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "127.0.0.1" or "0.0.0.0")
    pub host: String,

    /// TCP port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from the file named by `ORDERFILE_CONFIG`, or fall back to the
    /// defaults when the variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// The address string to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_localhost() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn loads_from_yaml() {
        let config = ServerConfig::from_yaml_str("host: 0.0.0.0\nport: 8080\n").unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = ServerConfig::from_yaml_str("port: 9999\n").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9999);
    }
}
