//! Configuration management for Amber
//!
//! Supports configuration via:
//! - Environment variables (primary)
//! - Optional TOML config file (secondary)
//!
//! Environment variables take precedence over config file values.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::errors::{AmberError, Result};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (default: all interfaces)
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Listen port (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Socket address the listener binds to
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - PORT: listen port (default: 8000)
    /// - AMBER_LOG_LEVEL: log level (default: info)
    /// - AMBER_CONFIG_FILE: optional path to TOML config file
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("AMBER_CONFIG_FILE") {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(port) = lookup("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .map_err(|e| AmberError::Config(format!("invalid PORT {:?}: {}", port, e)))?;
        }

        if let Some(level) = lookup("AMBER_LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AmberError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.bind_address().to_string(), "0.0.0.0:8000");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_port_override() {
        let config = Config::from_lookup(lookup(&[("PORT", "9100")])).unwrap();
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        for bad in ["abc", "", "70000", "-1"] {
            let err = Config::from_lookup(lookup(&[("PORT", bad)])).unwrap_err();
            assert!(matches!(err, AmberError::Config(_)), "{bad:?} accepted");
        }
    }

    #[test]
    fn test_toml_sections() {
        let config = Config::from_toml(
            r#"
            log_level = "debug"

            [server]
            host = "127.0.0.1"
            port = 8081
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind_address().to_string(), "127.0.0.1:8081");
        assert_eq!(config.log_level, "debug");

        let partial = Config::from_toml("log_level = \"warn\"").unwrap();
        assert_eq!(partial.server, ServerConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_lookup(lookup(&[(
            "AMBER_CONFIG_FILE",
            "/nonexistent/amber.toml",
        )]))
        .unwrap_err();
        assert!(matches!(err, AmberError::Io(_)));
    }
}
