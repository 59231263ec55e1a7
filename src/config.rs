//! Node configuration, loaded from TOML.
//!
//! ```toml
//! name = "node-a"
//! bind = "127.0.0.1:7400"
//! unresolved_policy = "dead_letter"
//! continuation_ttl_ms = 30000
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use crate::codec::MAX_UDP_DATAGRAM;
use crate::routing::UnresolvedPolicy;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Used in actor ids and worker thread names.
    pub name: String,
    /// UDP socket to watch. Without one, the node needs an explicit transmitter.
    pub bind: Option<SocketAddr>,
    pub max_datagram_bytes: usize,
    pub unresolved_policy: UnresolvedPolicy,
    /// Drop continuations still pending after this long. Unset means never.
    pub continuation_ttl_ms: Option<u64>,
    pub sweep_interval_ms: u64,
    pub shutdown_timeout_ms: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "node".to_string(),
            bind: None,
            max_datagram_bytes: MAX_UDP_DATAGRAM,
            unresolved_policy: UnresolvedPolicy::Drop,
            continuation_ttl_ms: None,
            sweep_interval_ms: 1_000,
            shutdown_timeout_ms: 5_000,
        }
    }
}

impl NodeConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: NodeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".into()));
        }
        if self.max_datagram_bytes == 0 || self.max_datagram_bytes > MAX_UDP_DATAGRAM {
            return Err(ConfigError::Invalid(format!(
                "max_datagram_bytes must be in 1..={MAX_UDP_DATAGRAM}, got {}",
                self.max_datagram_bytes
            )));
        }
        if self.continuation_ttl_ms == Some(0) {
            return Err(ConfigError::Invalid("continuation_ttl_ms must be positive".into()));
        }
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid("sweep_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn continuation_ttl(&self) -> Option<Duration> {
        self.continuation_ttl_ms.map(Duration::from_millis)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(NodeConfig::from_toml_str("").unwrap(), NodeConfig::default());
    }

    #[test]
    fn test_full_file() {
        let config = NodeConfig::from_toml_str(
            r#"
            name = "node-a"
            bind = "127.0.0.1:7400"
            max_datagram_bytes = 1200
            unresolved_policy = "dead_letter"
            continuation_ttl_ms = 30000
            "#,
        )
        .unwrap();
        assert_eq!(config.name, "node-a");
        assert_eq!(config.bind, Some("127.0.0.1:7400".parse().unwrap()));
        assert_eq!(config.max_datagram_bytes, 1200);
        assert_eq!(config.unresolved_policy, UnresolvedPolicy::DeadLetter);
        assert_eq!(config.continuation_ttl(), Some(Duration::from_secs(30)));
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            NodeConfig::from_toml_str("max_datagram_bytes = 70000"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            NodeConfig::from_toml_str("name = \"\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            NodeConfig::from_toml_str("unresolved_policy = \"bounce\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            NodeConfig::from_toml_str("colour = \"blue\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
