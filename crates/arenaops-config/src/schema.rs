//! Configuration schema.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub runner: RunnerConfig,
    pub compute: ComputeConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Match-runner process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Executable launched for each match.
    pub command: String,

    /// Arguments passed before the match id.
    pub args: Vec<String>,

    /// Maximum simultaneously live runners.
    pub max_concurrent: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: "match-runner".to_string(),
            args: Vec::new(),
            max_concurrent: 16,
        }
    }
}

/// Compute-grid client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    /// Base URL of the grid gateway.
    pub base_url: String,

    /// Bearer token for the gateway, if required.
    pub api_token: Option<String>,

    /// Capacity of the in-process inference history.
    pub inference_log_limit: usize,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9200".to_string(),
            api_token: None,
            inference_log_limit: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.runner.command, "match-runner");
        assert_eq!(config.runner.max_concurrent, 16);
        assert!(config.compute.api_token.is_none());
        assert_eq!(config.compute.inference_log_limit, 64);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [runner]
            command = "/opt/arena/match-runner"
        "#,
        )
        .unwrap();
        assert_eq!(config.runner.command, "/opt/arena/match-runner");
        assert_eq!(config.runner.max_concurrent, 16);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.compute.base_url, config.compute.base_url);
    }
}
