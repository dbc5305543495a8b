//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        let expanded = Self::expand_env_vars(&content)?;
        let config: Config = toml::from_str(&expanded)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.runner.command.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "runner.command".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if config.runner.max_concurrent == 0 {
            return Err(ConfigError::InvalidValue {
                field: "runner.max_concurrent".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if config.compute.inference_log_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "compute.inference_log_limit".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
