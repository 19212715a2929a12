//! Configuration management for pushgateway-handler
//!
//! Handles loading configuration from YAML files and overlaying CLI and
//! environment values on top of it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::cli::Cli;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Resolved handler configuration
///
/// Immutable for the lifetime of one invocation. Built once from the
/// optional YAML file plus CLI/environment overrides, validated before any
/// event is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Pushgateway metrics API URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Job name used when metrics do not carry a prom_job tag
    #[serde(default)]
    pub default_job: String,

    /// Instance name used when metrics do not carry a prom_instance tag
    #[serde(default)]
    pub default_instance: String,

    /// Metric type used when metrics do not carry a prom_type tag
    #[serde(default = "default_metric_type")]
    pub default_type: String,

    /// Forced job name, overriding prom_job tags
    #[serde(default)]
    pub job: String,

    /// Forced instance name, overriding prom_instance tags
    #[serde(default)]
    pub instance: String,

    /// Content type of the POST body
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Echo the serialized payload to the log before sending
    #[serde(default)]
    pub debug: bool,
}

// Default value functions
fn default_url() -> String {
    "http://127.0.0.1:9091/metrics".to_string()
}

fn default_metric_type() -> String {
    "untyped".to_string()
}

fn default_content_type() -> String {
    "text/plain".to_string()
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            default_job: String::new(),
            default_instance: String::new(),
            default_type: default_metric_type(),
            job: String::new(),
            instance: String::new(),
            content_type: default_content_type(),
            debug: false,
        }
    }
}

impl HandlerConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    ///
    /// # Note
    /// - If the file doesn't exist, returns `ConfigError::ReadError`
    /// - Use `HandlerConfig::load_or_default()` if you want fallback to defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: HandlerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    ///
    /// Use this for optional configuration files (e.g., when running without explicit config)
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Resolve the full configuration for one invocation
    ///
    /// Loads the optional config file named by the CLI, overlays every CLI
    /// (or environment) value on top of it, and validates the result.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::load_or_default(&cli.config)?;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Overlay CLI/environment values onto this configuration
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.url = url.clone();
        }
        if let Some(job) = &cli.default_job {
            self.default_job = job.clone();
        }
        if let Some(instance) = &cli.default_instance {
            self.default_instance = instance.clone();
        }
        if let Some(metric_type) = &cli.default_type {
            self.default_type = metric_type.clone();
        }
        if let Some(job) = &cli.job {
            self.job = job.clone();
        }
        if let Some(instance) = &cli.instance {
            self.instance = instance.clone();
        }
        if let Some(content_type) = &cli.content_type {
            self.content_type = content_type.clone();
        }
        if cli.debug {
            self.debug = true;
        }
    }

    /// Validate the configuration
    ///
    /// The job name is deliberately not mandated: an empty resolved job is
    /// legal and produces an empty URL path segment.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "Pushgateway URL must not be empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| ConfigError::ValidationError(format!("Invalid Pushgateway URL: {}", e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::ValidationError(format!(
                "Pushgateway URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.content_type.is_empty() {
            return Err(ConfigError::ValidationError(
                "Content type must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = HandlerConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:9091/metrics");
        assert_eq!(config.default_type, "untyped");
        assert_eq!(config.content_type, "text/plain");
        assert!(config.default_job.is_empty());
        assert!(config.job.is_empty());
        assert!(!config.debug);
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
url: "http://gateway.internal:9091/metrics"
default_job: "events"
default_type: "gauge"
"#;
        let config: HandlerConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.url, "http://gateway.internal:9091/metrics");
        assert_eq!(config.default_job, "events");
        assert_eq!(config.default_type, "gauge");
        // Unspecified fields fall back to serde defaults
        assert_eq!(config.content_type, "text/plain");
        assert!(config.instance.is_empty());
    }

    #[test]
    fn test_validation_rejects_empty_url() {
        let mut config = HandlerConfig::default();
        config.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let mut config = HandlerConfig::default();
        config.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.url = "ftp://example.com/metrics".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_content_type() {
        let mut config = HandlerConfig::default();
        config.content_type = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "pushgateway-handler",
            "-u",
            "http://gateway:9091/metrics",
            "-J",
            "forced",
            "--content-type",
            "application/json",
            "-d",
        ]);
        let mut config = HandlerConfig::default();
        config.apply_cli(&cli);

        assert_eq!(config.url, "http://gateway:9091/metrics");
        assert_eq!(config.job, "forced");
        assert_eq!(config.content_type, "application/json");
        assert!(config.debug);
        // Untouched fields keep their defaults
        assert_eq!(config.default_type, "untyped");
    }

    #[test]
    fn test_empty_job_is_legal() {
        let config = HandlerConfig::default();
        assert!(config.validate().is_ok());
    }
}
