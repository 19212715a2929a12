//! CLI argument parsing for pushgateway-handler
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--url` / `-u`: Pushgateway metrics API URL (env: PUSHGATEWAY_URL)
//! - `--default-job` / `-j`: Job name used when no prom_job tag is present (env: DEFAULT_PROM_JOB)
//! - `--default-instance` / `-i`: Instance name used when no prom_instance tag is present (env: DEFAULT_PROM_INSTANCE)
//! - `--default-type` / `-t`: Metric type used when no prom_type tag is present (env: DEFAULT_PROM_TYPE)
//! - `--job` / `-J`: Forced job name, ignoring prom_job tags (env: PROM_JOB)
//! - `--instance` / `-I`: Forced instance name, ignoring prom_instance tags (env: PROM_INSTANCE)
//! - `--content-type`: Content type of the POST body (env: PUSHGATEWAY_CONTENT_TYPE)
//! - `--debug` / `-d`: Echo the serialized payload to the log before sending (env: DEBUG)
//! - `--config` / `-c`: Optional configuration file path (env: PUSHGATEWAY_CONFIG)
//! - `--dry-run`: Transform the event and print the payload without sending
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: PUSHGATEWAY_LOG_LEVEL)
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// pushgateway-handler - Send monitoring event metrics to the Prometheus Pushgateway
///
/// Reads one monitoring event as JSON on standard input, groups its metric
/// points into Prometheus metric families, and POSTs the resulting text
/// exposition payload to the configured Pushgateway.
///
/// Environment variables can be used for all configuration options.
/// CLI arguments take precedence over environment variables,
/// which take precedence over config file values.
#[derive(Parser, Debug)]
#[command(name = "pushgateway-handler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "handler.yaml",
        env = "PUSHGATEWAY_CONFIG"
    )]
    pub config: PathBuf,

    /// The Prometheus Pushgateway metrics API URL (overrides config file)
    #[arg(short, long, value_name = "URL", env = "PUSHGATEWAY_URL")]
    pub url: Option<String>,

    /// The Prometheus job name to use when metrics do not have a prom_job tag
    #[arg(short = 'j', long, value_name = "JOB", env = "DEFAULT_PROM_JOB")]
    pub default_job: Option<String>,

    /// The Prometheus instance name to use when metrics do not have a prom_instance tag
    #[arg(
        short = 'i',
        long,
        value_name = "INSTANCE",
        env = "DEFAULT_PROM_INSTANCE"
    )]
    pub default_instance: Option<String>,

    /// The Prometheus metric type to use when metrics do not have a prom_type tag
    #[arg(short = 't', long, value_name = "TYPE", env = "DEFAULT_PROM_TYPE")]
    pub default_type: Option<String>,

    /// The Prometheus job name to use, ignoring metric prom_job tags
    #[arg(short = 'J', long, value_name = "JOB", env = "PROM_JOB")]
    pub job: Option<String>,

    /// The Prometheus instance name to use, ignoring metric prom_instance tags
    #[arg(short = 'I', long, value_name = "INSTANCE", env = "PROM_INSTANCE")]
    pub instance: Option<String>,

    /// Content type of the POST body (overrides config file)
    #[arg(long, value_name = "TYPE", env = "PUSHGATEWAY_CONTENT_TYPE")]
    pub content_type: Option<String>,

    /// Turn on debug mode (i.e. echo the post body metrics to the log)
    #[arg(short, long, env = "DEBUG")]
    pub debug: bool,

    /// Transform the event and print the payload to stdout without sending
    #[arg(long)]
    pub dry_run: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "PUSHGATEWAY_LOG_LEVEL"
    )]
    pub log_level: LogLevel,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["pushgateway-handler"]);
        assert_eq!(cli.config, PathBuf::from("handler.yaml"));
        assert_eq!(cli.url, None);
        assert_eq!(cli.default_job, None);
        assert_eq!(cli.default_instance, None);
        assert_eq!(cli.default_type, None);
        assert_eq!(cli.job, None);
        assert_eq!(cli.instance, None);
        assert_eq!(cli.content_type, None);
        assert!(!cli.debug);
        assert!(!cli.dry_run);
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::parse_from([
            "pushgateway-handler",
            "-u",
            "http://gateway:9091/metrics",
            "-j",
            "events",
            "-t",
            "gauge",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.url, Some("http://gateway:9091/metrics".to_string()));
        assert_eq!(cli.default_job, Some("events".to_string()));
        assert_eq!(cli.default_type, Some("gauge".to_string()));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_forced_identity() {
        let cli = Cli::parse_from([
            "pushgateway-handler",
            "-J",
            "forced-job",
            "-I",
            "forced-instance",
        ]);
        assert_eq!(cli.job, Some("forced-job".to_string()));
        assert_eq!(cli.instance, Some("forced-instance".to_string()));
    }

    #[test]
    fn test_cli_dry_run_and_debug() {
        let cli = Cli::parse_from(["pushgateway-handler", "--dry-run", "-d"]);
        assert!(cli.dry_run);
        assert!(cli.debug);
    }
}
