//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_DOWNLOAD_TIMEOUT, MAXMIND_LICENSE_KEY_ENV, MAX_NETWORK_DOWNLOAD_RETRIES,
    REFRESH_RETRY_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Service configuration.
///
/// Parsed from the command line by `clap`, or constructed programmatically.
///
/// # Examples
///
/// ```bash
/// # Download the dataset with a license key from the environment
/// MAXMIND_LICENSE_KEY=... ip_country
///
/// # Serve a local archive on another port, refreshing it weekly
/// ip_country --dataset ./GeoLite2-Country-CSV.zip --listen 0.0.0.0:8080 --auto-refresh
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ip_country",
    about = "Resolves IPv4 addresses to countries over HTTP."
)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, default_value = crate::config::DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// GeoLite2 Country CSV archive: local .zip path or download URL
    /// Examples:
    ///   --dataset /path/to/GeoLite2-Country-CSV.zip
    ///   --dataset https://example.com/GeoLite2-Country-CSV.zip
    /// If not provided, the archive is downloaded from MaxMind using MAXMIND_LICENSE_KEY.
    #[arg(long)]
    pub dataset: Option<String>,

    /// MaxMind license key used when no dataset location is given
    #[arg(long, env = MAXMIND_LICENSE_KEY_ENV, hide_env_values = true)]
    pub license_key: Option<String>,

    /// Dataset download timeout in seconds
    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_TIMEOUT.as_secs())]
    pub download_timeout_seconds: u64,

    /// Dataset download attempts per refresh
    #[arg(long, default_value_t = MAX_NETWORK_DOWNLOAD_RETRIES)]
    pub download_retries: u32,

    /// Rebuild the index when the dataset's recommended update time passes
    #[arg(long)]
    pub auto_refresh: bool,

    /// Delay before retrying a failed scheduled refresh, in seconds
    #[arg(long, default_value_t = REFRESH_RETRY_SECS)]
    pub refresh_retry_seconds: u64,
}

impl Config {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_seconds)
    }

    pub fn refresh_retry(&self) -> Duration {
        Duration::from_secs(self.refresh_retry_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 12950)),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            dataset: None,
            license_key: None,
            download_timeout_seconds: DEFAULT_DOWNLOAD_TIMEOUT.as_secs(),
            download_retries: MAX_NETWORK_DOWNLOAD_RETRIES,
            auto_refresh: false,
            refresh_retry_seconds: REFRESH_RETRY_SECS,
        }
    }
}
