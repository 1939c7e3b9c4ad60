//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including network defaults, size limits, and dataset file names.

use std::time::Duration;

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:12950";

/// Maximum number of addresses accepted in one lookup request
pub const MAX_IPS_PER_REQUEST: usize = 100;

// Dataset download
/// Per-request download timeout
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
/// Number of download attempts before a refresh is reported as failed.
/// Backoff between attempts is exponential: 2s, 4s, 8s, ...
pub const MAX_NETWORK_DOWNLOAD_RETRIES: u32 = 3;
/// Maximum dataset archive size in bytes (256MB).
/// The country CSV archive is a few MB; anything near this is not a dataset.
pub const MAX_DATASET_DOWNLOAD_SIZE: u64 = 256 * 1024 * 1024;

/// How long a loaded dataset is considered current (7 days).
/// GeoLite2 databases are published twice a week.
pub const DATASET_UPDATE_INTERVAL_DAYS: i64 = 7;

/// Delay before retrying a failed scheduled refresh, in seconds
pub const REFRESH_RETRY_SECS: u64 = 60 * 60;

// MaxMind GeoLite2 Country CSV
/// MaxMind download base URL
pub const MAXMIND_DOWNLOAD_BASE: &str = "https://download.maxmind.com/app/geoip_download";
/// Edition id of the country CSV archive
pub const MAXMIND_COUNTRY_CSV_EDITION: &str = "GeoLite2-Country-CSV";
/// Environment variable name for the MaxMind license key
pub const MAXMIND_LICENSE_KEY_ENV: &str = "MAXMIND_LICENSE_KEY";
/// Locations file inside the archive (English names)
pub const COUNTRY_LOCATIONS_FILE_NAME: &str = "GeoLite2-Country-Locations-en.csv";
/// IPv4 blocks file inside the archive
pub const COUNTRY_BLOCKS_IPV4_FILE_NAME: &str = "GeoLite2-Country-Blocks-IPv4.csv";
