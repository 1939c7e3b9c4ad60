//! Process-level initialization.
//!
//! - Logger setup (`env_logger` with plain or JSON output)
//! - Dataset provider construction from [`Config`]

mod logger;

use crate::config::{Config, MAXMIND_LICENSE_KEY_ENV};
use crate::datasource::{DatasetLocation, MaxmindCsvDataSource};
use crate::error_handling::InitializationError;

pub use logger::init_logger_with;

/// Resolves where the dataset archive comes from.
///
/// An explicit `--dataset` wins; otherwise the MaxMind download URL is built
/// from the license key.
pub fn dataset_location(config: &Config) -> Result<DatasetLocation, InitializationError> {
    if let Some(dataset) = config.dataset.as_deref().filter(|d| !d.trim().is_empty()) {
        return Ok(DatasetLocation::parse(dataset.trim()));
    }
    match config.license_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => Ok(DatasetLocation::maxmind(key.trim())),
        None => Err(InitializationError::DatasetConfigError(
            MAXMIND_LICENSE_KEY_ENV,
        )),
    }
}

/// Builds the MaxMind CSV provider described by `config`.
pub fn init_data_source(config: &Config) -> Result<MaxmindCsvDataSource, InitializationError> {
    let location = dataset_location(config)?;
    Ok(MaxmindCsvDataSource::new(location)
        .with_download_timeout(config.download_timeout())
        .with_download_retries(config.download_retries))
}
