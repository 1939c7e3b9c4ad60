//! Country dataset providers.
//!
//! A provider fetches and parses a full dataset into internal buffers on
//! [`CountryDataSource::load`], exposes them until [`CountryDataSource::cleanup`]
//! releases them, and advertises when the next refresh is worthwhile.

mod archive;
mod download;
mod maxmind;
mod parse;
#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Country, Ipv4CountryBlock};

pub use maxmind::{DatasetLocation, MaxmindCsvDataSource};

/// Contract between the refresh coordinator and a dataset provider.
///
/// Each build cycle calls `load`, then reads `countries` and `ipv4_blocks`,
/// then calls `cleanup`. `cleanup` is also called when `load` fails, so
/// implementations must tolerate it after a partial load.
pub trait CountryDataSource {
    /// Fetches and parses a full dataset.
    fn load(&mut self) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn countries(&self) -> &[Country];

    /// Ranges loaded by the last successful `load`.
    fn ipv4_blocks(&self) -> &[Ipv4CountryBlock];

    /// Whether the source publishes new data over time.
    fn supports_updates(&self) -> bool;

    /// Recommended time for the next refresh.
    fn next_update_time(&self) -> DateTime<Utc>;

    /// Releases buffers filled by `load`.
    fn cleanup(&mut self) -> anyhow::Result<()>;
}

/// Errors from fetching a dataset archive over HTTP.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The server answered with a non-success status.
    #[error("Failed to download dataset: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The archive exceeds the download size limit.
    #[error("Dataset too large: {size} bytes (max: {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// Transport-level failure (connect, timeout, body read).
    #[error("Dataset request failed: {0}")]
    Request(#[from] reqwest::Error),
}
