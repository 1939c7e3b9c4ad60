//! MaxMind GeoLite2 Country CSV provider.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use url::form_urlencoded;

use super::archive::extract_dataset_files;
use super::download::download_with_size_limit;
use super::parse::{parse_countries, parse_ipv4_blocks};
use super::CountryDataSource;
use crate::config::{
    DATASET_UPDATE_INTERVAL_DAYS, DEFAULT_DOWNLOAD_TIMEOUT, MAXMIND_COUNTRY_CSV_EDITION,
    MAXMIND_DOWNLOAD_BASE, MAX_DATASET_DOWNLOAD_SIZE, MAX_NETWORK_DOWNLOAD_RETRIES,
};
use crate::models::{Country, Ipv4CountryBlock};
use crate::utils::is_retriable_error;

/// Where a dataset archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    Url(String),
    File(PathBuf),
}

impl DatasetLocation {
    /// Treats `http://` and `https://` values as URLs, anything else as a path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DatasetLocation::Url(value.to_string())
        } else {
            DatasetLocation::File(PathBuf::from(value))
        }
    }

    /// MaxMind download URL for the country CSV edition.
    pub fn maxmind(license_key: &str) -> Self {
        let encoded_key = form_urlencoded::byte_serialize(license_key.as_bytes()).collect::<String>();
        DatasetLocation::Url(format!(
            "{}?edition_id={}&license_key={}&suffix=zip",
            MAXMIND_DOWNLOAD_BASE, MAXMIND_COUNTRY_CSV_EDITION, encoded_key
        ))
    }
}

// URLs may carry a license key, never print the query
impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetLocation::Url(url) => match url.split_once('?') {
                Some((base, _)) => write!(f, "{}?...", base),
                None => f.write_str(url),
            },
            DatasetLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads countries and IPv4 blocks from a GeoLite2 Country CSV zip archive.
pub struct MaxmindCsvDataSource {
    location: DatasetLocation,
    download_timeout: Duration,
    download_retries: u32,
    update_interval: TimeDelta,
    countries: Vec<Country>,
    blocks_ipv4: Vec<Ipv4CountryBlock>,
}

impl MaxmindCsvDataSource {
    pub fn new(location: DatasetLocation) -> Self {
        MaxmindCsvDataSource {
            location,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            download_retries: MAX_NETWORK_DOWNLOAD_RETRIES,
            update_interval: TimeDelta::days(DATASET_UPDATE_INTERVAL_DAYS),
            countries: Vec::new(),
            blocks_ipv4: Vec::new(),
        }
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Sets the number of download attempts; at least one is always made.
    pub fn with_download_retries(mut self, retries: u32) -> Self {
        self.download_retries = retries.max(1);
        self
    }

    pub fn with_update_interval(mut self, interval: TimeDelta) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn location(&self) -> &DatasetLocation {
        &self.location
    }

    async fn read_archive(&self) -> Result<Vec<u8>> {
        match &self.location {
            DatasetLocation::Url(url) => self.download(url).await,
            DatasetLocation::File(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read dataset archive {}", path.display())),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 1;
        loop {
            let err = match download_with_size_limit(
                url,
                self.download_timeout,
                MAX_DATASET_DOWNLOAD_SIZE,
            )
            .await
            {
                Ok(bytes) => return Ok(bytes),
                Err(e) => anyhow::Error::from(e),
            };

            if attempt >= self.download_retries || !is_retriable_error(&err) {
                return Err(err.context(format!(
                    "Failed to download dataset from {} after {} attempt(s)",
                    self.location, attempt
                )));
            }

            warn!(
                "Failed to download dataset from {} (attempt {}/{}): {}, retrying...",
                self.location, attempt, self.download_retries, err
            );
            // Exponential backoff: 2s, 4s, 8s
            tokio::time::sleep(Duration::from_secs(2 << (attempt - 1))).await;
            attempt += 1;
        }
    }
}

impl CountryDataSource for MaxmindCsvDataSource {
    async fn load(&mut self) -> Result<()> {
        info!("Loading country dataset from {}", self.location);

        let archive = self.read_archive().await?;
        let files = extract_dataset_files(&archive)?;
        drop(archive);

        self.countries = parse_countries(&files.locations)
            .context("Failed to parse country locations")?;
        self.blocks_ipv4 =
            parse_ipv4_blocks(&files.blocks_ipv4).context("Failed to parse IPv4 blocks")?;

        debug!(
            "got {} countries, {} blocks",
            self.countries.len(),
            self.blocks_ipv4.len()
        );
        Ok(())
    }

    fn countries(&self) -> &[Country] {
        &self.countries
    }

    fn ipv4_blocks(&self) -> &[Ipv4CountryBlock] {
        &self.blocks_ipv4
    }

    fn supports_updates(&self) -> bool {
        true
    }

    fn next_update_time(&self) -> DateTime<Utc> {
        Utc::now() + self.update_interval
    }

    fn cleanup(&mut self) -> Result<()> {
        self.countries = Vec::new();
        self.blocks_ipv4 = Vec::new();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::archive::tests::create_test_zip;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use tempfile::TempDir;

    const LOCATIONS: &[u8] = b"\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name,is_in_european_union
2921044,en,EU,Europe,DE,Germany,1
6252001,en,NA,\"North America\",US,\"United States\",0
";

    const BLOCKS: &[u8] = b"\
network,geoname_id,registered_country_geoname_id,represented_country_geoname_id,is_anonymous_proxy,is_satellite_provider
10.0.0.0/24,6252001,6252001,,0,0
10.0.1.0/24,2921044,2921044,,0,0
";

    fn dataset_zip() -> Vec<u8> {
        create_test_zip(&[
            (
                "GeoLite2-Country-CSV_20240101/GeoLite2-Country-Locations-en.csv",
                LOCATIONS,
            ),
            (
                "GeoLite2-Country-CSV_20240101/GeoLite2-Country-Blocks-IPv4.csv",
                BLOCKS,
            ),
        ])
    }

    #[test]
    fn test_dataset_location_parse() {
        assert_eq!(
            DatasetLocation::parse("https://example.com/db.zip"),
            DatasetLocation::Url("https://example.com/db.zip".to_string())
        );
        assert_eq!(
            DatasetLocation::parse("./db.zip"),
            DatasetLocation::File(PathBuf::from("./db.zip"))
        );
    }

    #[test]
    fn test_maxmind_location_encodes_and_hides_license_key() {
        let location = DatasetLocation::maxmind("a+b/c");
        let DatasetLocation::Url(url) = &location else {
            panic!("expected a URL");
        };
        assert!(url.contains("edition_id=GeoLite2-Country-CSV"));
        assert!(url.contains("license_key=a%2Bb%2Fc"));
        assert!(url.ends_with("suffix=zip"));

        let shown = location.to_string();
        assert_eq!(shown, format!("{}?...", MAXMIND_DOWNLOAD_BASE));
        assert!(!shown.contains("a%2Bb"));
    }

    #[tokio::test]
    async fn test_load_from_file_and_cleanup() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("GeoLite2-Country-CSV.zip");
        tokio::fs::write(&path, dataset_zip()).await.unwrap();

        let mut source = MaxmindCsvDataSource::new(DatasetLocation::File(path));
        source.load().await.expect("load should succeed");

        assert_eq!(source.countries().len(), 2);
        assert_eq!(source.ipv4_blocks().len(), 2);
        assert_eq!(source.ipv4_blocks()[0].country_id, 6252001);

        source.cleanup().unwrap();
        assert!(source.countries().is_empty());
        assert!(source.ipv4_blocks().is_empty());
    }

    #[tokio::test]
    async fn test_load_from_missing_file() {
        let mut source =
            MaxmindCsvDataSource::new(DatasetLocation::File(PathBuf::from("nonexistent.zip")));
        let err = source.load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset archive"));
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/GeoLite2-Country-CSV.zip"))
                .respond_with(status_code(200).body(dataset_zip())),
        );

        let url = server.url("/GeoLite2-Country-CSV.zip").to_string();
        let mut source = MaxmindCsvDataSource::new(DatasetLocation::Url(url));
        source.load().await.expect("load should succeed");

        assert_eq!(source.countries()[1].code, "US");
        assert_eq!(source.ipv4_blocks()[1].start_ip, 167_772_416);
    }

    #[tokio::test]
    async fn test_load_from_url_client_error_is_not_retried() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/GeoLite2-Country-CSV.zip"))
                .times(1)
                .respond_with(status_code(403).body("forbidden")),
        );

        let url = server.url("/GeoLite2-Country-CSV.zip").to_string();
        let mut source = MaxmindCsvDataSource::new(DatasetLocation::Url(url));
        let err = source.load().await.unwrap_err();
        assert!(err.to_string().contains("after 1 attempt(s)"));
    }

    #[tokio::test]
    async fn test_load_from_url_server_error_single_attempt() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/GeoLite2-Country-CSV.zip"))
                .times(1)
                .respond_with(status_code(500)),
        );

        let url = server.url("/GeoLite2-Country-CSV.zip").to_string();
        let mut source =
            MaxmindCsvDataSource::new(DatasetLocation::Url(url)).with_download_retries(0);
        let err = source.load().await.unwrap_err();
        assert!(format!("{:#}", err).contains("500"));
    }

    #[tokio::test]
    async fn test_load_rejects_archive_without_blocks() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("partial.zip");
        let zip = create_test_zip(&[("GeoLite2-Country-Locations-en.csv", LOCATIONS)]);
        tokio::fs::write(&path, zip).await.unwrap();

        let mut source = MaxmindCsvDataSource::new(DatasetLocation::File(path));
        assert!(source.load().await.is_err());
    }

    #[test]
    fn test_next_update_time_uses_interval() {
        let source = MaxmindCsvDataSource::new(DatasetLocation::File(PathBuf::from("x.zip")))
            .with_update_interval(TimeDelta::hours(1));
        assert!(source.supports_updates());
        let delta = source.next_update_time() - Utc::now();
        assert!(delta > TimeDelta::minutes(59) && delta <= TimeDelta::hours(1));
    }
}
