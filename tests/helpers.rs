// Shared helpers for building dataset archives and starting the service.

use std::io::Write;
use std::path::{Path, PathBuf};

use ip_country::{start_service, Config, ServiceHandle};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const LOCATIONS: &str = "\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name,is_in_european_union
2921044,en,EU,Europe,DE,Germany,1
6251999,en,NA,\"North America\",CA,Canada,0
6252001,en,NA,\"North America\",US,\"United States\",0
";

// 10.0.0.0/8 is US, with a Canadian /24 nested inside; 192.168.0.0/16 is
// German; 8.8.8.0/24 has no country id and is skipped.
pub const BLOCKS: &str = "\
network,geoname_id,registered_country_geoname_id,represented_country_geoname_id,is_anonymous_proxy,is_satellite_provider
8.8.8.0/24,,6252001,,0,0
10.0.0.0/8,6252001,6252001,,0,0
10.1.2.0/24,6251999,6251999,,0,0
192.168.0.0/16,2921044,2921044,,0,0
";

/// Builds a GeoLite2-style archive with the files under a dated directory.
#[allow(dead_code)] // Used by other test files
pub fn dataset_zip(locations: &str, blocks: &str) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buf);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in [
            (
                "GeoLite2-Country-CSV_20240101/GeoLite2-Country-Locations-en.csv",
                locations,
            ),
            (
                "GeoLite2-Country-CSV_20240101/GeoLite2-Country-Blocks-IPv4.csv",
                blocks,
            ),
        ] {
            zip.start_file(name, options).expect("Failed to start zip entry");
            zip.write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        zip.finish().expect("Failed to finish zip");
    }
    buf.into_inner()
}

/// Writes the default test archive into `dir`.
#[allow(dead_code)] // Used by other test files
pub fn write_dataset(dir: &Path) -> PathBuf {
    let path = dir.join("GeoLite2-Country-CSV.zip");
    std::fs::write(&path, dataset_zip(LOCATIONS, BLOCKS)).expect("Failed to write dataset");
    path
}

/// Config serving `dataset` on an ephemeral port.
#[allow(dead_code)] // Used by other test files
pub fn test_config(dataset: &str) -> Config {
    Config {
        listen: "127.0.0.1:0".parse().unwrap(),
        dataset: Some(dataset.to_string()),
        download_retries: 1,
        ..Default::default()
    }
}

#[allow(dead_code)] // Used by other test files
pub async fn start_with_file(dir: &Path) -> ServiceHandle {
    let path = write_dataset(dir);
    start_service(test_config(&path.to_string_lossy()))
        .await
        .expect("service should start")
}

/// GETs `path` and returns the status code and body.
#[allow(dead_code)] // Used by other test files
pub async fn get(service: &ServiceHandle, path: &str) -> (u16, String) {
    let url = format!("http://{}{}", service.local_addr(), path);
    let response = reqwest::get(&url).await.expect("request should succeed");
    let status = response.status().as_u16();
    let body = response.text().await.expect("body should be readable");
    (status, body)
}
