//! Archive extraction.
//!
//! GeoLite2 CSV archives are zip files with a dated top-level directory, so
//! entries are matched by file-name suffix.

use std::io::{Cursor, Read, Seek};

use anyhow::{anyhow, Context, Result};
use zip::ZipArchive;

use crate::config::{COUNTRY_BLOCKS_IPV4_FILE_NAME, COUNTRY_LOCATIONS_FILE_NAME};

/// Raw CSV contents pulled out of a dataset archive.
pub(crate) struct DatasetFiles {
    pub(crate) locations: Vec<u8>,
    pub(crate) blocks_ipv4: Vec<u8>,
}

/// Extracts the locations and IPv4 blocks CSV files from a zip archive.
pub(crate) fn extract_dataset_files(zip_bytes: &[u8]) -> Result<DatasetFiles> {
    let mut zip = ZipArchive::new(Cursor::new(zip_bytes)).context("Failed to open zip archive")?;

    let locations = read_entry(&mut zip, COUNTRY_LOCATIONS_FILE_NAME)?;
    let blocks_ipv4 = read_entry(&mut zip, COUNTRY_BLOCKS_IPV4_FILE_NAME)?;

    Ok(DatasetFiles {
        locations,
        blocks_ipv4,
    })
}

fn read_entry<R: Read + Seek>(zip: &mut ZipArchive<R>, suffix: &str) -> Result<Vec<u8>> {
    let name = zip
        .file_names()
        .find(|name| name.ends_with(suffix))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{} not found in zip archive", suffix))?;

    let mut entry = zip
        .by_name(&name)
        .with_context(|| format!("Failed to open {} in zip archive", name))?;
    let mut content = Vec::new();
    entry
        .read_to_end(&mut content)
        .with_context(|| format!("Failed to read {} from zip archive", name))?;

    if content.is_empty() {
        return Err(anyhow!("{} is empty", suffix));
    }
    log::debug!("extracted {} ({} bytes)", name, content.len());
    Ok(content)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    /// Creates an in-memory zip archive with the specified files.
    pub(crate) fn create_test_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_dataset_files_with_directory_prefix() {
        let zip = create_test_zip(&[
            ("GeoLite2-Country-CSV_20240101/COPYRIGHT.txt", b"copyright"),
            (
                "GeoLite2-Country-CSV_20240101/GeoLite2-Country-Locations-en.csv",
                b"locations",
            ),
            (
                "GeoLite2-Country-CSV_20240101/GeoLite2-Country-Blocks-IPv4.csv",
                b"blocks",
            ),
        ]);

        let files = extract_dataset_files(&zip).expect("archive should extract");
        assert_eq!(files.locations, b"locations");
        assert_eq!(files.blocks_ipv4, b"blocks");
    }

    #[test]
    fn test_extract_dataset_files_missing_entry() {
        let zip = create_test_zip(&[("GeoLite2-Country-Locations-en.csv", b"locations")]);

        let err = extract_dataset_files(&zip).err().expect("blocks file is missing");
        assert!(err
            .to_string()
            .contains("GeoLite2-Country-Blocks-IPv4.csv not found"));
    }

    #[test]
    fn test_extract_dataset_files_empty_entry() {
        let zip = create_test_zip(&[
            ("GeoLite2-Country-Locations-en.csv", b""),
            ("GeoLite2-Country-Blocks-IPv4.csv", b"blocks"),
        ]);

        let err = extract_dataset_files(&zip).err().expect("empty locations file");
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn test_extract_dataset_files_not_a_zip() {
        let result = extract_dataset_files(b"definitely not a zip archive");
        assert!(result.is_err());
    }
}
