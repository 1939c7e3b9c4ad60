//! CSV parsing for GeoLite2 country locations and IPv4 blocks.
//!
//! Columns are located by header name, so column order and extra columns in
//! newer dataset releases do not matter.

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::models::{Country, Ipv4CountryBlock};
use crate::utils::cidr_to_ipv4_range;

const COUNTRIES_INIT_COUNT: usize = 250;
const BLOCKS_INIT_COUNT: usize = 5000;

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|column| column == name)
        .ok_or_else(|| anyhow!("column {} not found in csv header", name))
}

/// Parses `GeoLite2-Country-Locations-*.csv`.
///
/// Rows for continents without a country keep an empty `code`.
pub(crate) fn parse_countries(data: &[u8]) -> Result<Vec<Country>> {
    let mut rdr = csv::Reader::from_reader(data);
    let headers = rdr.headers().context("no csv header line found")?.clone();
    let id_index = column_index(&headers, "geoname_id")?;
    let code_index = column_index(&headers, "country_iso_code")?;
    let title_index = column_index(&headers, "country_name")?;

    let mut countries = Vec::with_capacity(COUNTRIES_INIT_COUNT);
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("CSV reading error in record {}", i))?;
        let id_str = record.get(id_index).unwrap_or_default();
        let id = u64::from_str(id_str)
            .with_context(|| format!("unable to parse geoname id {:?} in record {}", id_str, i))?;
        countries.push(Country {
            id,
            code: record.get(code_index).unwrap_or_default().to_string(),
            title: record.get(title_index).unwrap_or_default().to_string(),
        });
    }

    Ok(countries)
}

/// Parses `GeoLite2-Country-Blocks-IPv4.csv`.
///
/// Blocks without a `geoname_id` (anonymous proxies, satellite providers)
/// carry no country and are skipped.
pub(crate) fn parse_ipv4_blocks(data: &[u8]) -> Result<Vec<Ipv4CountryBlock>> {
    let mut rdr = csv::Reader::from_reader(data);
    let headers = rdr.headers().context("no csv header line found")?.clone();
    let network_index = column_index(&headers, "network")?;
    let id_index = column_index(&headers, "geoname_id")?;

    let mut blocks = Vec::with_capacity(BLOCKS_INIT_COUNT);
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("CSV reading error in record {}", i))?;
        let id_str = record.get(id_index).unwrap_or_default();
        if id_str.is_empty() {
            continue;
        }
        let country_id = u64::from_str(id_str).with_context(|| {
            format!("unable to parse block geoname id {:?} in record {}", id_str, i)
        })?;
        let network = record.get(network_index).unwrap_or_default();
        let (start_ip, end_ip) = cidr_to_ipv4_range(network)
            .with_context(|| format!("unable to parse CIDR in record {}", i))?;
        blocks.push(Ipv4CountryBlock {
            start_ip,
            end_ip,
            country_id,
        });
    }

    Ok(blocks)
}
