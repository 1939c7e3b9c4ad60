use serde::Serialize;

/// A country record from the dataset's locations table.
///
/// Identity is `id` (the GeoNames id in GeoLite2 data). `code` is the ISO
/// 3166-1 alpha-2 code and may be empty for continent-only rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    pub id: u64,
    pub code: String,
    pub title: String,
}

impl Country {
    pub fn new(id: u64, code: impl Into<String>, title: impl Into<String>) -> Self {
        Country {
            id,
            code: code.into(),
            title: title.into(),
        }
    }
}

/// An inclusive IPv4 range `[start_ip, end_ip]` owned by one country.
///
/// `start_ip <= end_ip` is the provider's responsibility and is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4CountryBlock {
    pub start_ip: u32,
    pub end_ip: u32,
    pub country_id: u64,
}

impl Ipv4CountryBlock {
    pub fn new(start_ip: u32, end_ip: u32, country_id: u64) -> Self {
        Ipv4CountryBlock {
            start_ip,
            end_ip,
            country_id,
        }
    }
}
