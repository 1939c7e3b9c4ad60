//! IPv4 address and CIDR conversions.
//!
//! Addresses are keyed as big-endian `u32` values, the same encoding used when
//! dataset ranges are derived from CIDR notation.

use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing addresses or CIDR blocks.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CidrError {
    #[error("invalid cidr passed: {0}")]
    MissingPrefix(String),

    #[error("unable to parse ipv4 address: {0}")]
    InvalidAddress(String),

    #[error("invalid prefix length in cidr {0}")]
    InvalidPrefix(String),
}

/// Parses dotted-quad text into its integer key.
pub fn parse_ipv4(text: &str) -> Result<u32, CidrError> {
    Ipv4Addr::from_str(text)
        .map(u32::from)
        .map_err(|_| CidrError::InvalidAddress(text.to_string()))
}

/// Formats an integer key back to dotted-quad text.
pub fn ipv4_to_string(ip: u32) -> String {
    Ipv4Addr::from(ip).to_string()
}

/// Converts `a.b.c.d/len` into an inclusive `(start, end)` range.
///
/// `start` is the address as written; `end` sets every host bit. A `/32`
/// block is a single address and `/0` covers the whole space.
pub fn cidr_to_ipv4_range(cidr: &str) -> Result<(u32, u32), CidrError> {
    let Some((addr, prefix)) = cidr.split_once('/') else {
        return Err(CidrError::MissingPrefix(cidr.to_string()));
    };
    let start = parse_ipv4(addr)?;
    let bits = u32::from_str(prefix)
        .ok()
        .filter(|bits| *bits <= 32)
        .ok_or_else(|| CidrError::InvalidPrefix(cidr.to_string()))?;
    let host_mask = u32::MAX.checked_shr(bits).unwrap_or(0);
    Ok((start, start | host_mask))
}
