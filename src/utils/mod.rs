//! Utility functions.
//!
//! This module provides:
//! - IPv4 address and CIDR conversions
//! - Retry classification for dataset downloads

pub mod ip;
#[cfg(test)]
pub(crate) mod log_capture;
mod retry;

pub use ip::{cidr_to_ipv4_range, ipv4_to_string, parse_ipv4, CidrError};
pub(crate) use retry::is_retriable_error;
