//! Lookup request parsing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::types::ErrorResponse;
use crate::config::MAX_IPS_PER_REQUEST;
use crate::utils::parse_ipv4;

/// Rejections for a `/country/{ips}` request. All map to HTTP 400.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("empty ip string passed")]
    Empty,

    #[error("limit of ips in one request reached (max: {limit})")]
    TooManyAddresses { limit: usize },

    #[error("not correct ipv4 passed: {0:?}")]
    InvalidAddress(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Splits a comma-separated address list into `(text, key)` pairs.
///
/// Items are trimmed; the trimmed text is what the response is keyed by.
pub fn parse_ips(raw: &str) -> Result<Vec<(String, u32)>, RequestError> {
    if raw.trim().is_empty() {
        return Err(RequestError::Empty);
    }

    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() > MAX_IPS_PER_REQUEST {
        return Err(RequestError::TooManyAddresses {
            limit: MAX_IPS_PER_REQUEST,
        });
    }

    parts
        .into_iter()
        .map(|part| {
            let text = part.trim();
            parse_ipv4(text)
                .map(|ip| (text.to_string(), ip))
                .map_err(|_| RequestError::InvalidAddress(text.to_string()))
        })
        .collect()
}
