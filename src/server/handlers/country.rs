//! Country lookup handler.

use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::super::request::{parse_ips, RequestError};
use super::super::types::AppState;
use crate::datasource::CountryDataSource;

/// Resolves every address in the path; unresolved ones are left out.
pub async fn country_handler<S>(
    State(state): State<AppState<S>>,
    Path(ips): Path<String>,
) -> Response
where
    S: CountryDataSource + Send + Sync + 'static,
{
    state.stats.requests.fetch_add(1, Ordering::Relaxed);

    let ips = match parse_ips(&ips) {
        Ok(ips) => ips,
        Err(e) => {
            state.stats.bad_requests.fetch_add(1, Ordering::Relaxed);
            log::debug!("rejected lookup request: {}", e);
            return e.into_response();
        }
    };

    let mut out = BTreeMap::new();
    for (text, ip) in ips {
        match state.storage.find_country(ip).await {
            Some(country) => {
                state.stats.resolved.fetch_add(1, Ordering::Relaxed);
                out.insert(text, country.code);
            }
            None => {
                state.stats.unresolved.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    Json(out).into_response()
}

/// `/country/` with nothing after the slash
pub async fn empty_country_handler<S>(State(state): State<AppState<S>>) -> Response {
    state.stats.requests.fetch_add(1, Ordering::Relaxed);
    state.stats.bad_requests.fetch_add(1, Ordering::Relaxed);
    RequestError::Empty.into_response()
}
