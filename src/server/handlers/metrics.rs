//! Prometheus metrics handler.

use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use super::super::types::{AppState, ServiceStats};
use crate::datasource::CountryDataSource;
use crate::storage::StorageStatus;

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: CountryDataSource + Send + Sync + 'static,
{
    let metrics = render_metrics(&state.stats, &state.storage.status());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics,
    )
        .into_response()
}

pub(crate) fn render_metrics(stats: &ServiceStats, status: &StorageStatus) -> String {
    format!(
        r#"# HELP ip_country_requests_total Lookup requests received
# TYPE ip_country_requests_total counter
ip_country_requests_total {}

# HELP ip_country_bad_requests_total Lookup requests rejected with 400
# TYPE ip_country_bad_requests_total counter
ip_country_bad_requests_total {}

# HELP ip_country_resolved_total Addresses resolved to a country
# TYPE ip_country_resolved_total counter
ip_country_resolved_total {}

# HELP ip_country_unresolved_total Addresses with no matching range
# TYPE ip_country_unresolved_total counter
ip_country_unresolved_total {}

# HELP ip_country_refresh_success_total Successful index rebuilds after startup
# TYPE ip_country_refresh_success_total counter
ip_country_refresh_success_total {}

# HELP ip_country_refresh_failure_total Failed index rebuilds after startup
# TYPE ip_country_refresh_failure_total counter
ip_country_refresh_failure_total {}

# HELP ip_country_generation Number of the active index generation (0 if none)
# TYPE ip_country_generation gauge
ip_country_generation {}

# HELP ip_country_ready Whether an index generation is serving lookups
# TYPE ip_country_ready gauge
ip_country_ready {}

# HELP ip_country_ranges Ranges in the active index generation
# TYPE ip_country_ranges gauge
ip_country_ranges {}
"#,
        stats.requests.load(Ordering::Relaxed),
        stats.bad_requests.load(Ordering::Relaxed),
        stats.resolved.load(Ordering::Relaxed),
        stats.unresolved.load(Ordering::Relaxed),
        stats.refresh_successes.load(Ordering::Relaxed),
        stats.refresh_failures.load(Ordering::Relaxed),
        status.generation,
        u8::from(status.built_at.is_some()),
        status.ranges,
    )
}
