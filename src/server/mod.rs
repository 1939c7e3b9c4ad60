//! HTTP lookup front end.
//!
//! Endpoints:
//! - `/` - usage text
//! - `/country/{ips}` - comma-separated IPv4 addresses to country codes
//! - `/status` - JSON description of the active index generation
//! - `/metrics` - Prometheus-compatible metrics

mod handlers;
mod request;
mod types;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::datasource::CountryDataSource;

use handlers::{
    country_handler, empty_country_handler, metrics_handler, status_handler, usage_handler,
};
pub use request::{parse_ips, RequestError};
pub use types::{AppState, ErrorResponse, ServiceStats};

/// Builds the router for the lookup service
pub fn router<S>(state: AppState<S>) -> Router
where
    S: CountryDataSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(usage_handler))
        .route("/country/", get(empty_country_handler::<S>))
        .route("/country/{ips}", get(country_handler::<S>))
        .route("/status", get(status_handler::<S>))
        .route("/metrics", get(metrics_handler::<S>))
        .with_state(state)
}

/// Serves `app` on `listener` until `cancel` fires, then drains connections.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    cancel: CancellationToken,
) -> Result<(), anyhow::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("HTTP server listening on http://{}/", addr);
        log::info!("  - Lookup: http://{}/country/{{ips}}", addr);
        log::info!("  - Status: http://{}/status", addr);
        log::info!("  - Metrics: http://{}/metrics", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    log::info!("HTTP server stopped");
    Ok(())
}
