//! HTTP handlers.

mod country;
mod metrics;
mod status;

use axum::Json;

pub use country::{country_handler, empty_country_handler};
pub use metrics::metrics_handler;
pub use status::status_handler;

const USAGE: &str = r#"
Usage:

curl "http://localhost:12950/country/132.99.75.15"

Also you can pass several ip addresses that you need to check:

curl "http://localhost:12950/country/132.99.75.15,99.12.44.52,3.24.12.85"

"#;

/// Usage text, served as a JSON string
pub async fn usage_handler() -> Json<&'static str> {
    Json(USAGE)
}
