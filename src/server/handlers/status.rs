//! JSON status handler.

use axum::extract::State;
use axum::Json;

use super::super::types::AppState;
use crate::datasource::CountryDataSource;
use crate::storage::StorageStatus;

/// Current generation details; reports `building` instead of waiting on a build
pub async fn status_handler<S>(State(state): State<AppState<S>>) -> Json<StorageStatus>
where
    S: CountryDataSource + Send + Sync + 'static,
{
    Json(state.storage.status())
}
