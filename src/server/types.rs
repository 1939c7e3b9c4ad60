//! Front end data structures.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::storage::CountryStorage;

/// Request and refresh counters exported on `/metrics`.
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub requests: AtomicU64,
    pub bad_requests: AtomicU64,
    pub resolved: AtomicU64,
    pub unresolved: AtomicU64,
    pub refresh_successes: AtomicU64,
    pub refresh_failures: AtomicU64,
}

impl ServiceStats {
    pub fn record_refresh(&self, ok: bool) {
        let counter = if ok {
            &self.refresh_successes
        } else {
            &self.refresh_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Shared state for the HTTP handlers
pub struct AppState<S> {
    pub storage: CountryStorage<S>,
    pub stats: Arc<ServiceStats>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            storage: self.storage.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

/// JSON body of every 400 response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
