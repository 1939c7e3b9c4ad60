//! Refresh scheduler.
//!
//! Rebuilds the index when the dataset provider's recommended update time
//! passes. The storage never schedules on its own; this task is only started
//! when auto-refresh is enabled.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::datasource::CountryDataSource;
use crate::server::ServiceStats;
use crate::storage::CountryStorage;

/// Runs refresh cycles until `cancel` fires or the provider stops publishing updates.
///
/// A failed refresh is retried after `retry_delay`; the active generation
/// keeps serving in the meantime. A refresh already running when `cancel`
/// fires is allowed to finish.
pub async fn run_refresh_scheduler<S>(
    storage: CountryStorage<S>,
    stats: Arc<ServiceStats>,
    retry_delay: Duration,
    cancel: CancellationToken,
) where
    S: CountryDataSource + Send + Sync + 'static,
{
    loop {
        let Some(next_update) = storage.next_update().await else {
            info!("dataset source publishes no updates, refresh scheduler stopped");
            return;
        };

        let wait = (next_update - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        info!("next dataset refresh at {}", next_update.to_rfc3339());
        if !sleep_or_cancel(wait, &cancel).await {
            break;
        }

        match storage.refresh().await {
            Ok(()) => stats.record_refresh(true),
            Err(e) => {
                stats.record_refresh(false);
                warn!(
                    "scheduled refresh failed: {:#}, retrying in {}s",
                    e,
                    retry_delay.as_secs()
                );
                if !sleep_or_cancel(retry_delay, &cancel).await {
                    break;
                }
            }
        }
    }
    debug!("refresh scheduler cancelled");
}

// false when cancelled before the delay elapsed
async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = cancel.cancelled() => false,
    }
}
