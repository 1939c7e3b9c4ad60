//! Graceful shutdown handling.

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` when the process receives Ctrl-C.
///
/// Returns early, without cancelling, if `cancel` is triggered elsewhere.
pub async fn wait_for_shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("received Ctrl-C, shutting down..."),
                Err(e) => warn!("failed to listen for Ctrl-C: {}, shutting down", e),
            }
            cancel.cancel();
        }
        _ = cancel.cancelled() => {}
    }
}

/// Shuts down all background tasks gracefully.
///
/// Signals cancellation, then waits for the server to drain and for the
/// refresh scheduler to finish any build already in progress.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    server_task: JoinHandle<anyhow::Result<()>>,
    refresh_task: Option<JoinHandle<()>>,
) -> anyhow::Result<()> {
    cancel.cancel();

    if let Some(refresh_task) = refresh_task {
        if let Err(e) = refresh_task.await {
            warn!("refresh scheduler task failed: {}", e);
        }
    }

    server_task
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server task failed: {}", e))?
}
