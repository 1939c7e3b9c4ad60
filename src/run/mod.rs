//! Service wiring: dataset provider, storage, HTTP server and background tasks.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app::{run_refresh_scheduler, shutdown_gracefully, wait_for_shutdown_signal};
use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::initialization::init_data_source;
use crate::server::{self, AppState, ServiceStats};
use crate::storage::{CountryStorage, StorageError};

/// A running service.
///
/// Dropping the handle leaves the service running; call [`ServiceHandle::shutdown`]
/// or cancel the token from [`ServiceHandle::cancel_token`] to stop it.
pub struct ServiceHandle {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl ServiceHandle {
    /// Address the HTTP server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits until the service stops, returning the server's result.
    pub async fn wait(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| anyhow::anyhow!("service task failed: {}", e))?
    }

    /// Stops the service and waits for it to drain.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel.cancel();
        self.wait().await
    }
}

/// Starts the service and returns once the first index build has finished.
///
/// The HTTP server is already accepting connections while the first build
/// runs; lookups made in that window wait for it. A failed first build stops
/// the server and is returned as an error.
///
/// # Errors
///
/// - No dataset location or license key is configured
/// - The listen address cannot be bound
/// - The first dataset load fails
pub async fn start_service(config: Config) -> Result<ServiceHandle> {
    let source = init_data_source(&config)?;
    info!("dataset source: {}", source.location());

    let (storage, first_build) = CountryStorage::initialize(source).await;
    let stats = Arc::new(ServiceStats::default());

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| InitializationError::ListenerError {
            addr: config.listen,
            source,
        })?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read HTTP listener address")?;

    let cancel = CancellationToken::new();
    let app = server::router(AppState {
        storage: storage.clone(),
        stats: Arc::clone(&stats),
    });
    let server_cancel = cancel.clone();
    let server_task = tokio::spawn(async move {
        let result = server::serve(listener, app, server_cancel.clone()).await;
        // A server that stops on its own takes the background tasks with it
        server_cancel.cancel();
        result
    });

    let first_build = match first_build.await {
        Ok(result) => result,
        Err(e) => Err(StorageError::from(e)),
    };
    if let Err(e) = first_build {
        cancel.cancel();
        if let Err(server_err) = shutdown_gracefully(cancel, server_task, None).await {
            error!("{:#}", server_err);
        }
        return Err(anyhow::Error::new(e).context("Failed to build the initial country index"));
    }

    let refresh_task = config.auto_refresh.then(|| {
        tokio::spawn(run_refresh_scheduler(
            storage,
            stats,
            config.refresh_retry(),
            cancel.clone(),
        ))
    });

    let supervisor_cancel = cancel.clone();
    let task = tokio::spawn(async move {
        supervisor_cancel.cancelled().await;
        shutdown_gracefully(supervisor_cancel, server_task, refresh_task).await
    });

    Ok(ServiceHandle {
        local_addr,
        cancel,
        task,
    })
}

/// Runs the service until Ctrl-C.
///
/// This is the binary's entry point into the library.
///
/// # Example
///
/// ```no_run
/// use ip_country::{run_service, Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     dataset: Some("./GeoLite2-Country-CSV.zip".to_string()),
///     ..Default::default()
/// };
/// run_service(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_service(config: Config) -> Result<()> {
    let handle = start_service(config).await?;
    tokio::spawn(wait_for_shutdown_signal(handle.cancel_token()));
    handle.wait().await
}
