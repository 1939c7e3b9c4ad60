//! Error type definitions.

use std::net::SocketAddr;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Neither a dataset location nor a license key was configured.
    #[error(
        "No dataset configured: pass --dataset <URL|PATH> or set {0} to download from MaxMind"
    )]
    DatasetConfigError(&'static str),

    /// The HTTP listener could not be bound.
    #[error("Failed to bind HTTP listener on {addr}: {source}")]
    ListenerError {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
