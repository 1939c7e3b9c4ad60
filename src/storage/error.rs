use thiserror::Error;

/// Error types for index build cycles.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The dataset provider failed to fetch or parse its data.
    ///
    /// The previously active generation, if any, keeps serving.
    #[error("dataset load failed: {0:#}")]
    Load(anyhow::Error),

    /// The initial build task panicked or was cancelled.
    #[error("storage build task failed: {0}")]
    BuildTask(#[from] tokio::task::JoinError),
}
