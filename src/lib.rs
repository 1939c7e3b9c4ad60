//! ip_country library: IPv4 to country resolution service
//!
//! This library keeps an in-memory range index built from the MaxMind
//! GeoLite2 Country CSV dataset, refreshes it on demand or on a schedule, and
//! serves point lookups over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use ip_country::{start_service, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     dataset: Some("./GeoLite2-Country-CSV.zip".to_string()),
//!     listen: "127.0.0.1:0".parse()?,
//!     ..Default::default()
//! };
//!
//! let service = start_service(config).await?;
//! println!("serving on http://{}/", service.local_addr());
//! service.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

mod app;
pub mod config;
pub mod datasource;
mod error_handling;
pub mod index;
pub mod initialization;
mod models;
mod run;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export public API
pub use app::run_refresh_scheduler;
pub use config::{Config, LogFormat, LogLevel};
pub use datasource::{CountryDataSource, DatasetLocation, MaxmindCsvDataSource};
pub use error_handling::InitializationError;
pub use index::CountryRangeIndex;
pub use models::{Country, Ipv4CountryBlock};
pub use run::{run_service, start_service, ServiceHandle};
pub use storage::{CountryStorage, StorageError, StoragePhase, StorageStatus};
