//! Startup error types.
//!
//! Errors raised while the service is being wired together. Build-cycle and
//! request errors live next to the code that raises them
//! ([`crate::storage::StorageError`], [`crate::server::RequestError`]).

mod types;

pub use types::InitializationError;
