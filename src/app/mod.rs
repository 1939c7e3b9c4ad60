//! Background tasks run alongside the HTTP server.
//!
//! This module provides the optional refresh scheduler and shutdown
//! signalling used by the service.

pub mod refresh;
pub mod shutdown;

// Re-export public API
pub use refresh::run_refresh_scheduler;
pub use shutdown::{shutdown_gracefully, wait_for_shutdown_signal};
