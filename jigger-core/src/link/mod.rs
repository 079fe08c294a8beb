//! Link liveness and sync retry
//!
//! The broadcast medium has no acknowledgments and no connection
//! concept, so "connected" is inferred from data freshness and "retry"
//! from whether the data on screen is trustworthy (non-mock) rather
//! than from request/response pairing.

pub mod monitor;
pub mod retry;

pub use monitor::{LinkMonitor, LIVENESS_WINDOW_MS};
pub use retry::{RetryTimer, SYNC_RETRY_INTERVAL_MS};
