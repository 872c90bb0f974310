//! Request observability: the metrics registry and the middleware that feeds it.
//!
//! Metrics live in explicit `Arc<HttpMetrics>` instances carried by `AppState`
//! rather than a global recorder, so each router (and each test) owns its own.

pub mod metrics;
pub mod recorder;
