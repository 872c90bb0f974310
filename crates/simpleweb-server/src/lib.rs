//! simpleweb server library entry.
//!
//! Wires config, the request-metrics pipeline, the readiness gate, the
//! operational endpoints and the application pages into one axum router. It
//! is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod pages;
pub mod pipeline;
pub mod router;
