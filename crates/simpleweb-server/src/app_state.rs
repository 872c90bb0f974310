//! Shared application state for the simpleweb server.
//!
//! Owns the process-wide metrics registry and readiness gate. Handlers only
//! see them through this type; nothing else mutates them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use simpleweb_core::error::Result;

use crate::config::ServerConfig;
use crate::obs::metrics::HttpMetrics;
use crate::ops::info::BuildInfo;
use crate::ops::readiness::ReadinessGate;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<HttpMetrics>,
    readiness: Arc<ReadinessGate>,
}

struct AppStateInner {
    cfg: ServerConfig,
    build: BuildInfo,
    started: Instant,
}

impl AppState {
    /// Build application state. The readiness gate starts closed.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(HttpMetrics::new(cfg.metrics.bucket_bounds_micros()));
        let build = BuildInfo::detect(&cfg.server.listen);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                build,
                started: Instant::now(),
            }),
            metrics,
            readiness: Arc::new(ReadinessGate::new()),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<HttpMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn readiness(&self) -> Arc<ReadinessGate> {
        Arc::clone(&self.readiness)
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.inner.build
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }

    /// Process-level gauges appended to the `/metrics` output.
    pub fn metrics_extra(&self) -> [(&'static str, u64); 2] {
        [
            ("simpleweb_ready", u64::from(self.readiness.is_ready())),
            ("simpleweb_uptime_seconds", self.uptime().as_secs()),
        ]
    }
}
