use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use simpleweb_core::error::{Result, WebError};

use crate::obs::metrics::{seconds_to_micros, DEFAULT_BUCKETS_SECONDS};

const MAX_BUCKETS: usize = 32;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WebError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(10..=600_000).contains(&self.request_timeout_ms) {
            return Err(WebError::BadConfig(
                "server.request_timeout_ms must be between 10 and 600000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| WebError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Histogram upper bounds in seconds, strictly increasing.
    #[serde(default = "default_latency_buckets")]
    pub latency_buckets_seconds: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            latency_buckets_seconds: default_latency_buckets(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        let b = &self.latency_buckets_seconds;
        if b.is_empty() || b.len() > MAX_BUCKETS {
            return Err(WebError::BadConfig(format!(
                "metrics.latency_buckets_seconds must hold 1..={MAX_BUCKETS} bounds"
            )));
        }
        if b.iter().any(|s| !s.is_finite() || *s < 0.000_001) {
            return Err(WebError::BadConfig(
                "metrics.latency_buckets_seconds must be finite and at least 1us".into(),
            ));
        }
        // Checked on the microsecond values so two bounds never collapse into one.
        let micros = self.bucket_bounds_micros();
        if micros.windows(2).any(|w| w[0] >= w[1]) {
            return Err(WebError::BadConfig(
                "metrics.latency_buckets_seconds must be strictly increasing".into(),
            ));
        }
        Ok(())
    }

    pub fn bucket_bounds_micros(&self) -> Vec<u64> {
        seconds_to_micros(&self.latency_buckets_seconds)
    }
}

fn default_latency_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS_SECONDS.to_vec()
}
