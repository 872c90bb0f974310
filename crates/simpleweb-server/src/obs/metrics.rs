//! HTTP request metrics registry.
//!
//! Two metric families are kept, both backed by `DashMap` so concurrent
//! requests on different series never contend on a shared lock:
//!
//! - `http_requests_total{method, route, status_class}` (counter)
//! - `http_request_duration_seconds{method, route}` (histogram)
//!
//! A request commits both updates while holding the shared side of a commit
//! lock; a scrape takes the exclusive side just long enough to copy the values
//! into a [`MetricsSnapshot`]. A scrape therefore never sees a request's counter
//! increment without its latency observation. Durations are accumulated as
//! integer microseconds and rendered in seconds.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use simpleweb_core::{Result, StatusClass};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Default latency buckets in seconds (Prometheus client defaults).
pub const DEFAULT_BUCKETS_SECONDS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn micros_to_seconds(micros: u64) -> f64 {
    micros as f64 / 1_000_000.0
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub method: &'static str,
    pub route: String,
}

impl RouteKey {
    fn labels(&self) -> String {
        format!(
            "method=\"{}\",route=\"{}\"",
            escape_label(self.method),
            escape_label(&self.route)
        )
    }
}

#[derive(Default)]
struct RequestCounter {
    map: DashMap<(RouteKey, StatusClass), AtomicU64>,
}

impl RequestCounter {
    fn inc(&self, key: RouteKey, class: StatusClass) {
        let counter = self.map.entry((key, class)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> Vec<((RouteKey, StatusClass), u64)> {
        let mut out: Vec<_> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: Box<[AtomicU64]>,
}

impl AtomicHistogram {
    fn new(len: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            buckets: (0..len).map(|_| AtomicU64::new(0)).collect(),
        }
    }
}

struct LatencyHistogram {
    bounds_micros: Box<[u64]>,
    map: DashMap<RouteKey, AtomicHistogram>,
}

impl LatencyHistogram {
    fn new(bounds_micros: Vec<u64>) -> Self {
        Self {
            bounds_micros: bounds_micros.into_boxed_slice(),
            map: DashMap::new(),
        }
    }

    /// Observe a duration and increment cumulative buckets (microsecond scale).
    fn observe(&self, key: RouteKey, duration: Duration) {
        let len = self.bounds_micros.len();
        let hist = self.map.entry(key).or_insert_with(|| AtomicHistogram::new(len));
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        // Cumulative buckets: every bound at or above the value.
        for (i, &b) in self.bounds_micros.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn snapshot(&self) -> Vec<(RouteKey, HistogramSnapshot)> {
        let mut out: Vec<_> = self
            .map
            .iter()
            .map(|r| {
                let h = r.value();
                let snap = HistogramSnapshot {
                    count: h.count.load(Ordering::Relaxed),
                    sum_micros: h.sum_micros.load(Ordering::Relaxed),
                    buckets: h.buckets.iter().map(|b| b.load(Ordering::Relaxed)).collect(),
                };
                (r.key().clone(), snap)
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramSnapshot {
    pub count: u64,
    pub sum_micros: u64,
    pub buckets: Vec<u64>,
}

/// Immutable copy of the whole registry, taken under the exclusive commit lock.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    bounds_micros: Vec<u64>,
    pub requests: Vec<((RouteKey, StatusClass), u64)>,
    pub latency: Vec<(RouteKey, HistogramSnapshot)>,
}

impl MetricsSnapshot {
    /// Render in Prometheus text exposition format.
    pub fn render(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "# HELP {REQUESTS_TOTAL} Total HTTP requests by method, route and status class.")?;
        writeln!(out, "# TYPE {REQUESTS_TOTAL} counter")?;
        for ((key, class), val) in &self.requests {
            writeln!(
                out,
                "{REQUESTS_TOTAL}{{{},status_class=\"{}\"}} {}",
                key.labels(),
                class,
                val
            )?;
        }

        writeln!(out, "# HELP {REQUEST_DURATION} HTTP request latency by method and route.")?;
        writeln!(out, "# TYPE {REQUEST_DURATION} histogram")?;
        for (key, hist) in &self.latency {
            let labels = key.labels();
            for (le, count) in self.bounds_micros.iter().zip(&hist.buckets) {
                writeln!(
                    out,
                    "{REQUEST_DURATION}_bucket{{{labels},le=\"{}\"}} {count}",
                    micros_to_seconds(*le)
                )?;
            }
            writeln!(out, "{REQUEST_DURATION}_bucket{{{labels},le=\"+Inf\"}} {}", hist.count)?;
            writeln!(
                out,
                "{REQUEST_DURATION}_sum{{{labels}}} {}",
                micros_to_seconds(hist.sum_micros)
            )?;
            writeln!(out, "{REQUEST_DURATION}_count{{{labels}}} {}", hist.count)?;
        }
        Ok(())
    }
}

pub struct HttpMetrics {
    requests: RequestCounter,
    latency: LatencyHistogram,
    commit: RwLock<()>,
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new(seconds_to_micros(&DEFAULT_BUCKETS_SECONDS))
    }
}

impl HttpMetrics {
    /// Build a registry with the given histogram upper bounds (microseconds, ascending).
    pub fn new(bounds_micros: Vec<u64>) -> Self {
        Self {
            requests: RequestCounter::default(),
            latency: LatencyHistogram::new(bounds_micros),
            commit: RwLock::new(()),
        }
    }

    /// Commit one finished request: counter increment plus latency observation.
    pub fn record(&self, method: &'static str, route: &str, class: StatusClass, elapsed: Duration) {
        let key = RouteKey {
            method,
            route: route.to_owned(),
        };
        let _commit = self.commit.read();
        self.requests.inc(key.clone(), class);
        self.latency.observe(key, elapsed);
    }

    /// Consistent copy of every series.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let _commit = self.commit.write();
        MetricsSnapshot {
            bounds_micros: self.latency.bounds_micros.to_vec(),
            requests: self.requests.snapshot(),
            latency: self.latency.snapshot(),
        }
    }

    /// Render all registered metrics plus any extra gauges provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> Result<String> {
        let snapshot = self.snapshot();
        let mut out = String::new();
        snapshot.render(&mut out)?;
        for (name, v) in extra {
            writeln!(out, "# TYPE {name} gauge\n{name} {v}")?;
        }
        Ok(out)
    }

    /// Current request count for one series (0 if never seen).
    pub fn request_count(&self, method: &'static str, route: &str, class: StatusClass) -> u64 {
        let key = (
            RouteKey {
                method,
                route: route.to_owned(),
            },
            class,
        );
        self.requests
            .map
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

/// Convert second-based bucket bounds into integer microseconds.
pub fn seconds_to_micros(bounds: &[f64]) -> Vec<u64> {
    bounds.iter().map(|s| (s * 1_000_000.0).round() as u64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_commits_counter_and_histogram_together() {
        let m = HttpMetrics::default();
        m.record("GET", "/hello/:name", StatusClass::Success, Duration::from_millis(3));
        m.record("GET", "/hello/:name", StatusClass::Success, Duration::from_millis(30));
        m.record("GET", "/hello/:name", StatusClass::ClientError, Duration::from_millis(1));

        let snap = m.snapshot();
        let total: u64 = snap.requests.iter().map(|(_, v)| v).sum();
        assert_eq!(total, 3);
        assert_eq!(snap.latency.len(), 1);
        assert_eq!(snap.latency[0].1.count, 3);
        assert_eq!(m.request_count("GET", "/hello/:name", StatusClass::Success), 2);
    }

    #[test]
    fn buckets_are_cumulative() {
        let m = HttpMetrics::new(vec![1_000, 10_000, 100_000]);
        m.record("GET", "/", StatusClass::Success, Duration::from_micros(500));
        m.record("GET", "/", StatusClass::Success, Duration::from_millis(5));
        m.record("GET", "/", StatusClass::Success, Duration::from_secs(2));

        let snap = m.snapshot();
        let hist = &snap.latency[0].1;
        assert_eq!(hist.buckets, vec![1, 2, 2]);
        assert_eq!(hist.count, 3);
        assert_eq!(hist.sum_micros, 500 + 5_000 + 2_000_000);
    }

    #[test]
    fn render_uses_seconds_and_stable_labels() {
        let m = HttpMetrics::new(vec![5_000, 1_000_000]);
        m.record("GET", "/page", StatusClass::Success, Duration::from_millis(2));

        let body = m.render(&[("simpleweb_ready", 1)]).unwrap();
        assert!(body.contains(
            "http_requests_total{method=\"GET\",route=\"/page\",status_class=\"2xx\"} 1"
        ));
        assert!(body.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",route=\"/page\",le=\"0.005\"} 1"
        ));
        assert!(body.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",route=\"/page\",le=\"1\"} 1"
        ));
        assert!(body.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",route=\"/page\",le=\"+Inf\"} 1"
        ));
        assert!(body.contains("http_request_duration_seconds_sum{method=\"GET\",route=\"/page\"} 0.002"));
        assert!(body.contains("# TYPE simpleweb_ready gauge\nsimpleweb_ready 1"));
    }

    #[test]
    fn label_values_are_escaped() {
        let m = HttpMetrics::default();
        m.record("GET", "/a\"b", StatusClass::Success, Duration::ZERO);
        let body = m.render(&[]).unwrap();
        assert!(body.contains("route=\"/a\\\"b\""));
    }

    #[test]
    fn seconds_convert_to_micros() {
        assert_eq!(seconds_to_micros(&[0.005, 1.0, 2.5]), vec![5_000, 1_000_000, 2_500_000]);
    }
}
