//! Build and runtime report served on `/info`.

use std::time::Duration;

use serde::Serialize;

const UNSET: &str = "unset";

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub host_name: String,
    pub listen: String,
    pub program: String,
    pub build_time: String,
    pub commit: String,
    pub version: String,
    pub rust_version: String,
}

impl BuildInfo {
    /// Collect build metadata baked in at compile time plus the host we run on.
    pub fn detect(listen: &str) -> Self {
        Self {
            host_name: host_name(),
            listen: listen.to_owned(),
            program: program_name(),
            build_time: option_env!("SIMPLEWEB_BUILD_TIME").unwrap_or(UNSET).to_owned(),
            commit: option_env!("SIMPLEWEB_COMMIT").unwrap_or(UNSET).to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            rust_version: option_env!("SIMPLEWEB_RUSTC_VERSION").unwrap_or(UNSET).to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InfoReport<'a> {
    #[serde(flatten)]
    pub build: &'a BuildInfo,
    pub run_time: String,
}

fn host_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_owned())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn program_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
}

/// Uptime rounded to whole seconds, e.g. `1h2m3s`.
pub fn format_uptime(d: Duration) -> String {
    let secs = d.as_secs() + u64::from(d.subsec_millis() >= 500);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m{s}s"),
        _ => format!("{h}h{m}m{s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_rounds_to_seconds() {
        assert_eq!(format_uptime(Duration::ZERO), "0s");
        assert_eq!(format_uptime(Duration::from_millis(1_499)), "1s");
        assert_eq!(format_uptime(Duration::from_millis(1_500)), "2s");
        assert_eq!(format_uptime(Duration::from_secs(61)), "1m1s");
        assert_eq!(format_uptime(Duration::from_secs(3_723)), "1h2m3s");
    }
}
