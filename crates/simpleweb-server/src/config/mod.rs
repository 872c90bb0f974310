//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use simpleweb_core::error::{Result, WebError};

pub use schema::{MetricsSection, ServerConfig, ServerSection};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "simpleweb.yaml";
/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "SIMPLEWEB_CONFIG";

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| WebError::BadConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| WebError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
pub fn load_or_default(path: &str) -> Result<ServerConfig> {
    if Path::new(path).exists() {
        return load_from_file(path);
    }
    tracing::warn!(%path, "config file not found, using defaults");
    let cfg = ServerConfig::default();
    cfg.validate()?;
    Ok(cfg)
}
