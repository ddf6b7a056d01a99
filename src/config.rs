//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::params::{validate_size, Symbology, DEFAULT_SIZE};

/// Largest icon accepted from an upload or URL, in bytes.
pub const DEFAULT_MAX_ICON_BYTES: usize = 5 << 20;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Default generation parameters.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// HTTP server settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on. `PORT` in the environment takes precedence.
    pub port: u16,
    /// Upper bound for icon bytes, uploaded or fetched.
    pub max_icon_bytes: usize,
    /// Timeout for fetching an icon by URL, in seconds.
    pub icon_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_icon_bytes: DEFAULT_MAX_ICON_BYTES,
            icon_timeout_secs: 10,
        }
    }
}

/// Default generation parameters.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Canvas size in pixels when a request has none.
    pub size: u32,
    /// Symbology used by `generate` when `--kind` is not given.
    pub kind: Symbology,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE, kind: Symbology::Qr }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default size is out of range.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
        validate_size(config.defaults.size)
            .map_err(|e| format!("Invalid defaults.size in {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Listen port, preferring the `PORT` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number.
    pub fn port(&self) -> Result<u16, String> {
        match std::env::var("PORT").ok().map(|p| p.trim().to_string()) {
            Some(p) if !p.is_empty() => {
                p.parse().map_err(|_| format!("PORT must be a port number, got '{p}'"))
            }
            _ => Ok(self.server.port),
        }
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `QRMINT_CONFIG` environment variable
/// 3. `~/.config/qrmint/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("QRMINT_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/qrmint/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/qrmint/config.toml")
    } else {
        PathBuf::from("qrmint.toml")
    }
}
