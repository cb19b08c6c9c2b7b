//! Gateway configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use watcher_core::config;
use watcher_core::{ConfigFallback, DEFAULT_AGENT_PORT, DEFAULT_GATEWAY_PORT, LoggingConfig};

/// Top-level configuration for the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Capture agent defaults.
    pub backend: BackendConfig,
    /// Static browser UI.
    pub assets: AssetsConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP port for the HTTP server, on all interfaces.
    pub listen_port: u16,
}

/// Capture agent defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Agent port used when a request's `port` is missing or invalid.
    pub default_port: u16,
}

/// Static file serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Serve `dir` for paths no route matches.
    pub enabled: bool,
    /// Directory holding the browser UI.
    pub dir: PathBuf,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_GATEWAY_PORT,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_AGENT_PORT,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("assets"),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl GatewayConfig {
    /// Load from TOML, falling back to defaults. The fallback reason is
    /// returned for logging once the subscriber is installed.
    pub fn load(path: &Path) -> (Self, Option<ConfigFallback>) {
        config::load_or_default(path)
    }

    /// Write the default configuration to a file.
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let text = toml::to_string_pretty(&Self::default()).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }

    /// The asset directory to serve, if enabled and present on disk.
    pub fn asset_dir(&self) -> Option<&Path> {
        let dir = self.assets.dir.as_path();
        (self.assets.enabled && dir.is_dir()).then_some(dir)
    }
}
