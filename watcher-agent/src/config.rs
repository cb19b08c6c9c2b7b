//! Configuration for the capture agent.

use std::path::Path;

use serde::{Deserialize, Serialize};
use watcher_core::config;
use watcher_core::{
    ConfigFallback, DEFAULT_AGENT_PORT, DEFAULT_JPEG_QUALITY, Encoder, LoggingConfig, WidthBand,
};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Display capture settings.
    pub capture: CaptureConfig,
    /// Image encoding settings.
    pub encoding: EncodingConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP port for the HTTP server, on all interfaces.
    pub listen_port: u16,
}

/// Where frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureBackend {
    /// The host's real displays. Needs the `native-capture` feature.
    Native,
    /// One generated 1920×1080 gradient display, for dry runs.
    Synthetic,
}

/// Display capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub backend: CaptureBackend,
    /// Display to capture (0 = primary).
    pub display_index: usize,
    /// Funnel every capture through one worker thread. Turn off only for
    /// backends known to be thread-safe.
    pub serialize: bool,
    /// Smallest width honoured as a resize request.
    pub min_width: u32,
    /// Largest width honoured as a resize request.
    pub max_width: u32,
}

/// Image encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_AGENT_PORT,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            backend: CaptureBackend::Native,
            display_index: 0,
            serialize: true,
            min_width: WidthBand::DEFAULT.min,
            max_width: WidthBand::DEFAULT.max,
        }
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl AgentConfig {
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

    /// The acceptance band for `width`. An inverted band is swapped.
    pub fn width_band(&self) -> WidthBand {
        let (min, max) = (self.capture.min_width, self.capture.max_width);
        WidthBand::new(min.min(max), min.max(max))
    }

    pub fn encoder(&self) -> Encoder {
        Encoder::new(self.encoding.jpeg_quality)
    }
}

// ── Tests ────────────────────────────────────────────────────────
