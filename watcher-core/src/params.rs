//! Query-parameter policies shared by the agent and the gateway.
//!
//! Two policies, applied per field:
//!
//! - **validate-or-reject**: the field is required; a missing or empty value
//!   fails the request with [`WatcherError::Validation`] (400).
//! - **validate-or-default**: the field is optional; a missing, non-numeric
//!   or out-of-range value is silently replaced by its default.
//!
//! Integers parse like a decimal `i64` (optional sign, no whitespace).
//! Query strings are kept as ordered pairs; when a key repeats, its first
//! value wins.

use std::ops::RangeInclusive;

use crate::error::WatcherError;

/// Port a Capture Agent listens on unless told otherwise.
pub const DEFAULT_AGENT_PORT: u16 = 3400;

/// Port a Forwarding Gateway listens on unless told otherwise.
pub const DEFAULT_GATEWAY_PORT: u16 = 80;

/// Decoded query pairs in request order.
pub type QueryPairs = [(String, String)];

/// The first value given for `name`.
pub fn first<'a>(query: &'a QueryPairs, name: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

// ── validate-or-default ──────────────────────────────────────────

/// A decimal integer, or `0` when absent or unparsable.
pub fn int_or_zero(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok()).unwrap_or(0)
}

/// A port in `[0, 65535]`, or `default` when absent, unparsable or out of
/// range.
pub fn port_or_default(raw: Option<&str>, default: u16) -> u16 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .and_then(|v| u16::try_from(v).ok())
        .unwrap_or(default)
}

// ── validate-or-reject ───────────────────────────────────────────

/// The value of a required, non-empty field.
pub fn required<'a>(raw: Option<&'a str>, field: &'static str) -> Result<&'a str, WatcherError> {
    match raw {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(WatcherError::Validation(field)),
    }
}

/// Validate a listen port given at startup. Unlike request fields this is
/// a hard error: the process must not bind anything.
pub fn listen_port(value: i64) -> Result<u16, WatcherError> {
    u16::try_from(value).map_err(|_| WatcherError::InvalidPort(value))
}

// ── WidthBand ────────────────────────────────────────────────────

/// Widths accepted as an explicit resize request.
///
/// Anything outside the band, including 0, negatives and non-numeric input,
/// means native resolution. The band is advisory: it never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthBand {
    pub min: u32,
    pub max: u32,
}

impl WidthBand {
    /// 160 – 1280 px: readable thumbnails of HD–FHD screens for periodic
    /// low-bandwidth monitoring.
    pub const DEFAULT: WidthBand = WidthBand::new(160, 1280);

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    /// The requested width, or `0` (native) when outside the band.
    pub fn normalize(&self, raw: Option<&str>) -> u32 {
        u32::try_from(int_or_zero(raw))
            .ok()
            .filter(|w| self.range().contains(w))
            .unwrap_or(0)
    }
}

impl Default for WidthBand {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── ProxyRequest ─────────────────────────────────────────────────

/// A validated gateway request naming one Capture Agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub host: String,
    pub port: u16,
    pub width: i64,
    /// Forwarded untouched; browsers use it as a cache buster.
    pub count: i64,
}

impl ProxyRequest {
    /// Apply both policies to a query string: `host` is rejected when
    /// missing, everything else falls back to its default.
    pub fn from_query(query: &QueryPairs, default_port: u16) -> Result<Self, WatcherError> {
        let field = |name: &str| first(query, name);
        let host = required(field("host"), "host")?.to_owned();

        Ok(Self {
            host,
            port: port_or_default(field("port"), default_port),
            width: int_or_zero(field("width")),
            count: int_or_zero(field("count")),
        })
    }

    /// `http://{host}:{port}/screenjpeg?width={width}&count={count}`
    pub fn screen_jpeg_url(&self) -> String {
        format!(
            "http://{}:{}/screenjpeg?width={}&count={}",
            self.host, self.port, self.width, self.count
        )
    }

    /// `http://{host}:{port}/hostname`
    pub fn hostname_url(&self) -> String {
        format!("http://{}:{}/hostname", self.host, self.port)
    }
}

// ── Tests ────────────────────────────────────────────────────────
