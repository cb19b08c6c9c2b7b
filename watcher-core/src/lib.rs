//! # watcher-core
//!
//! Shared library for the watcher services: a Capture Agent that serves
//! snapshots of the local display over HTTP, and a Forwarding Gateway that
//! relays those snapshots from agents chosen per request.
//!
//! This crate contains:
//! - **Capture**: `DisplayProvider` capability, `grab_display`, capture
//!   scheduling (`SharedCapture`, `CaptureWorker`)
//! - **Scale**: aspect-preserving bilinear downscaling
//! - **Encode**: JPEG / PNG containers (`Encoder`, `EncodedImage`)
//! - **Params**: validate-or-reject / validate-or-default query policies,
//!   `WidthBand`, `ProxyRequest`
//! - **Server**: listener, graceful shutdown, `/hostname`
//! - **Config**: TOML loading with a reported fallback to defaults
//! - **Logging**: `tracing-subscriber` setup
//! - **Error**: `WatcherError` and its HTTP status mapping

pub mod capture;
pub mod config;
pub mod encode;
pub mod error;
pub mod logging;
pub mod params;
pub mod scale;
pub mod server;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use capture::{
    CaptureRequest, CaptureSource, CaptureWorker, DisplayBounds, DisplayProvider, Headless,
    PixelBuffer, SharedCapture, SyntheticDisplays,
};
pub use config::ConfigFallback;
pub use encode::{DEFAULT_JPEG_QUALITY, EncodedImage, Encoder, ImageFormat};
pub use error::{CaptureError, ScaleError, WatcherError};
pub use logging::LoggingConfig;
pub use params::{DEFAULT_AGENT_PORT, DEFAULT_GATEWAY_PORT, ProxyRequest, WidthBand};
