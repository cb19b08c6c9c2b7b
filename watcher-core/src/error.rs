//! Domain-specific error types for the watcher services.
//!
//! Every failure is handled at the HTTP boundary where it occurs and is
//! translated to a status code by [`WatcherError::status_code`]. Error
//! detail is logged, never written to the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

// ── CaptureError ─────────────────────────────────────────────────

/// Failure to obtain pixels from a display.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The host reports zero active displays.
    #[error("no active display")]
    NoDisplay,

    /// The requested display index is past the last active display.
    #[error("display {index} does not exist ({count} active)")]
    InvalidDisplayIndex { index: usize, count: usize },

    /// The OS-level capture call failed (e.g. a remote desktop session
    /// that is not attached, so the screen buffer cannot be read).
    #[error("capture backend failed: {0}")]
    Backend(String),

    /// A backend returned a pixel buffer whose length does not match its
    /// dimensions.
    #[error("malformed pixel buffer: expected {expected} bytes, got {actual}")]
    MalformedBuffer { expected: usize, actual: usize },

    /// The dedicated capture worker thread is no longer running.
    #[error("capture worker is not running")]
    WorkerGone,
}

// ── ScaleError ───────────────────────────────────────────────────

/// Failure inside the resampler.
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("image buffer error: {0}")]
    ImageBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("resize error: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    /// The resampler produced a buffer of the wrong length.
    #[error("resized buffer rejected: {0}")]
    Output(#[from] CaptureError),
}

// ── WatcherError ─────────────────────────────────────────────────

/// The canonical error type for both services.
#[derive(Debug, Error)]
pub enum WatcherError {
    // ── Request validation ───────────────────────────────────────
    /// A required query parameter was missing or empty.
    #[error("missing required parameter `{0}`")]
    Validation(&'static str),

    // ── Capture agent ────────────────────────────────────────────
    /// No display, display index out of range, or OS capture failure.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(#[from] CaptureError),

    /// Resampling failed. Not expected for well-formed buffers.
    #[error("scaling failed: {0}")]
    Scale(#[from] ScaleError),

    /// Container encoding failed. Not expected for well-formed buffers.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// A blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    // ── Gateway ──────────────────────────────────────────────────
    /// The backend could not be reached (connection refused, DNS, timeout)
    /// or its body could not be read.
    #[error("backend {url} unreachable: {cause}")]
    BackendUnreachable { url: String, cause: String },

    /// The backend answered with something other than 200.
    #[error("backend {url} answered {status}")]
    BackendUnhealthy { url: String, status: u16 },

    // ── Local system ─────────────────────────────────────────────
    /// The local hostname could not be determined.
    #[error("hostname lookup failed: {0}")]
    LocalSystem(String),

    // ── Startup ──────────────────────────────────────────────────
    /// A listen port outside `[0, 65535]`.
    #[error("port {0} is outside 0..=65535")]
    InvalidPort(i64),

    /// Socket or file I/O.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatcherError {
    /// The HTTP status this error is surfaced as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::CaptureUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::LocalSystem(_) => StatusCode::FORBIDDEN,
            Self::BackendUnreachable { .. }
            | Self::BackendUnhealthy { .. }
            | Self::Scale(_)
            | Self::Encoding(_)
            | Self::Join(_)
            | Self::InvalidPort(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WatcherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Validation(field) => warn!(field, "rejected request"),
            Self::CaptureUnavailable(e) => warn!("error occurred in screen capture: {e}"),
            Self::BackendUnreachable { url, cause } => {
                error!(%url, %cause, "backend unreachable");
            }
            Self::BackendUnhealthy { url, status } => {
                error!(%url, status, "backend returned non-OK status");
            }
            Self::LocalSystem(e) => warn!("hostname lookup failed: {e}"),
            other => error!("internal error: {other}"),
        }
        status.into_response()
    }
}

// ── Tests ────────────────────────────────────────────────────────
