//! OS screen capture via `xcap`.
//!
//! Monitors are re-enumerated on every call; no handle outlives a request.
//!
//! # Platform
//!
//! Compiled only with the `xcap` feature. Without it the agent falls back
//! to [`Headless`](super::Headless), which reports zero displays.

use xcap::Monitor;

use crate::capture::provider::DisplayProvider;
use crate::capture::types::{DisplayBounds, PixelBuffer};
use crate::error::CaptureError;

/// The host's real monitors.
///
/// `xcap` makes no thread-safety promise for overlapping grabs, so the
/// agent drives this provider through the capture worker by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDisplays;

impl NativeDisplays {
    fn monitors() -> Result<Vec<Monitor>, CaptureError> {
        Monitor::all().map_err(|e| CaptureError::Backend(format!("monitor enumeration failed: {e}")))
    }
}

impl DisplayProvider for NativeDisplays {
    fn displays(&self) -> Result<Vec<DisplayBounds>, CaptureError> {
        Ok(Self::monitors()?
            .iter()
            .map(|m| DisplayBounds::from_origin(m.x(), m.y(), m.width(), m.height()))
            .collect())
    }

    fn capture_rect(
        &self,
        index: usize,
        _bounds: DisplayBounds,
    ) -> Result<PixelBuffer, CaptureError> {
        let monitors = Self::monitors()?;
        let count = monitors.len();
        let monitor = monitors
            .into_iter()
            .nth(index)
            .ok_or(CaptureError::InvalidDisplayIndex { index, count })?;

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(format!("capture of display {index} failed: {e}")))?;
        Ok(PixelBuffer::from_rgba_image(image))
    }
}
