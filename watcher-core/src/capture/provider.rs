//! The display capability the capture pipeline reads from.
//!
//! The OS capture subsystem is injected as a [`DisplayProvider`] so the
//! pipeline never touches ambient global state and tests can substitute
//! synthetic displays.
//!
//! # Thread safety
//!
//! A provider is only required to be `Send`. Providers that are also `Sync`
//! may be called concurrently through [`SharedCapture`](super::SharedCapture);
//! anything else goes through the single-owner
//! [`CaptureWorker`](super::CaptureWorker), which serialises every call.

use std::sync::Arc;

use tracing::trace;

use crate::capture::types::{DisplayBounds, PixelBuffer};
use crate::error::CaptureError;

/// Enumerates active displays and reads their pixels.
pub trait DisplayProvider: Send + 'static {
    /// Bounds of every active display, in index order.
    fn displays(&self) -> Result<Vec<DisplayBounds>, CaptureError>;

    /// Read the full rectangle of display `index`.
    ///
    /// `bounds` is what [`displays`](Self::displays) reported a moment ago;
    /// the display may have changed resolution since.
    fn capture_rect(
        &self,
        index: usize,
        bounds: DisplayBounds,
    ) -> Result<PixelBuffer, CaptureError>;
}

/// Capture the whole of display `index`.
///
/// Nothing is cached between calls: every call enumerates afresh and reads
/// the current frame. The bounds lookup and the pixel read are not atomic.
pub fn grab_display<P>(provider: &P, index: usize) -> Result<PixelBuffer, CaptureError>
where
    P: DisplayProvider + ?Sized,
{
    let displays = provider.displays()?;
    let count = displays.len();
    if count == 0 {
        return Err(CaptureError::NoDisplay);
    }
    let bounds = *displays
        .get(index)
        .ok_or(CaptureError::InvalidDisplayIndex { index, count })?;

    trace!(
        index,
        width = bounds.width(),
        height = bounds.height(),
        "capturing display"
    );
    provider.capture_rect(index, bounds)
}

impl<P: DisplayProvider + Sync> DisplayProvider for Arc<P> {
    fn displays(&self) -> Result<Vec<DisplayBounds>, CaptureError> {
        P::displays(self)
    }

    fn capture_rect(
        &self,
        index: usize,
        bounds: DisplayBounds,
    ) -> Result<PixelBuffer, CaptureError> {
        P::capture_rect(self, index, bounds)
    }
}

// ── Headless ─────────────────────────────────────────────────────

/// A host without any capturable display.
///
/// Stands in for the native backend when it is not compiled in, so every
/// capture reports [`CaptureError::NoDisplay`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl DisplayProvider for Headless {
    fn displays(&self) -> Result<Vec<DisplayBounds>, CaptureError> {
        Ok(Vec::new())
    }

    fn capture_rect(
        &self,
        _index: usize,
        _bounds: DisplayBounds,
    ) -> Result<PixelBuffer, CaptureError> {
        Err(CaptureError::NoDisplay)
    }
}

// ── Tests ────────────────────────────────────────────────────────
