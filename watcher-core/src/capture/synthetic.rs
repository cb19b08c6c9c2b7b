//! Deterministic in-memory displays.
//!
//! Used by tests and by the agent's `synthetic` backend for dry runs on
//! machines without a capturable screen.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::capture::provider::DisplayProvider;
use crate::capture::types::{BYTES_PER_PIXEL, DisplayBounds, PixelBuffer};
use crate::error::CaptureError;

/// A fixed set of displays that render a gradient test pattern.
///
/// Red ramps left → right, green ramps top → bottom and blue encodes the
/// display index, so scaled output can be checked for orientation.
#[derive(Debug, Default)]
pub struct SyntheticDisplays {
    displays: Vec<DisplayBounds>,
    failure: Option<String>,
    captures: AtomicUsize,
}

impl SyntheticDisplays {
    pub fn new(displays: Vec<DisplayBounds>) -> Self {
        Self {
            displays,
            failure: None,
            captures: AtomicUsize::new(0),
        }
    }

    /// One display with its origin at `(0, 0)`.
    pub fn single(width: u32, height: u32) -> Self {
        Self::new(vec![DisplayBounds::from_origin(0, 0, width, height)])
    }

    /// Displays that enumerate fine but whose pixel reads fail, like a
    /// detached remote desktop session.
    pub fn failing(displays: Vec<DisplayBounds>, reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(displays)
        }
    }

    /// Number of pixel reads attempted so far.
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn render(index: usize, width: u32, height: u32) -> Result<PixelBuffer, CaptureError> {
        let blue = u8::try_from(index.saturating_mul(64)).unwrap_or(u8::MAX);
        let mut data = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for y in 0..height {
            let green = ramp(y, height);
            for x in 0..width {
                data.extend_from_slice(&[ramp(x, width), green, blue, 0xFF]);
            }
        }
        PixelBuffer::new(width, height, data)
    }
}

fn ramp(pos: u32, len: u32) -> u8 {
    if len <= 1 {
        return 0;
    }
    u8::try_from(u64::from(pos) * 255 / u64::from(len - 1)).unwrap_or(u8::MAX)
}

impl DisplayProvider for SyntheticDisplays {
    fn displays(&self) -> Result<Vec<DisplayBounds>, CaptureError> {
        Ok(self.displays.clone())
    }

    fn capture_rect(
        &self,
        index: usize,
        bounds: DisplayBounds,
    ) -> Result<PixelBuffer, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.failure {
            return Err(CaptureError::Backend(reason.clone()));
        }
        Self::render(index, bounds.width(), bounds.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_corners() {
        let provider = SyntheticDisplays::single(16, 8);
        let frame = provider
            .capture_rect(0, DisplayBounds::new(0, 0, 16, 8))
            .unwrap();
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(15, 7), Some([255, 255, 0, 255]));
    }
}
