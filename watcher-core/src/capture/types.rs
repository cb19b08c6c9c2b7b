//! Shared types for the capture → scale → encode pipeline.
//!
//! Buffers are short-lived: created by a capture, consumed by scaling or
//! encoding, and dropped before the request that produced them completes.

use image::RgbaImage;

use crate::error::CaptureError;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

// ── DisplayBounds ────────────────────────────────────────────────

/// One physical display's rectangle in desktop coordinates.
///
/// The origin may be negative when a display sits left of or above the
/// primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl DisplayBounds {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds from an origin and a size, as monitor APIs usually report them.
    pub fn from_origin(x: i32, y: i32, width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Width in pixels (0 for a degenerate rectangle).
    pub fn width(&self) -> u32 {
        span(self.min_x, self.max_x)
    }

    /// Height in pixels (0 for a degenerate rectangle).
    pub fn height(&self) -> u32 {
        span(self.min_y, self.max_y)
    }
}

fn span(min: i32, max: i32) -> u32 {
    u32::try_from(i64::from(max) - i64::from(min)).unwrap_or(0)
}

// ── CaptureRequest ───────────────────────────────────────────────

/// What one inbound capture call asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Zero-based display index.
    pub display_index: usize,
    /// Target width; `0` keeps the native resolution.
    pub requested_width: u32,
}

impl CaptureRequest {
    pub const fn new(display_index: usize, requested_width: u32) -> Self {
        Self {
            display_index,
            requested_width,
        }
    }

    /// Native-resolution capture of `display_index`.
    pub const fn native(display_index: usize) -> Self {
        Self::new(display_index, 0)
    }
}

// ── PixelBuffer ──────────────────────────────────────────────────

/// A `width × height` grid of RGBA8 pixels, row-major, origin top-left,
/// tightly packed (no row padding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking that the length matches the size.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = Self::byte_len_for(width, height);
        if data.len() != expected {
            return Err(CaptureError::MalformedBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(Self::byte_len_for(width, height))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Adopt an `image` crate RGBA buffer without copying.
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    /// Packed RGB8 bytes, alpha dropped in place. The RGBA allocation is
    /// reused, so no second frame-sized buffer is created.
    pub fn into_rgb8(self) -> Vec<u8> {
        let mut data = self.data;
        let pixels = data.len() / BYTES_PER_PIXEL;
        for i in 0..pixels {
            let src = i * BYTES_PER_PIXEL;
            data.copy_within(src..src + 3, i * 3);
        }
        data.truncate(pixels * 3);
        data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// The RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.data[offset..offset + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    fn byte_len_for(width: u32, height: u32) -> usize {
        width as usize * height as usize * BYTES_PER_PIXEL
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_with_negative_origin() {
        // A display left of and above the primary one.
        let b = DisplayBounds::new(-1280, -1024, 0, 0);
        assert_eq!(b.width(), 1280);
        assert_eq!(b.height(), 1024);

        let b = DisplayBounds::from_origin(-1920, 0, 1920, 1080);
        assert_eq!(b, DisplayBounds::new(-1920, 0, 0, 1080));
    }

    #[test]
    fn degenerate_bounds_have_zero_size() {
        let b = DisplayBounds::new(10, 10, 5, 5);
        assert_eq!(b.width(), 0);
        assert_eq!(b.height(), 0);
    }

    #[test]
    fn pixel_buffer_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::MalformedBuffer {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn pixel_lookup() {
        let mut data = vec![0u8; 3 * 2 * 4];
        // (2, 1) is the last pixel.
        data[20..24].copy_from_slice(&[1, 2, 3, 4]);
        let buf = PixelBuffer::new(3, 2, data).unwrap();
        assert_eq!(buf.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(3, 0), None);
    }

    #[test]
    fn filled_and_image_conversion() {
        let buf = PixelBuffer::filled(4, 3, [9, 8, 7, 255]);
        assert_eq!(buf.as_bytes().len(), 48);
        let image = RgbaImage::from_raw(4, 3, buf.as_bytes().to_vec()).unwrap();
        assert_eq!(PixelBuffer::from_rgba_image(image), buf);
    }

    #[test]
    fn rgb_conversion_drops_alpha() {
        let mut data = vec![0u8; 3 * 2 * 4];
        data[0..4].copy_from_slice(&[1, 2, 3, 4]);
        data[20..24].copy_from_slice(&[250, 251, 252, 0]);
        let rgb = PixelBuffer::new(3, 2, data).unwrap().into_rgb8();
        assert_eq!(rgb.len(), 3 * 2 * 3);
        assert_eq!(&rgb[0..3], &[1, 2, 3]);
        assert_eq!(&rgb[15..18], &[250, 251, 252]);
    }

    #[test]
    fn rgb_conversion_reuses_allocation() {
        let buf = PixelBuffer::filled(64, 48, [10, 20, 30, 255]);
        let before = buf.as_bytes().as_ptr();
        let rgb = buf.into_rgb8();
        assert_eq!(rgb.as_ptr(), before);
        assert!(rgb.chunks_exact(3).all(|px| px == [10, 20, 30]));
    }
}
