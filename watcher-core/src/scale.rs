//! Aspect-preserving downscaling.
//!
//! Width drives the resize; height follows the source aspect ratio. The
//! filter is a separable bilinear convolution, approximate rather than exact.

use fast_image_resize as fir;
use fir::images::Image;
use fir::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use tracing::trace;

use crate::capture::types::PixelBuffer;
use crate::error::ScaleError;

/// Height of a `dst_width`-wide image with the aspect ratio of
/// `src_width × src_height`.
///
/// Computed as `round(dst_width * src_height / src_width)` with ties
/// rounded away from zero. Never returns 0 for a non-empty source.
pub fn scaled_height(src_width: u32, src_height: u32, dst_width: u32) -> u32 {
    if src_width == 0 || src_height == 0 || dst_width == 0 {
        return 0;
    }
    let exact = f64::from(dst_width) * f64::from(src_height) / f64::from(src_width);
    // Bounded by dst_width * src_height / src_width, so it fits in u32.
    (exact.round() as u32).max(1)
}

/// Resize `source` to `dst_width` pixels wide.
///
/// Returns `source` untouched, without allocating, when `dst_width` is 0
/// or already equals the native width.
pub fn scale_to_width(source: PixelBuffer, dst_width: u32) -> Result<PixelBuffer, ScaleError> {
    let (src_width, src_height) = (source.width(), source.height());
    if dst_width == 0 || dst_width == src_width || src_width == 0 || src_height == 0 {
        return Ok(source);
    }
    let dst_height = scaled_height(src_width, src_height, dst_width);
    trace!(src_width, src_height, dst_width, dst_height, "scaling frame");

    let src_image = Image::from_vec_u8(src_width, src_height, source.into_vec(), PixelType::U8x4)?;
    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let options = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
        .use_alpha(false);
    Resizer::new().resize(&src_image, &mut dst_image, &options)?;

    // The source allocation is released here, before encoding starts.
    drop(src_image);

    Ok(PixelBuffer::new(dst_width, dst_height, dst_image.into_vec())?)
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_follows_aspect_ratio() {
        assert_eq!(scaled_height(1920, 1080, 960), 540);
        assert_eq!(scaled_height(1920, 1080, 1280), 720);
        assert_eq!(scaled_height(1920, 1200, 160), 100);
        // 160 * 768 / 1366 = 89.956…
        assert_eq!(scaled_height(1366, 768, 160), 90);
        // 2 * 3 / 4 = 1.5 rounds away from zero.
        assert_eq!(scaled_height(4, 3, 2), 2);
    }

    #[test]
    fn height_never_collapses_to_zero() {
        assert_eq!(scaled_height(4000, 1, 160), 1);
        assert_eq!(scaled_height(0, 1080, 160), 0);
    }

    #[test]
    fn zero_width_keeps_native_resolution() {
        let frame = PixelBuffer::filled(320, 200, [1, 2, 3, 255]);
        let out = scale_to_width(frame.clone(), 0).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn native_width_is_a_no_op() {
        let frame = PixelBuffer::filled(320, 200, [1, 2, 3, 255]);
        let out = scale_to_width(frame.clone(), 320).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn downscale_dimensions_and_content() {
        let frame = PixelBuffer::filled(1920, 1080, [200, 100, 50, 255]);
        let out = scale_to_width(frame, 960).unwrap();
        assert_eq!((out.width(), out.height()), (960, 540));
        // A flat colour stays flat through a bilinear filter, give or take
        // fixed-point rounding.
        for (x, y) in [(0, 0), (480, 270), (959, 539)] {
            let px = out.pixel(x, y).unwrap();
            for (got, want) in px.iter().zip([200u8, 100, 50, 255]) {
                assert!(got.abs_diff(want) <= 1, "({x}, {y}): {px:?}");
            }
        }
    }
}
