//! Container encoding for captured frames.
//!
//! - **JPEG**: lossy, fixed quality (50 by default) to keep frequent polling
//!   cheap on bandwidth. The alpha channel is dropped in place, without a
//!   second frame-sized buffer.
//! - **PNG**: lossless, default compression. Diagnostic path only.
//!
//! Encoding a well-formed [`PixelBuffer`] is not expected to fail; an
//! error here is a defect, not a retryable condition.

use std::fmt;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::capture::types::PixelBuffer;
use crate::error::WatcherError;

/// JPEG quality used when nothing overrides it.
pub const DEFAULT_JPEG_QUALITY: u8 = 50;

// ── ImageFormat ──────────────────────────────────────────────────

/// Supported output containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub const fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "jpeg"),
            ImageFormat::Png => write!(f, "png"),
        }
    }
}

// ── EncodedImage ─────────────────────────────────────────────────

/// Encoded bytes, sent over HTTP as-is.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub format: ImageFormat,
    pub bytes: Bytes,
}

impl IntoResponse for EncodedImage {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.format.mime_type())], self.bytes).into_response()
    }
}

// ── Encoder ──────────────────────────────────────────────────────

/// Serialises pixel buffers into a container.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    jpeg_quality: u8,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl Encoder {
    /// An encoder with JPEG quality `jpeg_quality`, clamped to `1..=100`.
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Encode `buffer`, consuming it.
    pub fn encode(
        &self,
        buffer: PixelBuffer,
        format: ImageFormat,
    ) -> Result<EncodedImage, WatcherError> {
        let mut out = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let (width, height) = (buffer.width(), buffer.height());
                let rgb = buffer.into_rgb8();
                JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
                    .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| WatcherError::Encoding(e.to_string()))?;
            }
            ImageFormat::Png => {
                let (width, height) = (buffer.width(), buffer.height());
                PngEncoder::new(&mut out)
                    .write_image(buffer.as_bytes(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| WatcherError::Encoding(e.to_string()))?;
            }
        }
        Ok(EncodedImage {
            format,
            bytes: Bytes::from(out),
        })
    }

    /// [`encode`](Self::encode) on the blocking pool.
    pub async fn encode_blocking(
        &self,
        buffer: PixelBuffer,
        format: ImageFormat,
    ) -> Result<EncodedImage, WatcherError> {
        let encoder = *self;
        tokio::task::spawn_blocking(move || encoder.encode(buffer, format)).await?
    }
}

// ── Tests ────────────────────────────────────────────────────────
