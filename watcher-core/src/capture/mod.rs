//! Display enumeration and pixel capture.
//!
//! ```text
//! DisplayProvider ──► grab_display ──► scale_to_width ──► PixelBuffer
//!   (native / synthetic /       (index checks)      (crate::scale)
//!    headless)
//! ```
//!
//! | Module      | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `types`     | `DisplayBounds`, `CaptureRequest`, `PixelBuffer`    |
//! | `provider`  | `DisplayProvider` capability and `grab_display`     |
//! | `source`    | async capture scheduling (shared pool / worker)     |
//! | `synthetic` | deterministic in-memory displays                    |
//! | `native`    | `xcap` monitors (feature `xcap`)                    |

pub mod provider;
pub mod source;
pub mod synthetic;
pub mod types;

#[cfg(feature = "xcap")]
pub mod native;

// ── Re-exports ───────────────────────────────────────────────────

#[cfg(feature = "xcap")]
pub use native::NativeDisplays;
pub use provider::{DisplayProvider, Headless, grab_display};
pub use source::{CaptureSource, CaptureWorker, SharedCapture, capture_scaled};
pub use synthetic::SyntheticDisplays;
pub use types::{CaptureRequest, DisplayBounds, PixelBuffer};
