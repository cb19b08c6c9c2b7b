//! # watcher-agent: Capture Agent
//!
//! HTTP service that runs on a monitored host and answers each request
//! with a fresh snapshot of one local display.
//!
//! | Path          | Answer                                            |
//! |---------------|---------------------------------------------------|
//! | `/screenjpeg` | JPEG, optionally downscaled to `width`; 503 when no frame can be captured |
//! | `/screenpng`  | lossless full-size PNG (diagnostics)              |
//! | `/hostname`   | the host's name as plain text; 403 on failure     |
//!
//! ## Capture backends
//!
//! - **native**: real monitors through `xcap` (cargo feature
//!   `native-capture`). Built without the feature, the agent reports no
//!   display.
//! - **synthetic**: a generated 1920×1080 gradient, for dry runs.

pub mod config;
pub mod service;
