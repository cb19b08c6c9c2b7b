//! Capture agent HTTP surface.
//!
//! ```text
//! GET /screenjpeg?width=N ──► WidthBand ──► CaptureSource ──► JPEG
//! GET /screenpng          ──────────────► CaptureSource ──► PNG
//! GET /hostname           ──► hostname crate
//! ```
//!
//! Every request captures a fresh frame; nothing is cached between
//! requests.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;
use tracing::{error, info, warn};

use watcher_core::params;
use watcher_core::server::{self, hostname_handler};
use watcher_core::{
    CaptureRequest, CaptureSource, CaptureWorker, DisplayProvider, EncodedImage, Encoder,
    ImageFormat, SharedCapture, SyntheticDisplays, WatcherError, WidthBand,
};

use crate::config::{AgentConfig, CaptureBackend, CaptureConfig};

/// Dimensions of the display the `synthetic` backend pretends to have.
pub const SYNTHETIC_DISPLAY: (u32, u32) = (1920, 1080);

// ── AgentState ───────────────────────────────────────────────────

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AgentState {
    pub source: Arc<dyn CaptureSource>,
    pub encoder: Encoder,
    pub band: WidthBand,
    pub display_index: usize,
}

impl AgentState {
    pub fn new(source: Arc<dyn CaptureSource>) -> Self {
        Self {
            source,
            encoder: Encoder::default(),
            band: WidthBand::DEFAULT,
            display_index: 0,
        }
    }

    /// State for `config`, with its capture backend started.
    pub fn from_config(config: &AgentConfig) -> Result<Self, WatcherError> {
        Ok(Self {
            source: build_source(&config.capture)?,
            encoder: config.encoder(),
            band: config.width_band(),
            display_index: config.capture.display_index,
        })
    }
}

/// The agent's routes.
pub fn router(state: AgentState) -> Router {
    Router::new()
        .route("/screenjpeg", get(screen_jpeg))
        .route("/screenpng", get(screen_png))
        .route("/hostname", get(hostname_handler))
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────

/// `width` inside the band resizes, anything else means native size.
/// Capture failures answer 503.
async fn screen_jpeg(
    State(state): State<AgentState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<EncodedImage, WatcherError> {
    let width = state.band.normalize(params::first(&query, "width"));
    let request = CaptureRequest::new(state.display_index, width);
    let frame = state.source.capture(request).await?;
    state.encoder.encode_blocking(frame, ImageFormat::Jpeg).await
}

/// Lossless full-size frame for diagnostics.
///
/// # Panics
///
/// On any capture or encoding failure. This endpoint is not hardened.
async fn screen_png(State(state): State<AgentState>) -> EncodedImage {
    let request = CaptureRequest::native(state.display_index);
    let encoded = match state.source.capture(request).await {
        Ok(frame) => state.encoder.encode_blocking(frame, ImageFormat::Png).await,
        Err(e) => Err(e),
    };
    match encoded {
        Ok(image) => image,
        Err(e) => {
            error!("png diagnostic capture failed: {e}");
            panic!("png diagnostic capture failed: {e}");
        }
    }
}

// ── Capture backend ──────────────────────────────────────────────

/// Start the capture source `capture` describes.
pub fn build_source(capture: &CaptureConfig) -> Result<Arc<dyn CaptureSource>, WatcherError> {
    match capture.backend {
        CaptureBackend::Synthetic => {
            let (width, height) = SYNTHETIC_DISPLAY;
            info!("capture backend: synthetic {width}x{height}");
            schedule(SyntheticDisplays::single(width, height), capture.serialize)
        }
        CaptureBackend::Native => native_source(capture.serialize),
    }
}

#[cfg(feature = "native-capture")]
fn native_source(serialize: bool) -> Result<Arc<dyn CaptureSource>, WatcherError> {
    info!("capture backend: native");
    schedule(watcher_core::capture::NativeDisplays, serialize)
}

#[cfg(not(feature = "native-capture"))]
fn native_source(serialize: bool) -> Result<Arc<dyn CaptureSource>, WatcherError> {
    warn!("built without native-capture; every capture will answer 503");
    schedule(watcher_core::Headless, serialize)
}

fn schedule<P>(provider: P, serialize: bool) -> Result<Arc<dyn CaptureSource>, WatcherError>
where
    P: DisplayProvider + Sync,
{
    if serialize {
        Ok(Arc::new(CaptureWorker::spawn(provider)?))
    } else {
        Ok(Arc::new(SharedCapture::new(provider)))
    }
}

// ── AgentService ─────────────────────────────────────────────────

/// The capture agent process: config in, HTTP server out.
pub struct AgentService {
    config: AgentConfig,
}

impl AgentService {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    /// Start the capture backend and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), WatcherError> {
        let state = AgentState::from_config(&self.config)?;
        info!(
            "display {}, width band {:?}, jpeg quality {}",
            state.display_index,
            state.band.range(),
            state.encoder.jpeg_quality()
        );
        server::serve(self.config.network.listen_port, router(state)).await
    }
}

// ── Tests ────────────────────────────────────────────────────────
