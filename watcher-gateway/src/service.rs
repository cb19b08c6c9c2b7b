//! Gateway HTTP surface.
//!
//! ```text
//! GET /remotescreenjpeg?host&port&width&count
//!        │ ProxyRequest (host required, rest defaulted)
//!        ▼
//!     Forwarder ──► http://{host}:{port}/screenjpeg?width=..&count=..
//!        │
//!        ▼ 200: body relayed verbatim / anything else: 500
//! ```

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;
use tower_http::services::ServeDir;
use tracing::info;

use watcher_core::server::{self, hostname_handler};
use watcher_core::{DEFAULT_AGENT_PORT, ProxyRequest, WatcherError};

use crate::config::GatewayConfig;
use crate::forward::{Forwarder, Relayed};

// ── GatewayState ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GatewayState {
    pub forwarder: Arc<Forwarder>,
    /// Agent port for requests without a valid `port`.
    pub default_backend_port: u16,
}

impl GatewayState {
    pub fn new(forwarder: Forwarder) -> Self {
        Self {
            forwarder: Arc::new(forwarder),
            default_backend_port: DEFAULT_AGENT_PORT,
        }
    }
}

/// The gateway's routes, with `assets` served for unmatched paths.
pub fn router(state: GatewayState, assets: Option<&std::path::Path>) -> Router {
    let router = Router::new()
        .route("/remotescreenjpeg", get(remote_screen_jpeg))
        .route("/remotehostname", get(remote_hostname))
        .route("/hostname", get(hostname_handler))
        .with_state(state);
    match assets {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

// ── Handlers ─────────────────────────────────────────────────────

async fn remote_screen_jpeg(
    State(state): State<GatewayState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Relayed, WatcherError> {
    let request = ProxyRequest::from_query(&query, state.default_backend_port)?;
    state.forwarder.fetch(&request.screen_jpeg_url()).await
}

async fn remote_hostname(
    State(state): State<GatewayState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Relayed, WatcherError> {
    let request = ProxyRequest::from_query(&query, state.default_backend_port)?;
    state.forwarder.fetch(&request.hostname_url()).await
}

// ── GatewayService ───────────────────────────────────────────────

/// The gateway process: config in, HTTP server out.
pub struct GatewayService {
    config: GatewayConfig,
}

impl GatewayService {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<(), WatcherError> {
        let state = GatewayState {
            forwarder: Arc::new(Forwarder::new()?),
            default_backend_port: self.config.backend.default_port,
        };
        let assets = self.config.asset_dir();
        match assets {
            Some(dir) => info!("serving assets from {}", dir.display()),
            None => info!("static assets disabled"),
        }
        server::serve(self.config.network.listen_port, router(state, assets)).await
    }
}
