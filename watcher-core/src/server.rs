//! HTTP plumbing shared by both services: binding, serving, shutdown and
//! the `/hostname` endpoint.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::WatcherError;

/// Bind `0.0.0.0:{port}` and serve `router` until Ctrl-C.
///
/// A bind failure is returned to the caller, which exits the process.
/// In-flight requests are drained before this returns.
pub async fn serve(port: u16, router: Router) -> Result<(), WatcherError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    serve_on(listener, router).await
}

/// Serve `router` on an already-bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, router: Router) -> Result<(), WatcherError> {
    axum::serve(listener, router.layer(TraceLayer::new_for_http()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// The local machine's hostname.
pub fn local_hostname() -> Result<String, WatcherError> {
    hostname::get()
        .map_err(|e| WatcherError::LocalSystem(e.to_string()))?
        .into_string()
        .map_err(|raw| WatcherError::LocalSystem(format!("hostname is not UTF-8: {raw:?}")))
}

/// `GET /hostname` → `200 text/plain` or `403`.
pub async fn hostname_handler() -> Result<String, WatcherError> {
    let name = local_hostname()?;
    debug!(%name, "hostname requested");
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn hostname_is_plain_text() {
        // CI hosts always have a hostname.
        let response = hostname_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn serve_reports_bind_failure() {
        let taken = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let err = serve(port, Router::new()).await.unwrap_err();
        assert!(matches!(err, WatcherError::Io(_)));
    }
}
