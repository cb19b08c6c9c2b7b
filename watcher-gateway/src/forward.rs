//! Backend calls to capture agents.
//!
//! One inbound request makes exactly one backend call: no retry, no
//! caching, no coalescing. Only a 200 is relayed; every other outcome
//! collapses into a single 500 at the gateway boundary.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::debug;

use watcher_core::WatcherError;

/// A backend body relayed verbatim.
#[derive(Debug, Clone)]
pub struct Relayed {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let mut response = self.body.into_response();
        match self.content_type {
            Some(value) => {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            None => {
                response.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        response
    }
}

/// HTTP client for capture agents.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    /// A client with the library's default timeouts and redirect policy.
    /// Agents are addressed directly, never through a system proxy.
    pub fn new() -> Result<Self, WatcherError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(std::io::Error::other)?;
        Ok(Self { client })
    }

    /// `GET url`, relaying the body only on 200.
    pub async fn fetch(&self, url: &str) -> Result<Relayed, WatcherError> {
        let unreachable = |e: reqwest::Error| WatcherError::BackendUnreachable {
            url: url.to_owned(),
            cause: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(unreachable)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(WatcherError::BackendUnhealthy {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(unreachable)?;
        debug!(%url, bytes = body.len(), "relaying backend response");
        Ok(Relayed { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Bind then drop so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{port}/hostname");
        let err = Forwarder::new().unwrap().fetch(&url).await.unwrap_err();
        match err {
            WatcherError::BackendUnreachable { url: logged, .. } => assert_eq!(logged, url),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_url_is_unreachable() {
        let err = Forwarder::new()
            .unwrap()
            .fetch("http://bad host:3400/hostname")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn relayed_without_content_type_sets_none() {
        let response = Relayed {
            content_type: None,
            body: Bytes::from_static(b"abc"),
        }
        .into_response();
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn relayed_keeps_backend_content_type() {
        let response = Relayed {
            content_type: Some(HeaderValue::from_static("image/jpeg")),
            body: Bytes::from_static(&[0xFF, 0xD8]),
        }
        .into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    }
}
