//! In-process HTTP tests for the capture agent routes.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use watcher_agent::service::{AgentState, router};
use watcher_core::{
    CaptureSource, CaptureWorker, DisplayBounds, Headless, SharedCapture, SyntheticDisplays,
};

fn agent(source: impl CaptureSource + 'static) -> Router {
    router(AgentState::new(Arc::new(source)))
}

fn full_hd() -> Router {
    agent(SharedCapture::new(SyntheticDisplays::single(1920, 1080)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, content_type, body)
}

fn dimensions(bytes: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(bytes).unwrap();
    (image.width(), image.height())
}

// ── /screenjpeg ──────────────────────────────────────────────────

#[tokio::test]
async fn jpeg_scaled_to_requested_width() {
    let (status, content_type, body) = get(full_hd(), "/screenjpeg?width=960").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(
        image::guess_format(&body).unwrap(),
        image::ImageFormat::Jpeg
    );
    assert_eq!(dimensions(&body), (960, 540));
}

#[tokio::test]
async fn jpeg_band_edges_are_honoured() {
    let (_, _, body) = get(full_hd(), "/screenjpeg?width=160").await;
    assert_eq!(dimensions(&body), (160, 90));
    let (_, _, body) = get(full_hd(), "/screenjpeg?width=1280").await;
    assert_eq!(dimensions(&body), (1280, 720));
}

#[tokio::test]
async fn jpeg_repeated_width_uses_first_value() {
    let (_, _, body) = get(full_hd(), "/screenjpeg?width=640&width=abc").await;
    assert_eq!(dimensions(&body), (640, 360));
    let (_, _, body) = get(full_hd(), "/screenjpeg?width=abc&width=640").await;
    assert_eq!(dimensions(&body), (1920, 1080));
}

#[tokio::test]
async fn jpeg_outside_band_is_native() {
    for uri in [
        "/screenjpeg",
        "/screenjpeg?width=0",
        "/screenjpeg?width=159",
        "/screenjpeg?width=2000",
        "/screenjpeg?width=-640",
        "/screenjpeg?width=abc",
        "/screenjpeg?count=3",
    ] {
        let (status, _, body) = get(full_hd(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(dimensions(&body), (1920, 1080), "{uri}");
    }
}

#[tokio::test]
async fn jpeg_without_display_is_unavailable() {
    let (status, _, body) = get(agent(SharedCapture::new(Headless)), "/screenjpeg?width=640").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.is_empty());
}

#[tokio::test]
async fn jpeg_capture_failure_is_unavailable() {
    let provider = SyntheticDisplays::failing(
        vec![DisplayBounds::new(0, 0, 1920, 1080)],
        "screen buffer not readable",
    );
    let (status, _, body) = get(agent(CaptureWorker::spawn(provider).unwrap()), "/screenjpeg").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.is_empty());
}

#[tokio::test]
async fn jpeg_display_index_past_last_is_unavailable() {
    let mut state = AgentState::new(Arc::new(SharedCapture::new(SyntheticDisplays::single(
        64, 48,
    ))));
    state.display_index = 1;
    let (status, _, _) = get(router(state), "/screenjpeg").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn each_request_captures_a_fresh_frame() {
    let provider = Arc::new(SyntheticDisplays::single(320, 200));
    let app = agent(SharedCapture::from_arc(Arc::clone(&provider)));
    for _ in 0..3 {
        let (status, _, _) = get(app.clone(), "/screenjpeg?width=160").await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(provider.capture_count(), 3);
}

// ── /screenpng ───────────────────────────────────────────────────

#[tokio::test]
async fn png_is_lossless_and_native() {
    let (status, content_type, body) = get(full_hd(), "/screenpng?width=640").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));

    let decoded = image::load_from_memory(&body).unwrap().into_rgba8();
    assert_eq!(decoded.dimensions(), (1920, 1080));
    // Gradient corners survive exactly.
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1919, 1079).0, [255, 255, 0, 255]);
}

#[tokio::test]
#[should_panic(expected = "png diagnostic capture failed")]
async fn png_failure_is_fatal() {
    get(agent(SharedCapture::new(Headless)), "/screenpng").await;
}

// ── /hostname ────────────────────────────────────────────────────

#[tokio::test]
async fn hostname_is_served() {
    let (status, content_type, body) = get(full_hd(), "/hostname").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert!(!body.is_empty());
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, _, _) = get(full_hd(), "/screenbmp").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
