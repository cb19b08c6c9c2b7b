//! Capture scheduling: how a request reaches the display provider.
//!
//! Capture and scaling are blocking, CPU-bound calls into the OS graphics
//! stack. Both sources below keep them off the async workers:
//!
//! | Source            | Concurrency                                      |
//! |-------------------|--------------------------------------------------|
//! | [`SharedCapture`] | one blocking-pool task per request, in parallel  |
//! | [`CaptureWorker`] | one dedicated thread, requests served in order   |
//!
//! Neither caches frames. A request whose caller has gone away still runs
//! to completion and its result is dropped.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::capture::provider::{DisplayProvider, grab_display};
use crate::capture::types::{CaptureRequest, PixelBuffer};
use crate::error::{CaptureError, WatcherError};
use crate::scale::scale_to_width;

/// Capture display `request.display_index` and scale it to
/// `request.requested_width` (0 keeps the native size).
pub fn capture_scaled<P>(
    provider: &P,
    request: CaptureRequest,
) -> Result<PixelBuffer, WatcherError>
where
    P: DisplayProvider + ?Sized,
{
    let frame = grab_display(provider, request.display_index)?;
    Ok(scale_to_width(frame, request.requested_width)?)
}

// ── CaptureSource ────────────────────────────────────────────────

/// Async entry point to the capture + scale stage.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn capture(&self, request: CaptureRequest) -> Result<PixelBuffer, WatcherError>;
}

// ── SharedCapture ────────────────────────────────────────────────

/// Calls a thread-safe provider concurrently from the blocking pool.
///
/// Overlapping captures rely entirely on the provider's own thread safety;
/// no serialisation is added here.
pub struct SharedCapture<P> {
    provider: Arc<P>,
}

impl<P: DisplayProvider + Sync> SharedCapture<P> {
    pub fn new(provider: P) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Share a provider the caller keeps a handle to.
    pub fn from_arc(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: DisplayProvider + Sync> CaptureSource for SharedCapture<P> {
    async fn capture(&self, request: CaptureRequest) -> Result<PixelBuffer, WatcherError> {
        let provider = Arc::clone(&self.provider);
        tokio::task::spawn_blocking(move || capture_scaled(provider.as_ref(), request)).await?
    }
}

// ── CaptureWorker ────────────────────────────────────────────────

struct Job {
    request: CaptureRequest,
    reply: oneshot::Sender<Result<PixelBuffer, WatcherError>>,
}

/// Single-owner capture thread.
///
/// The provider is moved onto one OS thread and never touched from
/// anywhere else, so it needs to be `Send` but not `Sync`. Requests queue
/// on an unbounded channel and are served one at a time. The thread exits
/// once the last `CaptureWorker` handle is dropped.
pub struct CaptureWorker {
    jobs: mpsc::Sender<Job>,
}

impl CaptureWorker {
    /// Move `provider` onto a new `capture-worker` thread.
    pub fn spawn<P: DisplayProvider>(provider: P) -> Result<Self, WatcherError> {
        let (jobs, queue) = mpsc::channel::<Job>();
        thread::Builder::new()
            .name("capture-worker".into())
            .spawn(move || {
                debug!("capture worker started");
                while let Ok(job) = queue.recv() {
                    let result = capture_scaled(&provider, job.request);
                    if job.reply.send(result).is_err() {
                        debug!("capture requester went away; frame dropped");
                    }
                }
                debug!("capture worker stopped");
            })?;
        Ok(Self { jobs })
    }
}

#[async_trait]
impl CaptureSource for CaptureWorker {
    async fn capture(&self, request: CaptureRequest) -> Result<PixelBuffer, WatcherError> {
        let (reply, response) = oneshot::channel();
        self.jobs.send(Job { request, reply }).map_err(|_| {
            warn!("capture worker queue closed");
            CaptureError::WorkerGone
        })?;
        response.await.map_err(|_| CaptureError::WorkerGone)?
    }
}

// ── Tests ────────────────────────────────────────────────────────
