//! Camera snapshot capture.
//!
//! A producer can submit a camera reference instead of an image. The service
//! hands that reference to a [`SnapshotCapture`] before the event is stored;
//! the store itself never sees cameras.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::store::Clock;

const CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("snapshot request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("camera returned {0}")]
    Status(StatusCode),

    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported camera reference: {0}")]
    Unsupported(String),
}

pub type CaptureFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, CaptureError>> + Send + 'a>>;

/// Turns a camera reference into an image reference for an event.
pub trait SnapshotCapture: Send + Sync {
    fn capture<'a>(&'a self, camera: &'a str) -> CaptureFuture<'a>;
}

/// Downloads a still image from an http(s) snapshot URL into a local
/// directory and returns its public path.
///
/// Files are named `daf_<YYYYmmdd_HHMMSS>.jpg` and published as
/// `<public_prefix>/daf_<...>.jpg`.
pub struct HttpSnapshot {
    client: Client,
    output_dir: PathBuf,
    public_prefix: String,
    clock: Arc<dyn Clock>,
}

impl HttpSnapshot {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CaptureError> {
        let client = Client::builder().timeout(CAPTURE_TIMEOUT).build()?;
        Ok(Self {
            client,
            output_dir: output_dir.into(),
            public_prefix: public_prefix.into(),
            clock,
        })
    }

    async fn fetch(&self, camera: &str) -> Result<String, CaptureError> {
        if !(camera.starts_with("http://") || camera.starts_with("https://")) {
            return Err(CaptureError::Unsupported(camera.to_string()));
        }

        let response = self.client.get(camera).send().await?;
        if !response.status().is_success() {
            return Err(CaptureError::Status(response.status()));
        }
        let bytes = response.bytes().await?;

        let filename = format!("daf_{}.jpg", self.clock.now().format("%Y%m%d_%H%M%S"));
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(self.output_dir.join(&filename), &bytes).await?;

        let image = format!("{}/{}", self.public_prefix.trim_end_matches('/'), filename);
        tracing::info!(camera, image = %image, "Camera snapshot created");
        Ok(image)
    }
}

impl SnapshotCapture for HttpSnapshot {
    fn capture<'a>(&'a self, camera: &'a str) -> CaptureFuture<'a> {
        Box::pin(self.fetch(camera))
    }
}
