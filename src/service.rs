//! Request orchestration between the HTTP API and the event store.

use std::sync::Arc;

use crate::capture::SnapshotCapture;
use crate::error::{FeedError, Result};
use crate::models::*;
use crate::store::EventStore;

pub const SERVICE_NAME: &str = "Daily Activity Feed API";

/// Shared handle used as the router state.
///
/// Holds no state of its own: everything mutable lives in the [`EventStore`].
#[derive(Clone)]
pub struct ActivityService {
    store: Arc<EventStore>,
    capture: Option<Arc<dyn SnapshotCapture>>,
    port: u16,
}

impl ActivityService {
    pub fn new(store: Arc<EventStore>, port: u16) -> Self {
        Self {
            store,
            capture: None,
            port,
        }
    }

    pub fn with_capture(mut self, capture: Arc<dyn SnapshotCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            port: self.port,
        }
    }

    /// Validate, resolve a camera snapshot if asked to, and store the event.
    pub async fn submit(&self, mut input: CreateEventInput) -> Result<Event> {
        if let Some(field) = input.missing_field() {
            return Err(FeedError::Validation(format!("Field '{}' is required", field)));
        }

        if input.image.is_none() {
            if let Some(camera) = input.camera.take() {
                input.image = self.snapshot(&camera).await;
            }
        }

        Ok(self.store.append(input).await)
    }

    pub async fn events(&self, day: Day) -> DayEvents {
        self.store.query(day).await
    }

    /// Clear the bucket named by `day`, rejecting anything but the two names.
    pub async fn clear(&self, day: &str) -> Result<ClearResult> {
        let day = Day::parse(day).ok_or_else(|| FeedError::invalid_day(day))?;
        let count = self.store.clear(day).await;
        Ok(ClearResult {
            status: "success".to_string(),
            cleared: day,
            count,
        })
    }

    /// Capture failures leave the event without an image.
    async fn snapshot(&self, camera: &str) -> Option<String> {
        let Some(capture) = &self.capture else {
            tracing::warn!(camera, "Snapshot capture is not configured, ignoring camera");
            return None;
        };

        match capture.capture(camera).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::error!(camera, "Failed to create camera snapshot: {}", e);
                None
            }
        }
    }
}
