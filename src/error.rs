use std::time::Duration;

use thiserror::Error;

/// Errors produced by the activity feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Bad input from a client: an unknown day selector or an empty field.
    #[error("{0}")]
    Validation(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode event log: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage write timed out after {0:?}")]
    Timeout(Duration),
}

impl FeedError {
    pub fn invalid_day(day: &str) -> Self {
        Self::Validation(format!(
            "Day must be 'today' or 'yesterday', got '{}'",
            day
        ))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
