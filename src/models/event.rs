use serde::{Deserialize, Serialize};

/// A stored activity event.
///
/// Events are immutable once they land in a bucket. `timestamp` and `date`
/// are assigned by the store at insertion time from the local clock, so the
/// pair always says when the service saw the event, not when the producer
/// claims it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Free-form category tag such as `motion` or `doorbell`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub text: String,
    /// Path or URL of an image attached to the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Local time of day, `HH:MM:SS`. Empty when a stored entry lacks it.
    #[serde(default)]
    pub timestamp: String,
    /// Local calendar date, `YYYY-MM-DD`. Empty when a stored entry lacks it.
    #[serde(default)]
    pub date: String,
}

/// Input for submitting a new event.
///
/// When `camera` is set and `image` is not, the service asks its snapshot
/// capture to produce an image for the event before storing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEventInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Camera snapshot reference to resolve into `image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
}

impl CreateEventInput {
    /// Returns the name of the first required field that is empty.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("type", &self.kind),
            ("title", &self.title),
            ("text", &self.text),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Response body for a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreated {
    pub status: String,
    pub event: Event,
}

/// Contents of one bucket as returned by the day queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEvents {
    /// The calendar date the bucket stands for.
    pub date: String,
    pub count: usize,
    /// Newest first.
    pub events: Vec<Event>,
}

/// Response body for clearing a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResult {
    pub status: String,
    pub cleared: super::Day,
    /// Number of events that were removed.
    pub count: usize,
}

/// Health payload served at `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub port: u16,
}
