//! HTTP client for the activity feed API.
//!
//! Used by the `post`, `show`, `clear` and `watch` subcommands. The base URL
//! comes from `FeedConfig::url`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::*;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// HTTP client for the activity feed API.
#[derive(Debug, Clone)]
pub struct FeedClient {
    base_url: String,
    client: Client,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    /// Service health and version.
    pub async fn status(&self) -> Result<ServiceStatus, ClientError> {
        let response = self.request(reqwest::Method::GET, "/").send().await?;
        self.handle_response(response).await
    }

    /// Submit an event; returns it as stored, with timestamp and date.
    pub async fn add_event(&self, input: &CreateEventInput) -> Result<Event, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/event")
            .json(input)
            .send()
            .await?;
        let created: EventCreated = self.handle_response(response).await?;
        Ok(created.event)
    }

    /// Events of one day, newest first.
    pub async fn events(&self, day: Day) -> Result<DayEvents, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/api/events/{}", day))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Clear a day by name. Names other than `today` and `yesterday` are
    /// rejected by the server with `BadRequest`.
    pub async fn clear(&self, day: &str) -> Result<ClearResult, ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/api/events/{}", day))
            .send()
            .await?;
        self.handle_response(response).await
    }
}
