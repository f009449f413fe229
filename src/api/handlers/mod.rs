use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::FeedError;
use crate::models::*;
use crate::service::ActivityService;

// ============================================================
// Error Handling
// ============================================================

/// Map a feed error to a response.
///
/// Validation errors are safe to show and go back as 400 with their message.
/// Anything else is logged in full and answered with a generic 500.
fn feed_error(e: FeedError) -> (StatusCode, String) {
    if e.is_validation() {
        tracing::warn!("Validation error: {}", e);
        return (StatusCode::BAD_REQUEST, e.to_string());
    }

    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn status(State(service): State<ActivityService>) -> Json<ServiceStatus> {
    Json(service.status())
}

// ============================================================
// Events
// ============================================================

pub async fn add_event(
    State(service): State<ActivityService>,
    Json(input): Json<CreateEventInput>,
) -> Result<(StatusCode, Json<EventCreated>), (StatusCode, String)> {
    let event = service.submit(input).await.map_err(feed_error)?;
    Ok((
        StatusCode::CREATED,
        Json(EventCreated {
            status: "success".to_string(),
            event,
        }),
    ))
}

pub async fn get_events(
    State(service): State<ActivityService>,
    Path(day): Path<String>,
) -> Result<Json<DayEvents>, (StatusCode, String)> {
    let day = Day::parse(&day).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))?;
    Ok(Json(service.events(day).await))
}

pub async fn clear_events(
    State(service): State<ActivityService>,
    Path(day): Path<String>,
) -> Result<Json<ClearResult>, (StatusCode, String)> {
    service.clear(&day).await.map(Json).map_err(feed_error)
}
