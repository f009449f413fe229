mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::ActivityService;

pub fn create_router(service: ActivityService) -> Router {
    let api = Router::new()
        .route("/event", post(handlers::add_event))
        // One parameterised path for both days; a static `/events/today`
        // route would answer DELETE with 405.
        .route(
            "/events/{day}",
            get(handlers::get_events).delete(handlers::clear_events),
        );

    Router::new()
        .route("/", get(handlers::status))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}
