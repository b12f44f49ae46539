pub mod errors;
pub mod groups;
pub mod images;
pub mod models;
pub mod statistics;

#[cfg(test)]
pub mod testing;

// Re-exports
pub use models::*;

use axum::{http::Method, middleware, Router};
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the application router.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(groups::routes())
        .merge(images::routes())
        .merge(statistics::routes())
        .fallback(errors::not_found_handler)
        .with_state(state)
        // Inner layers first: timeouts must pass through the error envelope
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(errors::json_error_envelope))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::PUT])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_origin(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}
