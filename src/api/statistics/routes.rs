use crate::api::models::AppState;
use crate::api::statistics::handlers::statistics_handler;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(statistics_handler))
}
