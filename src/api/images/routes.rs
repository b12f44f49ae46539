use crate::api::images::handlers::update_image_status_handler;
use crate::api::models::AppState;
use axum::{routing::put, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/images/{image_id}", put(update_image_status_handler))
}
