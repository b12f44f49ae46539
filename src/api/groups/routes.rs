use crate::api::groups::handlers::list_groups_handler;
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups_handler))
}
