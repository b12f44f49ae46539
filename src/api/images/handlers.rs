use crate::api::models::*;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use bson::{oid::ObjectId, DateTime};
use serde_json::Value;
use tracing::info;

pub async fn update_image_status_handler(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let image_id =
        ObjectId::parse_str(&image_id).map_err(|e| AppError::InvalidObjectId(e.to_string()))?;

    let Json(request) = body?;
    let new_status = match request.status {
        Some(Value::String(status)) if state.moderation.is_valid_status(&status) => status,
        _ => {
            return Err(AppError::InvalidStatus(
                state.moderation.valid_statuses_description(),
            ))
        }
    };

    let current_status = state.store.image_status(image_id).await?;

    if current_status.as_deref() == Some(new_status.as_str()) {
        info!(%image_id, status = %new_status, "Status unchanged");
        return Ok(Json(MessageResponse::new(
            "Requested status is the same as current",
        )));
    }

    // Not atomic with the read above; a concurrent delete shows up as zero modified
    let modified = state
        .store
        .set_image_status(image_id, &new_status, DateTime::now())
        .await?;

    if modified == 0 {
        return Err(AppError::ImageNotFound);
    }

    info!(
        %image_id,
        from = ?current_status,
        to = %new_status,
        "Image status updated"
    );

    Ok(Json(MessageResponse::new("Image status updated")))
}
