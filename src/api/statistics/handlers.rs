use crate::api::models::*;
use crate::storage::StatisticsWindow;
use axum::{extract::State, Json};
use std::collections::BTreeMap;
use tracing::info;

/// Image counts per status over the configured window.
///
/// Query parameters are ignored; the window length always comes from config.
pub async fn statistics_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, u64>>, AppError> {
    let window = StatisticsWindow::ending_at(chrono::Utc::now(), state.moderation.statistics_days);

    let counts = state.store.status_counts(window).await?;

    info!(
        days = state.moderation.statistics_days,
        statuses = counts.len(),
        "Statistics computed"
    );

    Ok(Json(counts))
}
