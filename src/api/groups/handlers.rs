use crate::api::models::*;
use crate::config::ModerationConfig;
use crate::storage::{GroupQuery, Page};
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

pub async fn list_groups_handler(
    State(state): State<AppState>,
    Query(params): Query<GroupsParams>,
) -> Result<Json<Vec<GroupResponse>>, AppError> {
    // Validate before touching the store
    let query = build_query(&params, &state.moderation)?;

    info!(
        status = ?query.status,
        page = ?query.page,
        "Listing groups"
    );

    let groups = state.store.groups_with_images(&query).await?;

    info!(groups = groups.len(), "Groups listed");

    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}

/// Turn raw query values into a store query. Empty values count as absent.
fn build_query(params: &GroupsParams, moderation: &ModerationConfig) -> Result<GroupQuery, AppError> {
    let status = match non_empty(&params.status) {
        Some(status) if moderation.is_valid_status(status) => Some(status.to_string()),
        Some(_) => return Err(AppError::InvalidStatus(moderation.valid_statuses_description())),
        None => None,
    };

    // groups_per_page alone does not paginate
    let page = match non_empty(&params.page) {
        Some(page) => {
            let page = parse_param("page", page)?;
            let groups_per_page = match non_empty(&params.groups_per_page) {
                Some(raw) => parse_param("groups_per_page", raw)?,
                None => moderation.groups_per_page,
            };
            if groups_per_page == 0 {
                return Err(AppError::InvalidQuery(
                    "groups_per_page must be greater than zero".to_string(),
                ));
            }
            Some(Page::new(page, groups_per_page))
        }
        None => None,
    };

    Ok(GroupQuery { status, page })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_param(name: &str, raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::InvalidQuery(format!("invalid value '{raw}' for {name}: {e}")))
}
