use crate::config::ModerationConfig;
use crate::storage::{GroupWithImages, Image, ImageStore, StoreError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bson::DateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ImageStore>,
    pub moderation: Arc<ModerationConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ImageStore>, moderation: ModerationConfig) -> Self {
        Self {
            store,
            moderation: Arc::new(moderation),
        }
    }
}

/// Query string of `GET /groups`; values stay raw until validated
#[derive(Debug, Default, Deserialize)]
pub struct GroupsParams {
    pub status: Option<String>,
    pub page: Option<String>,
    pub groups_per_page: Option<String>,
}

/// Body of `PUT /images/{id}`
///
/// `status` is left untyped so a number or boolean is reported as an invalid
/// status rather than a body deserialization failure.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<serde_json::Value>,
}

/// Plain success message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// A group in the listing response
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub images: Vec<ImageResponse>,
    pub count: usize,
}

/// An image with store-native values rendered as plain JSON
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub group_id: String,
    pub status: String,
    pub created_at: String,
    pub last_updated_at: String,
    pub url: String,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id.to_hex(),
            group_id: image.group_id.to_hex(),
            status: image.status,
            created_at: timestamp(image.created_at),
            last_updated_at: timestamp(image.last_updated_at),
            url: image.url,
        }
    }
}

impl From<GroupWithImages> for GroupResponse {
    fn from(group: GroupWithImages) -> Self {
        let images: Vec<ImageResponse> = group.images.into_iter().map(Into::into).collect();
        Self {
            id: group.id.to_hex(),
            name: group.name,
            // derived from the images actually returned
            count: images.len(),
            images,
        }
    }
}

/// RFC 3339 in UTC with millisecond precision.
fn timestamp(at: DateTime) -> String {
    at.to_chrono()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Error envelope returned by every failing request
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub code: u16,
    pub name: String,
    pub description: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid values of query parameters: {0}")]
    InvalidQuery(String),

    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("Image not found")]
    ImageNotFound,

    #[error("Store error: {0}")]
    Storage(#[from] StoreError),

    #[error("{name}: {description}")]
    Http {
        status: StatusCode,
        name: String,
        description: String,
    },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        AppError::Http {
            status,
            name: status.canonical_reason().unwrap_or("Error").to_string(),
            description: rejection.body_text(),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidStatus(_)
            | AppError::InvalidQuery(_)
            | AppError::InvalidObjectId(_)
            | AppError::ImageNotFound => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Http { status, .. } => *status,
        }
    }

    pub fn envelope(&self) -> ErrorResponse {
        let (name, description) = match self {
            AppError::InvalidStatus(description) => ("Invalid status", description.clone()),
            AppError::InvalidQuery(description) => {
                ("Invalid values of query parameters", description.clone())
            }
            AppError::InvalidObjectId(description) => ("Invalid ObjectId", description.clone()),
            AppError::ImageNotFound => (
                "Image not found",
                "Specified ID was not found in database".to_string(),
            ),
            // label kept byte-for-byte for existing clients
            AppError::Storage(err) => ("MongoDB exeption occured", err.to_string()),
            AppError::Http {
                name, description, ..
            } => (name.as_str(), description.clone()),
        };

        ErrorResponse {
            code: self.status().as_u16(),
            name: name.to_string(),
            description,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(self.envelope())).into_response()
    }
}
