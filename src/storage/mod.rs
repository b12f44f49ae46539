pub mod models;
pub mod mongo;
pub mod pipeline;

#[cfg(test)]
pub mod memory;

pub use models::{GroupQuery, GroupWithImages, Image, Page, StatisticsWindow};
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure reported by the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] mongodb::error::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("unexpected document: {0}")]
    UnexpectedDocument(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Queries and writes issued by the HTTP handlers.
///
/// Each call is a single attempt; callers observe the result before
/// issuing the next operation.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Groups joined with their images, filtered, sorted and paginated per `query`.
    async fn groups_with_images(&self, query: &GroupQuery)
        -> Result<Vec<GroupWithImages>, StoreError>;

    /// Current status of an image, `None` when the image does not exist.
    async fn image_status(&self, id: ObjectId) -> Result<Option<String>, StoreError>;

    /// Sets `status` and `last_updated_at`, returning the modified count.
    async fn set_image_status(
        &self,
        id: ObjectId,
        status: &str,
        updated_at: DateTime,
    ) -> Result<u64, StoreError>;

    /// Image count per status for images created inside `window`.
    async fn status_counts(
        &self,
        window: StatisticsWindow,
    ) -> Result<BTreeMap<String, u64>, StoreError>;
}
