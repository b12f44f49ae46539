use crate::config::DatabaseConfig;
use crate::storage::models::{Group, GroupQuery, GroupWithImages, StatisticsWindow};
use crate::storage::pipeline::{statistics_pipeline, GroupsPipeline};
use crate::storage::{ImageStore, StoreError};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database};
use std::collections::BTreeMap;
use tracing::debug;

/// MongoDB-backed store over the `groups` and `images` collections
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
    groups: Collection<Group>,
    images: Collection<Document>,
    images_collection: String,
}

impl MongoStore {
    /// Connect and verify the server answers a ping.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri).await?;
        let store = Self::new(client.database(&config.name), config);
        store.ping().await?;
        Ok(store)
    }

    pub fn new(database: Database, config: &DatabaseConfig) -> Self {
        Self {
            groups: database.collection(&config.groups_collection),
            images: database.collection(&config.images_collection),
            images_collection: config.images_collection.clone(),
            database,
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for MongoStore {
    async fn groups_with_images(
        &self,
        query: &GroupQuery,
    ) -> Result<Vec<GroupWithImages>, StoreError> {
        let pipeline = GroupsPipeline::from_query(&self.images_collection, query).build();
        debug!(stages = pipeline.len(), "Running groups aggregation");

        let rows: Vec<Document> = self.groups.aggregate(pipeline).await?.try_collect().await?;
        rows.into_iter().map(decode_group_row).collect()
    }

    async fn image_status(&self, id: ObjectId) -> Result<Option<String>, StoreError> {
        let found = self
            .images
            .find_one(doc! { "_id": id })
            .projection(doc! { "status": 1 })
            .await?;

        Ok(found.and_then(|image| image.get_str("status").ok().map(str::to_owned)))
    }

    async fn set_image_status(
        &self,
        id: ObjectId,
        status: &str,
        updated_at: DateTime,
    ) -> Result<u64, StoreError> {
        let result = self
            .images
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": status, "last_updated_at": updated_at } },
            )
            .await?;

        Ok(result.modified_count)
    }

    async fn status_counts(
        &self,
        window: StatisticsWindow,
    ) -> Result<BTreeMap<String, u64>, StoreError> {
        let rows: Vec<Document> = self
            .images
            .aggregate(statistics_pipeline(window))
            .await?
            .try_collect()
            .await?;

        counts_from_rows(rows)
    }
}

/// Decode one `$group` row of the listing aggregation.
fn decode_group_row(row: Document) -> Result<GroupWithImages, StoreError> {
    Ok(bson::from_document(row)?)
}

/// Fold statistics rows (`{_id: status, count}`) into a status → count map.
///
/// Images without a string status are grouped under `null`, so they share a
/// key with an image whose status is literally `"null"`.
fn counts_from_rows(rows: Vec<Document>) -> Result<BTreeMap<String, u64>, StoreError> {
    let mut counts = BTreeMap::new();
    for row in rows {
        let count = match row.get("count") {
            Some(Bson::Int32(n)) => u64::try_from(*n).ok(),
            Some(Bson::Int64(n)) => u64::try_from(*n).ok(),
            _ => None,
        }
        .ok_or_else(|| {
            StoreError::UnexpectedDocument(format!("invalid count in statistics row {row}"))
        })?;

        let status = match row.get("_id") {
            Some(Bson::String(s)) => s.clone(),
            Some(Bson::Null) | None => "null".to_string(),
            Some(other) => other.to_string(),
        };
        *counts.entry(status).or_insert(0) += count;
    }

    Ok(counts)
}
