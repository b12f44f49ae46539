//! Aggregation pipelines issued against the document store.

use crate::storage::models::{GroupQuery, Page, StatisticsWindow};
use bson::{doc, Document};

/// Builds the groups listing pipeline.
///
/// Stages are appended in a fixed order:
/// `$lookup` → `$unwind` → [`$match`] → `$sort` → `$group` → `$sort` → [`$skip` → `$limit`]
#[derive(Debug, Clone)]
pub struct GroupsPipeline<'a> {
    images_collection: &'a str,
    status: Option<&'a str>,
    page: Option<Page>,
}

impl<'a> GroupsPipeline<'a> {
    pub fn new(images_collection: &'a str) -> Self {
        Self {
            images_collection,
            status: None,
            page: None,
        }
    }

    pub fn from_query(images_collection: &'a str, query: &'a GroupQuery) -> Self {
        let mut pipeline = Self::new(images_collection);
        if let Some(status) = query.status.as_deref() {
            pipeline = pipeline.status(status);
        }
        if let Some(page) = query.page {
            pipeline = pipeline.page(page);
        }
        pipeline
    }

    /// Keep only images with this status.
    pub fn status(mut self, status: &'a str) -> Self {
        self.status = Some(status);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn build(&self) -> Vec<Document> {
        let mut stages = vec![
            doc! {
                "$lookup": {
                    "from": self.images_collection,
                    "localField": "_id",
                    "foreignField": "group_id",
                    "as": "images",
                }
            },
            // one row per (group, image); groups without rows vanish here
            doc! { "$unwind": "$images" },
        ];

        if let Some(status) = self.status {
            stages.push(doc! { "$match": { "images.status": status } });
        }

        stages.push(doc! { "$sort": { "images.last_updated_at": -1 } });
        stages.push(doc! {
            "$group": {
                "_id": "$_id",
                "name": { "$first": "$name" },
                "images": { "$push": "$images" },
                "count": { "$sum": 1 },
            }
        });
        stages.push(doc! { "$sort": { "name": 1 } });

        if let Some(page) = self.page {
            // BSON has no unsigned 64-bit integer. A skip past i64::MAX still
            // lands beyond every group, so clamping keeps the empty page.
            let skip = i64::try_from(page.skip).unwrap_or(i64::MAX);
            let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
            stages.push(doc! { "$skip": skip });
            stages.push(doc! { "$limit": limit });
        }

        stages
    }
}

/// Counts images per status created inside `window`.
pub fn statistics_pipeline(window: StatisticsWindow) -> Vec<Document> {
    vec![
        doc! {
            "$match": {
                "created_at": { "$gte": window.start, "$lte": window.end }
            }
        },
        doc! {
            "$group": {
                "_id": "$status",
                "count": { "$sum": 1 },
            }
        },
    ]
}
