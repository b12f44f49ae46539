//! In-memory store for handler tests.

use crate::storage::models::{Group, GroupQuery, GroupWithImages, Image, StatisticsWindow};
use crate::storage::{ImageStore, StoreError};
use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Evaluates the same listing semantics as the aggregation pipeline
#[derive(Default)]
pub struct MemoryStore {
    groups: Mutex<Vec<Group>>,
    images: Mutex<Vec<Image>>,
    writes: Mutex<usize>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&self, name: &str) -> ObjectId {
        let id = ObjectId::new();
        self.groups.lock().unwrap().push(Group {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Adds an image; timestamps are minutes relative to now.
    pub fn add_image(
        &self,
        group_id: ObjectId,
        status: &str,
        created_minutes_ago: i64,
        updated_minutes_ago: i64,
    ) -> ObjectId {
        let id = ObjectId::new();
        let now = chrono::Utc::now();
        self.images.lock().unwrap().push(Image {
            id,
            group_id,
            status: status.to_string(),
            created_at: DateTime::from_chrono(now - chrono::Duration::minutes(created_minutes_ago)),
            last_updated_at: DateTime::from_chrono(
                now - chrono::Duration::minutes(updated_minutes_ago),
            ),
            url: format!("https://images.example.com/{}.png", id.to_hex()),
        });
        id
    }

    pub fn image(&self, id: ObjectId) -> Option<Image> {
        self.images.lock().unwrap().iter().find(|i| i.id == id).cloned()
    }

    pub fn remove_image(&self, id: ObjectId) {
        self.images.lock().unwrap().retain(|i| i.id != id);
    }

    /// Number of successful status writes.
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    /// Every following call fails with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(StoreError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn groups_with_images(
        &self,
        query: &GroupQuery,
    ) -> Result<Vec<GroupWithImages>, StoreError> {
        self.check()?;
        let groups = self.groups.lock().unwrap().clone();
        let images = self.images.lock().unwrap().clone();

        let mut rows: Vec<GroupWithImages> = groups
            .into_iter()
            .filter_map(|group| {
                let mut matching: Vec<Image> = images
                    .iter()
                    .filter(|image| image.group_id == group.id)
                    .filter(|image| query.status.as_ref().is_none_or(|s| &image.status == s))
                    .cloned()
                    .collect();
                if matching.is_empty() {
                    return None;
                }
                matching.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));
                Some(GroupWithImages {
                    id: group.id,
                    name: group.name,
                    images: matching,
                })
            })
            .collect();

        rows.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(page) = query.page {
            rows = rows
                .into_iter()
                .skip(page.skip as usize)
                .take(page.limit as usize)
                .collect();
        }

        Ok(rows)
    }

    async fn image_status(&self, id: ObjectId) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.image(id).map(|image| image.status))
    }

    async fn set_image_status(
        &self,
        id: ObjectId,
        status: &str,
        updated_at: DateTime,
    ) -> Result<u64, StoreError> {
        self.check()?;
        let mut images = self.images.lock().unwrap();
        let Some(image) = images.iter_mut().find(|i| i.id == id) else {
            return Ok(0);
        };
        if image.status == status {
            return Ok(0);
        }
        image.status = status.to_string();
        image.last_updated_at = updated_at;
        *self.writes.lock().unwrap() += 1;
        Ok(1)
    }

    async fn status_counts(
        &self,
        window: StatisticsWindow,
    ) -> Result<BTreeMap<String, u64>, StoreError> {
        self.check()?;
        let mut counts = BTreeMap::new();
        for image in self.images.lock().unwrap().iter() {
            if window.contains(image.created_at) {
                *counts.entry(image.status.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
