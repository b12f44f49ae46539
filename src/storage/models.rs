use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A named collection of images (`groups` collection)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}

/// A moderatable image (`images` collection)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub group_id: ObjectId,
    pub status: String,
    pub created_at: DateTime,
    pub last_updated_at: DateTime,
    pub url: String,
}

/// One row of the groups listing aggregation.
///
/// `images` is ordered by descending `last_updated_at`. The `count` the
/// `$group` stage emits is not decoded; responses derive it from `images`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GroupWithImages {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub images: Vec<Image>,
}

/// Validated listing request handed to the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupQuery {
    pub status: Option<String>,
    pub page: Option<Page>,
}

/// Skip/limit applied to the sorted group list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    /// `page` is zero-based; `groups_per_page` must be non-zero.
    pub fn new(page: u32, groups_per_page: u32) -> Self {
        Self {
            skip: u64::from(page) * u64::from(groups_per_page),
            limit: u64::from(groups_per_page),
        }
    }
}

/// Inclusive `created_at` range counted by the statistics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsWindow {
    pub start: DateTime,
    pub end: DateTime,
}

impl StatisticsWindow {
    /// The window of `days` days ending at `end`.
    pub fn ending_at(end: chrono::DateTime<chrono::Utc>, days: u32) -> Self {
        let start = end - chrono::Duration::days(i64::from(days));
        Self {
            start: DateTime::from_chrono(start),
            end: DateTime::from_chrono(end),
        }
    }

    pub fn contains(&self, at: DateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn page_offsets_are_page_times_size() {
        let page = Page::new(3, 4);
        assert_eq!(page.skip, 12);
        assert_eq!(page.limit, 4);
        assert_eq!(Page::new(0, 10).skip, 0);
    }

    #[test]
    fn page_offsets_do_not_overflow() {
        let page = Page::new(u32::MAX, u32::MAX);
        assert_eq!(page.skip, u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[test]
    fn statistics_window_is_inclusive() {
        let end = chrono::Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let window = StatisticsWindow::ending_at(end, 30);
        let start = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        assert_eq!(window.start, DateTime::from_chrono(start));
        assert!(window.contains(DateTime::from_chrono(start)));
        assert!(window.contains(DateTime::from_chrono(end)));
        assert!(!window.contains(DateTime::from_chrono(
            start - chrono::Duration::milliseconds(1)
        )));
        assert!(!window.contains(DateTime::from_chrono(
            end + chrono::Duration::milliseconds(1)
        )));
    }
}
