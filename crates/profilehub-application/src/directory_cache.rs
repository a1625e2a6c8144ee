//! Last fetched directory snapshot.

use chrono::{DateTime, Utc};
use profilehub_core::user::UserRecord;

/// The user list as returned by the last successful fetch.
///
/// The snapshot is replaced wholesale; records keep the order of the fetch
/// response.
#[derive(Debug, Default, Clone)]
pub struct DirectoryCache {
    records: Vec<UserRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly fetched snapshot.
    pub fn replace(&mut self, records: Vec<UserRecord>, fetched_at: DateTime<Utc>) {
        self.records = records;
        self.fetched_at = Some(fetched_at);
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    /// When the snapshot was taken; `None` before the first successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
