//! Local view of the current user's editable profile.

use chrono::{DateTime, Utc};
use profilehub_core::user::{CurrentUser, ProfileDraft, ProfileField, ProfilePayload, UserRecord};

/// Owns the profile draft of the current user.
///
/// The draft starts empty and unbound. It becomes bound to a remote record
/// either by seeding from the directory or by adopting the id returned from
/// a create; once bound it is never unbound.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    current_user: CurrentUser,
    draft: ProfileDraft,
}

impl ProfileStore {
    pub fn new(current_user: CurrentUser) -> Self {
        Self {
            current_user,
            draft: ProfileDraft::default(),
        }
    }

    pub fn current_user(&self) -> &CurrentUser {
        &self.current_user
    }

    /// Overwrites every draft field from `record` and binds to its id.
    pub fn seed_from(&mut self, record: &UserRecord) {
        self.draft = ProfileDraft::from_record(record);
    }

    /// Seeds from the current user's record in `records`.
    ///
    /// Returns `false` and leaves the draft untouched when the user has no
    /// record yet; the first submission will then create one.
    pub fn seed_from_directory(&mut self, records: &[UserRecord]) -> bool {
        match records.iter().find(|record| self.current_user.owns(record)) {
            Some(record) => {
                self.seed_from(record);
                true
            }
            None => {
                tracing::debug!(
                    "No directory record for '{}', profile will be created on first save",
                    self.current_user.username
                );
                false
            }
        }
    }

    /// Sets a single field. Values are not validated here.
    pub fn edit(&mut self, field: ProfileField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn snapshot(&self) -> ProfileDraft {
        self.draft.clone()
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.draft.remote_id.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.draft.remote_id.is_some()
    }

    /// Binds the draft to the id the service assigned on create.
    pub fn adopt_remote_id(&mut self, id: impl Into<String>) {
        self.draft.remote_id = Some(id.into());
    }

    pub fn payload(&self, now: DateTime<Utc>) -> ProfilePayload {
        self.draft.to_payload(&self.current_user.username, now)
    }
}
