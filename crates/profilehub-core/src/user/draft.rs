//! Locally edited profile form state.

use super::model::UserRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The six editable profile attributes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProfileField {
    Name,
    Email,
    Age,
    Bio,
    Location,
    Profession,
}

impl ProfileField {
    /// Number of editable fields, the denominator of profile completion.
    pub const COUNT: usize = 6;

    /// All editable fields in form order.
    pub fn all() -> impl Iterator<Item = ProfileField> {
        Self::iter()
    }
}

/// The current user's profile form.
///
/// Every attribute is held as the raw form string; an empty string means the
/// attribute is unset. `remote_id` is `Some` once the draft is bound to an
/// existing record on the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub age: String,
    pub bio: String,
    pub location: String,
    pub profession: String,
    pub remote_id: Option<String>,
}

impl ProfileDraft {
    /// Builds a draft from a remote record, binding it to the record's id.
    pub fn from_record(record: &UserRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: text(&record.name),
            email: text(&record.email),
            age: text(&record.age),
            bio: text(&record.bio),
            location: text(&record.location),
            profession: text(&record.profession),
            remote_id: Some(record.id.clone()),
        }
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Email => &self.email,
            ProfileField::Age => &self.age,
            ProfileField::Bio => &self.bio,
            ProfileField::Location => &self.location,
            ProfileField::Profession => &self.profession,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Age => &mut self.age,
            ProfileField::Bio => &mut self.bio,
            ProfileField::Location => &mut self.location,
            ProfileField::Profession => &mut self.profession,
        };
        *slot = value.into();
    }

    /// Number of fields that are non-empty after trimming.
    pub fn filled_fields(&self) -> usize {
        ProfileField::all()
            .filter(|field| !self.get(*field).trim().is_empty())
            .count()
    }

    /// Builds the request body for a create or update call.
    pub fn to_payload(&self, username: &str, now: DateTime<Utc>) -> ProfilePayload {
        ProfilePayload {
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age.clone(),
            bio: self.bio.clone(),
            location: self.location.clone(),
            profession: self.profession.clone(),
            username: username.to_string(),
            updated_at: now.to_rfc3339(),
        }
    }
}

/// Body of `POST /users/create` and `PUT /users/update/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub name: String,
    pub email: String,
    pub age: String,
    pub bio: String,
    pub location: String,
    pub profession: String,
    pub username: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_field_names_round_trip() {
        assert_eq!(ProfileField::Profession.to_string(), "profession");
        assert_eq!(ProfileField::from_str("email").unwrap(), ProfileField::Email);
        assert!(ProfileField::from_str("password").is_err());
        assert_eq!(ProfileField::all().count(), ProfileField::COUNT);
    }

    #[test]
    fn test_from_record_fills_missing_with_empty() {
        let mut record = UserRecord::new("abc", "alice");
        record.name = Some("Alice".to_string());
        record.age = Some("30".to_string());

        let draft = ProfileDraft::from_record(&record);
        assert_eq!(draft.name, "Alice");
        assert_eq!(draft.age, "30");
        assert_eq!(draft.email, "");
        assert_eq!(draft.remote_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_set_and_get() {
        let mut draft = ProfileDraft::default();
        draft.set(ProfileField::Location, "Lisbon");
        assert_eq!(draft.get(ProfileField::Location), "Lisbon");
        assert_eq!(draft.location, "Lisbon");
    }

    #[test]
    fn test_filled_fields_ignores_whitespace() {
        let mut draft = ProfileDraft::default();
        assert_eq!(draft.filled_fields(), 0);

        draft.set(ProfileField::Name, "Alice");
        draft.set(ProfileField::Bio, "   ");
        assert_eq!(draft.filled_fields(), 1);
    }

    #[test]
    fn test_payload_carries_identity() {
        let mut draft = ProfileDraft::default();
        draft.set(ProfileField::Name, "Alice");
        let now = DateTime::parse_from_rfc3339("2024-05-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let payload = draft.to_payload("alice", now);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["updated_at"], "2024-05-01T09:30:00+00:00");
    }
}
