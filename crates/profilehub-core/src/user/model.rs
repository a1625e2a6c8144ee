//! UserRecord domain model.
//!
//! Represents a user record as stored by the remote user service.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A user record as returned by the remote user service.
///
/// `id` and `username` are identity fields assigned by the service and never
/// change. Every other attribute is optional and editable by its owner.
/// Unknown fields in the wire format are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Service-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Login name of the owner
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Age as entered in the form; the service stores it as sent, so it may
    /// arrive as a string or a number.
    #[serde(
        default,
        deserialize_with = "deserialize_loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    /// Creation time assigned by the service
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time assigned by the service
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Creates a record with only its identity fields set.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            name: None,
            email: None,
            age: None,
            bio: None,
            location: None,
            profession: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Name to show for this user: the profile name if set, else the username.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }

    /// Avatar initials.
    ///
    /// First and last initials of a multi-word name, the first letter of a
    /// single-word name, the first letter of the username when no name is
    /// set, and `"U"` when neither is available.
    pub fn initials(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            let words: Vec<&str> = name.split_whitespace().collect();
            let first = words.first().and_then(|w| w.chars().next());
            let last = words.last().and_then(|w| w.chars().next());
            return match (words.len(), first, last) {
                (n, Some(f), Some(l)) if n > 1 => format!("{f}{l}").to_uppercase(),
                (_, Some(f), _) => f.to_uppercase().collect(),
                _ => "U".to_string(),
            };
        }

        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }
}

/// Accepts a JSON string, number or null.
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts RFC 3339 as well as the naive ISO-8601 form the service emits
/// (`2024-05-01T09:30:00.123456`), which is interpreted as UTC. Anything
/// unparseable is treated as absent so one bad record cannot fail a listing.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
