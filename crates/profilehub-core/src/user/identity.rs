use serde::{Deserialize, Serialize};

/// Identity of the logged-in user.
///
/// Handed to the components that need it at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
}

impl CurrentUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Whether `record` belongs to this user.
    pub fn owns(&self, record: &super::UserRecord) -> bool {
        record.username == self.username
    }
}
