use crate::user::CurrentUser;
use serde::{Deserialize, Serialize};

/// Result of a registration attempt as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegisterOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// A logged-in session issued by the auth service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub username: String,
    pub token: String,
}

impl AuthSession {
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser::new(self.username.clone())
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_debug_hides_token() {
        let session = AuthSession {
            username: "alice".to_string(),
            token: "jwt-secret".to_string(),
        };
        let debug = format!("{:?}", session);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("jwt-secret"));
    }
}
