//! Registration and login use case.
//!
//! Validates the registration form locally before delegating to the
//! authentication service, and turns a login into the `CurrentUser` the
//! profile controller is constructed with.

use profilehub_core::Result;
use profilehub_core::auth::AuthProvider;
use profilehub_core::user::CurrentUser;
use profilehub_core::validation::{RegistrationForm, ValidationError, validate_registration};
use std::sync::Arc;

pub const REGISTERED_MESSAGE: &str = "Registration successful! Redirecting to login...";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";

/// Result of a registration attempt, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationResult {
    /// Account created; the user should log in next.
    Registered { message: String },
    /// The auth service refused (e.g. username taken).
    Rejected { message: String },
    /// Rejected locally; nothing was sent.
    Invalid(ValidationError),
    /// The auth service could not be reached.
    Failed { message: String },
}

impl RegistrationResult {
    pub fn message(&self) -> String {
        match self {
            Self::Registered { message }
            | Self::Rejected { message }
            | Self::Failed { message } => message.clone(),
            Self::Invalid(err) => err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

/// Coordinates registration, login and logout against the auth service.
pub struct RegistrationUseCase {
    auth: Arc<dyn AuthProvider>,
}

impl RegistrationUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }

    /// Validates `form` and registers the trimmed username.
    pub async fn register(&self, form: &RegistrationForm) -> RegistrationResult {
        if let Err(err) = validate_registration(form) {
            tracing::debug!("Registration form rejected: {}", err);
            return RegistrationResult::Invalid(err);
        }

        let username = form.username.trim();
        match self.auth.register(username, &form.password).await {
            Ok(outcome) if outcome.success => RegistrationResult::Registered {
                message: REGISTERED_MESSAGE.to_string(),
            },
            Ok(outcome) => RegistrationResult::Rejected {
                message: outcome
                    .message
                    .unwrap_or_else(|| REGISTRATION_FAILED_MESSAGE.to_string()),
            },
            Err(e) => {
                tracing::error!("Registration of '{}' failed: {}", username, e);
                RegistrationResult::Failed {
                    message: REGISTRATION_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Logs in and returns the identity to build a profile controller for.
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentUser> {
        let session = self.auth.login(username.trim(), password).await?;
        Ok(session.current_user())
    }

    pub async fn logout(&self) {
        self.auth.logout().await;
    }
}
