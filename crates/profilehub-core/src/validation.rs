//! Form validation rules.
//!
//! Profile and registration forms are checked rule by rule; the first failing
//! rule is reported. Validation never touches the network or any state.

use crate::user::ProfileDraft;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum length of a trimmed username.
pub const MIN_USERNAME_LEN: usize = 3;
/// Minimum length of a password.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Inclusive bounds for the optional age attribute.
pub const AGE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=150.0;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// A form rejected by local rules. The display text is shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid age between 1 and 150")]
    InvalidAge,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

/// Checks a profile draft before submission.
///
/// Rules, in order: name present, email containing a `local@domain.tld`
/// shape when given, age a number in `1..=150` when given.
pub fn validate_profile(draft: &ProfileDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !draft.email.is_empty() && !is_valid_email(&draft.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !draft.age.is_empty() && !is_valid_age(&draft.age) {
        return Err(ValidationError::InvalidAge);
    }
    Ok(())
}

/// Checks a registration form before it is sent to the auth service.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_age(age: &str) -> bool {
    age.trim()
        .parse::<f64>()
        .map(|value| value.is_finite() && AGE_RANGE.contains(&value))
        .unwrap_or(false)
}
