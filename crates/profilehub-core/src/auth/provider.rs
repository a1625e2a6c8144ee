//! Authentication provider trait.

use super::model::{AuthSession, RegisterOutcome};
use crate::error::Result;
use async_trait::async_trait;

/// The external authentication collaborator.
///
/// Registration problems the service reports (duplicate username, missing
/// fields) come back as an unsuccessful [`RegisterOutcome`]; `Err` is
/// reserved for transport failures.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> Result<RegisterOutcome>;

    async fn login(&self, username: &str, password: &str) -> Result<AuthSession>;

    /// Drops the session held by this provider. Tokens are stateless, so no
    /// remote call is made.
    async fn logout(&self);
}
