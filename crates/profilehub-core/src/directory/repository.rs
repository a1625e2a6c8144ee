//! User directory trait.
//!
//! Defines the interface to the remote user service.

use crate::error::Result;
use crate::user::{ProfilePayload, UserRecord};
use async_trait::async_trait;

/// An abstract client for the remote store of user records.
///
/// This trait decouples the synchronization logic from the transport
/// (HTTP, in-memory test doubles).
///
/// # Implementation Notes
///
/// Implementations must report every failure (unreachable service, timeout,
/// non-success status, malformed body) as an error; callers decide how to
/// surface it.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Lists every user record, in the order the service returns them.
    async fn list_users(&self) -> Result<Vec<UserRecord>>;

    /// Creates a record from `payload`.
    ///
    /// # Returns
    ///
    /// - `Ok(id)`: Identifier assigned by the service
    /// - `Err(_)`: The record was not created
    async fn create_user(&self, payload: &ProfilePayload) -> Result<String>;

    /// Overwrites the editable attributes of record `id`.
    async fn update_user(&self, id: &str, payload: &ProfilePayload) -> Result<()>;
}
