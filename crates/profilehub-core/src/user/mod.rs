//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: Remote user record (`UserRecord`)
//! - `draft`: Locally edited profile form (`ProfileDraft`, `ProfileField`, `ProfilePayload`)
//! - `identity`: The logged-in user (`CurrentUser`)
//!
//! # Usage
//!
//! ```ignore
//! use profilehub_core::user::{CurrentUser, ProfileDraft, ProfileField, UserRecord};
//! ```

mod draft;
mod identity;
mod model;

// Re-export public API
pub use draft::{ProfileDraft, ProfileField, ProfilePayload};
pub use identity::CurrentUser;
pub use model::UserRecord;
