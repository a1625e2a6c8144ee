//! User directory domain module.
//!
//! # Module Structure
//!
//! - `repository`: Port to the remote user service (`UserDirectory`)

mod repository;

// Re-export public API
pub use repository::UserDirectory;
