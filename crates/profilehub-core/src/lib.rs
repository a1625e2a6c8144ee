pub mod auth;
pub mod directory;
pub mod error;
pub mod message;
pub mod stats;
pub mod user;
pub mod validation;

// Re-export common error type
pub use error::{ProfileError, Result};
