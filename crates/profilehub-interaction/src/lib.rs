//! REST adapters for the remote user and authentication services.

mod http;

pub mod auth_provider;
pub mod user_directory;

pub use auth_provider::HttpAuthProvider;
pub use user_directory::{HttpUserDirectory, ServiceHealth};
