//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: Session and registration results (`AuthSession`, `RegisterOutcome`)
//! - `provider`: Port to the authentication service (`AuthProvider`)

mod model;
mod provider;

// Re-export public API
pub use model::{AuthSession, RegisterOutcome};
pub use provider::AuthProvider;
