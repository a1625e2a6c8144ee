//! Application layer for ProfileHub.
//!
//! This crate provides the use cases that coordinate the domain model with
//! the remote user and authentication services.

pub mod directory_cache;
pub mod profile_store;
pub mod registration;
pub mod sync_controller;

pub use directory_cache::DirectoryCache;
pub use profile_store::ProfileStore;
pub use registration::{RegistrationResult, RegistrationUseCase};
pub use sync_controller::{FetchOutcome, SubmitOutcome, SyncController, SyncState};
