//! Infrastructure layer for ProfileHub: configuration, paths and logging.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::ClientConfig;
pub use logging::init_tracing;
pub use paths::ProfileHubPaths;
