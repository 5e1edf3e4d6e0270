//! Look up GitHub repositories by `owner/name`, keep a persisted list of the
//! ones found, and browse a repository's counters and open issues.

pub mod actors;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod messages;
pub mod pool;
pub mod render;
pub mod server;
pub mod storage;
pub mod store;
pub mod surreal_client;
pub mod types;

pub use error::{ExplorerError, FailureKind, Result};
