use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("GitHub API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        message: String,
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Actor error: {0}")]
    Actor(String),
}

/// Coarse classification of a failed API call, used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    RateLimited,
    Transport,
    Other,
}

impl ExplorerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExplorerError::NotFound(_) => FailureKind::NotFound,
            ExplorerError::RateLimitExceeded { .. } => FailureKind::RateLimited,
            ExplorerError::NetworkError(e) if e.is_decode() => FailureKind::Other,
            ExplorerError::NetworkError(_) | ExplorerError::IoError(_) => FailureKind::Transport,
            _ => FailureKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
