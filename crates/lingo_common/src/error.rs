//! Error types for Lingo.

use thiserror::Error;

/// Failures reported by the remote chat and translation services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("unexpected status code {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("service returned an empty response")]
    EmptyResponse,

    #[error("{0} is not configured")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("No profile with id {0}")]
    NotFound(i64),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Path node {0} is locked")]
    Locked(usize),

    #[error("No exercises available for {0}")]
    NoExercises(String),

    #[error("Background task was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LingoError {
    /// Stable numeric code, used as the CLI exit status.
    pub fn code(&self) -> i32 {
        match self {
            LingoError::Config(_) => 2,
            LingoError::Store(_) => 3,
            LingoError::NotFound(_) => 4,
            LingoError::Gateway(_) => 5,
            LingoError::Locked(_) => 6,
            LingoError::NoExercises(_) => 7,
            LingoError::Cancelled => 8,
            LingoError::Io(_) => 9,
            LingoError::Json(_) => 10,
            LingoError::Internal(_) => 11,
        }
    }
}

pub type Result<T, E = LingoError> = std::result::Result<T, E>;
