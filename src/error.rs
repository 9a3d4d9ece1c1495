use crate::storage::StorageError;
use crate::validation::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The API rejected the bearer token; the session has been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Classification failed: {0}")]
    Rejected(String),
    #[error("{operation} is not available on the {surface} console")]
    Unsupported { operation: &'static str, surface: &'static str },
}

impl ClientError {
    /// Terminal failures end the current page; everything else is rendered inline.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
