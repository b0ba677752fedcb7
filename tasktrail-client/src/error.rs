//! Client error types.

use reqwest::StatusCode;

/// Session persistence failures
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// API client failures
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request never produced a response, or the body was not the expected JSON
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{status}: {message}")]
    Api {
        status: StatusCode,
        error: String,
        message: String,
    },

    /// Operation needs a session and none is stored
    #[error("Not logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
