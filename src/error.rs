//! Error types shared by the store, the dispatcher and the server shell.

use axum::http::{Method, StatusCode};
use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or serving a record collection.
#[derive(Debug, Error)]
pub enum Error {
    /// A constructor was handed an unusable argument (empty path, empty address).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing the data file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be decoded or encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The dispatcher has no handler chain for this verb.
    #[error("do not know how to handle request of type: {0}")]
    UnsupportedMethod(Method),

    /// A required query parameter was absent or empty.
    #[error("{0} not found in parameters")]
    MissingParameter(&'static str),

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status reported to the client when this error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingParameter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the error is a missing data file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
