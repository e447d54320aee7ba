//! Shared error type for the data-access layer.

use thiserror::Error;

/// Errors surfaced by backend adapters.
///
/// None of these are fatal: callers log them and treat the triggering action
/// as retryable by the user.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("not found")]
    NotFound,

    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
