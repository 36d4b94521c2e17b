use thiserror::Error;

/// Errors from the MangaDex API client.
#[derive(Debug, Error)]
pub enum MangaDexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}
