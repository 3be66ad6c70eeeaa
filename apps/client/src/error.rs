use thiserror::Error;

use crate::messages::friendly_message;

/// Errors surfaced by the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body still carried an `error` field.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// A short user-facing message for this error, derived from the status
    /// code where one exists.
    pub fn friendly(&self) -> &'static str {
        match self {
            ClientError::FileTooLarge { .. } => "The file is too large. The limit is 10 MB.",
            ClientError::UnsupportedFileType(_) => "This file type is not supported.",
            ClientError::Api { status, .. } => friendly_message(Some(*status)),
            ClientError::Http(e) => friendly_message(e.status().map(|s| s.as_u16())),
            ClientError::UnexpectedResponse(_) => friendly_message(Some(500)),
        }
    }
}
