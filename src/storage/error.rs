/*!
 * Error types for storage operations
 */

use thiserror::Error;

/// Errors that can occur while listing or copying files
#[derive(Error, Debug)]
pub enum StorageError {
    /// Access token missing from configuration and environment
    #[error("Missing access token: {0}")]
    MissingToken(String),

    /// Access token rejected by the remote API
    #[error("Invalid access token: {0}")]
    Auth(String),

    /// Remote API returned an error status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Request could not be sent or its response read
    #[error("Request error: {0}")]
    Request(String),

    /// Listing root does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path outside of the listing root
    #[error("Path outside root: {0}")]
    OutsideRoot(String),

    /// IO error during storage operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        StorageError::Request(error.to_string())
    }
}

/// Specialized Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
