//! Global error handling for bidsort
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::storage::StorageError;

/// Global error type for bidsort operations
#[derive(Error, Debug)]
pub enum BidsortError {
    /// Remote or local storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No prefix of the filename is a key of the subject table
    #[error("Subject not found for: {0}")]
    SubjectNotFound(String),

    /// Unknown field or unparsable value in a record override
    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    /// A metadata sidecar matched more than one data file
    #[error("Ambiguous sidecar: {0}")]
    AmbiguousSidecar(String),

    /// A record referenced by a duplicate group or sidecar match is missing
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for bidsort operations
pub type Result<T> = std::result::Result<T, BidsortError>;

/// Creates a BidsortError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::BidsortError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            BidsortError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

impl From<BidsortError> for io::Error {
    fn from(err: BidsortError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}
