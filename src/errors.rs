//! Upload Error Definitions
//!
//! This module defines all error types for the resumable upload client.
//! Errors are categorized into local errors (file, argument, encoding),
//! transport errors, and server errors.

use thiserror::Error;

/// Result type alias for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Base error type for all upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    /// Source file is missing, unreadable or not a regular file
    #[error("File doesn't exist: {0}")]
    FileNotFound(String),

    /// Invalid argument was provided
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The HTTP client could not be constructed
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// Network-related error
    #[error("Network error during {operation} to {url}: {source}")]
    Transport {
        operation: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with an unexpected status.
    ///
    /// The response body is surfaced verbatim as the message.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Multipart body could not be constructed
    #[error("Failed to encode multipart body: {0}")]
    Encoding(String),

    /// A chunk was requested behind the reader's cursor
    #[error("Chunk {index} read out of order: cursor at byte {consumed}, chunk starts at byte {offset}")]
    OutOfOrderRead { index: u64, offset: u64, consumed: u64 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Returns the HTTP status for server errors
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
