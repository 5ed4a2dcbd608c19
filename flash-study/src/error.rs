//! Error types for flash-study
//!
//! Failures never escape the study loop: the runtime turns them into text
//! shown in the upload banner, the card list notice or the feedback panel.

use thiserror::Error;

/// Outbound call failures
#[derive(Error, Debug)]
pub enum StudyError {
    /// Connection refused, timeout, DNS, ...
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status with the response text
    #[error("HTTP {0}: {1}")]
    Status(u16, String),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Reading the file to upload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for StudyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StudyError::Parse(e.to_string())
        } else {
            StudyError::Network(e.to_string())
        }
    }
}

/// Convenience Result type for outbound calls
pub type Result<T> = std::result::Result<T, StudyError>;
