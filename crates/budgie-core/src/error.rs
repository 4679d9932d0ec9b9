//! Error types for Budgie

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("AI provider not configured: {0}")]
    NotConfigured(String),

    #[error("AI provider error: {0}")]
    Provider(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// True when the provider answered but its output could not be decoded
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedResponse(_))
    }

    /// True when the caller supplied data that cannot be used
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Error::InvalidData(_))
    }

    /// True when no AI provider credential is available
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Error::NotConfigured(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
