//! Error types for SkinLens Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A form field failed client-side validation; the message is user-facing
    #[error("{0}")]
    Validation(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    // Session store errors
    #[error("Session store error: {0}")]
    SessionStore(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
