//! Error types for the Lumen assistant daemon

use thiserror::Error;

/// Result type alias for Lumen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Lumen daemon
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Gesture processing error
    #[error("gesture error: {0}")]
    Gesture(String),

    /// Vision inference error
    #[error("vision error: {0}")]
    Vision(String),

    /// Speech synthesis error
    #[error("speech error: {0}")]
    Speech(String),

    /// Audio error
    #[error("audio error: {0}")]
    Audio(String),

    /// App launch error
    #[error("launch error: {0}")]
    Launch(String),

    /// Preference store error
    #[error("store error: {0}")]
    Store(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
