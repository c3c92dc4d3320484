//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// `play_list` was given a start index outside the episode list
    #[error("Start index {index} out of range for {len} episodes")]
    StartIndexOutOfRange { index: usize, len: usize },

    /// The media output refused a command
    #[error("Media output error: {0}")]
    Output(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog content is unusable
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
