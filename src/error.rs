//! Error types for loading comparison input

use thiserror::Error;

/// Failure while reading or decoding a list of diff items.
#[derive(Error, Debug)]
pub enum InputError {
    /// Reading the input failed
    #[error("failed to read diff input: {0}")]
    Io(#[from] std::io::Error),

    /// Input was not a diff item list or comparison object
    #[error("invalid diff input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for input loading
pub type Result<T> = std::result::Result<T, InputError>;
