//! Error types for lodestar

use thiserror::Error;

/// Result type alias using [`LodestarError`]
pub type Result<T> = std::result::Result<T, LodestarError>;

/// Main error type for lodestar
#[derive(Debug, Error)]
pub enum LodestarError {
    /// Invalid or ambiguous configuration (e.g. dataset selector)
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A selector resolved to nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure reported by the external dataset service
    #[error("Transport error during {context}: {message}")]
    Transport { context: String, message: String },

    /// Decode or schema-mismatch failure, carrying the offending text
    #[error("Parse error: {message}")]
    Parse { message: String, raw: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error at a crate edge
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LodestarError {
    /// Build a [`LodestarError::Parse`] keeping the raw text for diagnosis
    pub fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Build a [`LodestarError::Transport`] naming the originating call
    pub fn transport(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
            message: message.into(),
        }
    }
}
