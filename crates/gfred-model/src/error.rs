//! Model error types.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while loading or encoding mission data.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Mission file could not be read.
    #[error("Failed to read mission file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mission JSON is malformed or does not match the model.
    #[error("Invalid mission data: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => Some("Check that the mission file exists and is readable."),
            Self::Json(_) => {
                Some("Check that the file is a mission export with objects, events and goals.")
            }
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
