//! Error types for caller mistakes outside a validation pass.
//!
//! Mission problems are never errors here. They are messages in the
//! validation report.

use std::path::PathBuf;
use thiserror::Error;

/// Validation infrastructure error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidateError {
    /// A validation pass was requested while another is still running.
    #[error("A validation pass is already in flight")]
    Busy,

    /// Configuration values are inconsistent.
    #[error("Invalid validation configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid setting.
        message: String,
    },

    /// Collaborator data file could not be read.
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Collaborator data file is not valid JSON.
    #[error("Invalid asset catalog: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidateError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if the caller can simply retry later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Busy => Some("Retry after the running validation pass finishes."),
            Self::InvalidConfig { .. } => {
                Some("Check that every soft limit is at most its hard limit.")
            }
            Self::Io { .. } => Some("Check that the file exists and is readable."),
            Self::Json(_) => Some("The asset catalog must be a JSON array of asset names."),
        }
    }
}

/// Result type alias for validation infrastructure operations.
pub type Result<T> = std::result::Result<T, ValidateError>;
