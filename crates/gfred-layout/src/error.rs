//! Error types for layout configuration.

use thiserror::Error;

/// Layout error.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A configuration value is out of range.
    #[error("Invalid layout configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid setting.
        message: String,
    },
}

impl LayoutError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig { .. } => Some(
                "Strengths and radius must be finite and non-negative; damping and decay must lie in (0, 1].",
            ),
        }
    }
}

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
