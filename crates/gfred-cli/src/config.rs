//! TOML configuration for the `gfred` command.
//!
//! Every section is optional; missing keys fall back to the library defaults.
//!
//! ```toml
//! [validation]
//! max_validation_time_ms = 2000
//! cache_timeout_ms = 30000
//!
//! [validation.limits]
//! object_soft_limit = 200
//!
//! [layout]
//! iterations = 10
//!
//! [scheduler]
//! debounce_ms = 250
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gfred_layout::LayoutConfig;
use gfred_validate::{SchedulerConfig, ValidationConfig};
use serde::{Deserialize, Serialize};

/// Effective settings of one `gfred` invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GfredConfig {
    pub validation: ValidationConfig,
    pub layout: LayoutConfig,
    pub scheduler: SchedulerConfig,
}

impl GfredConfig {
    /// Parse and check a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("invalid configuration file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no configuration file given, using defaults");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("in configuration {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.validation.validate()?;
        self.layout.validate()?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }
}
