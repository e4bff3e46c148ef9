//! Validation engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidateError};

/// Soft and hard limits for the performance phase.
///
/// Exceeding a soft limit is a warning, exceeding a hard limit an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceLimits {
    pub object_soft_limit: usize,
    pub object_hard_limit: usize,
    pub wing_soft_limit: usize,
    pub wing_hard_limit: usize,
    pub event_soft_limit: usize,
    pub event_hard_limit: usize,
}

impl Default for PerformanceLimits {
    fn default() -> Self {
        Self {
            object_soft_limit: 200,
            object_hard_limit: 400,
            wing_soft_limit: 40,
            wing_hard_limit: 75,
            event_soft_limit: 150,
            event_hard_limit: 400,
        }
    }
}

/// Settings for a [`ValidationEngine`](crate::ValidationEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Wall-clock budget per pass, checked between phases.
    pub max_validation_time_ms: u64,
    /// Lifetime of cached per-entity results.
    pub cache_timeout_ms: u64,
    pub limits: PerformanceLimits,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_validation_time_ms: 2000,
            cache_timeout_ms: 30_000,
            limits: PerformanceLimits::default(),
        }
    }
}

impl ValidationConfig {
    /// Check that every soft limit is at most its hard limit.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        let pairs = [
            ("object", limits.object_soft_limit, limits.object_hard_limit),
            ("wing", limits.wing_soft_limit, limits.wing_hard_limit),
            ("event", limits.event_soft_limit, limits.event_hard_limit),
        ];
        for (what, soft, hard) in pairs {
            if soft > hard {
                return Err(ValidateError::invalid_config(format!(
                    "{what} soft limit {soft} exceeds hard limit {hard}"
                )));
            }
        }
        Ok(())
    }

    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.max_validation_time_ms)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ValidationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.budget(), Duration::from_secs(2));
    }

    #[test]
    fn test_soft_above_hard_is_rejected() {
        let mut config = ValidationConfig::default();
        config.limits.wing_soft_limit = 100;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("wing soft limit 100"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ValidationConfig =
            serde_json::from_str(r#"{"max_validation_time_ms": 50, "limits": {"event_hard_limit": 500}}"#)
                .unwrap();
        assert_eq!(config.max_validation_time_ms, 50);
        assert_eq!(config.cache_timeout_ms, 30_000);
        assert_eq!(config.limits.event_hard_limit, 500);
        assert_eq!(config.limits.event_soft_limit, 150);
    }
}
