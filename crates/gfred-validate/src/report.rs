//! Aggregated result of one validation pass.

use std::collections::BTreeMap;

use gfred_model::ValidationResult;
use serde::Serialize;

use crate::phase::Phase;

/// Mission-level result plus every per-entity result of a pass.
///
/// The report is valid only when the mission result and all entity results
/// are valid. Counts sum over both levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissionValidationReport {
    pub mission: String,
    pub pass_id: u64,
    /// Structural problems, budget and collaborator notices.
    pub mission_result: ValidationResult,
    /// Results keyed by entity key (`object:alpha-1`, `event:Arrival`, ...).
    pub entity_results: BTreeMap<String, ValidationResult>,
    pub completed_phases: Vec<Phase>,
    pub skipped_phases: Vec<Phase>,
    pub elapsed_ms: u64,
}

impl MissionValidationReport {
    pub fn is_valid(&self) -> bool {
        self.mission_result.is_valid() && self.entity_results.values().all(ValidationResult::is_valid)
    }

    pub fn total_errors(&self) -> usize {
        self.mission_result.error_count()
            + self
                .entity_results
                .values()
                .map(ValidationResult::error_count)
                .sum::<usize>()
    }

    pub fn total_warnings(&self) -> usize {
        self.mission_result.warning_count()
            + self
                .entity_results
                .values()
                .map(ValidationResult::warning_count)
                .sum::<usize>()
    }

    /// Whether the budget cut the pass short.
    pub fn truncated(&self) -> bool {
        !self.skipped_phases.is_empty()
    }

    pub fn entity(&self, key: &str) -> Option<&ValidationResult> {
        self.entity_results.get(key)
    }

    /// Entity results carrying at least one error.
    pub fn invalid_entities(&self) -> impl Iterator<Item = (&str, &ValidationResult)> {
        self.entity_results
            .iter()
            .filter(|(_, result)| !result.is_valid())
            .map(|(key, result)| (key.as_str(), result))
    }

    /// Every error message, mission-level first, entity errors prefixed by key.
    pub fn all_errors(&self) -> Vec<String> {
        let mut errors = self.mission_result.errors.clone();
        for (key, result) in &self.entity_results {
            errors.extend(result.errors.iter().map(|e| format!("{key}: {e}")));
        }
        errors
    }

    /// Every warning message, formatted like [`all_errors`](Self::all_errors).
    pub fn all_warnings(&self) -> Vec<String> {
        let mut warnings = self.mission_result.warnings.clone();
        for (key, result) in &self.entity_results {
            warnings.extend(result.warnings.iter().map(|w| format!("{key}: {w}")));
        }
        warnings
    }
}
