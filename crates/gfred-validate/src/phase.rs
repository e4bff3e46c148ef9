//! Validation phases and progress reporting.

use serde::{Deserialize, Serialize};

/// One step of a validation pass, executed in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Objects,
    Assets,
    Expressions,
    Performance,
}

impl Phase {
    /// All phases in execution order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Objects,
            Self::Assets,
            Self::Expressions,
            Self::Performance,
        ]
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Objects => "object validation",
            Self::Assets => "asset validation",
            Self::Expressions => "expression validation",
            Self::Performance => "performance validation",
        }
    }

    /// Share of the progress bar this phase accounts for.
    ///
    /// Weights sum to 1.0. They drive progress reporting only, never the
    /// time budget.
    pub const fn weight(&self) -> f32 {
        match self {
            Self::Objects => 0.4,
            Self::Assets => 0.2,
            Self::Expressions => 0.3,
            Self::Performance => 0.1,
        }
    }
}

/// Progress notification emitted when a phase starts and when it finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationProgress {
    pub phase: Phase,
    /// Completed share of the pass in `0.0..=1.0`.
    pub fraction: f32,
    /// Whether `phase` has just finished.
    pub finished: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = Phase::all().iter().map(Phase::weight).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_phase_order() {
        let mut sorted = Phase::all().to_vec();
        sorted.sort();
        assert_eq!(sorted, Phase::all());
    }
}
