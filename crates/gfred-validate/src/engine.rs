//! Phased, time-bounded mission validation.

use std::fmt;
use std::sync::Arc;

use gfred_model::MissionProvider;

use crate::cache::ValidationCache;
use crate::clock::{Clock, SystemClock};
use crate::collaborators::{AssetChecker, ExpressionValidator};
use crate::config::ValidationConfig;
use crate::graph::{DependencyGraph, DependencyInfo};
use crate::phase::{Phase, ValidationProgress};
use crate::phases::{self, PassContext};
use crate::report::MissionValidationReport;

/// Where the engine is within the current or last pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    RunningPhase(Phase),
    Aggregating,
    Done,
}

/// Runs validation passes and owns the artifacts they leave behind.
///
/// Each pass rebuilds the [`DependencyGraph`] from scratch. Per-entity
/// results are memoized in a [`ValidationCache`] across passes, keyed by
/// content fingerprint, so unchanged entities are not re-checked until the
/// cache entry expires.
pub struct ValidationEngine {
    config: ValidationConfig,
    clock: Arc<dyn Clock>,
    cache: ValidationCache,
    graph: DependencyGraph,
    asset_checker: Option<Box<dyn AssetChecker>>,
    expression_validator: Option<Box<dyn ExpressionValidator>>,
    state: EngineState,
    passes: u64,
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("graph_nodes", &self.graph.len())
            .field("asset_checker", &self.asset_checker.is_some())
            .field("expression_validator", &self.expression_validator.is_some())
            .field("state", &self.state)
            .field("passes", &self.passes)
            .finish()
    }
}

impl ValidationEngine {
    /// Engine using the system clock and no collaborators.
    ///
    /// Without collaborators the asset and expression phases only report
    /// that they are unavailable.
    pub fn new(config: ValidationConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Engine whose budget and cache expiry follow `clock`.
    pub fn with_clock(config: ValidationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: ValidationCache::with_clock(config.cache_timeout(), Arc::clone(&clock)),
            config,
            clock,
            graph: DependencyGraph::new(),
            asset_checker: None,
            expression_validator: None,
            state: EngineState::Idle,
            passes: 0,
        }
    }

    #[must_use]
    pub fn with_asset_checker(mut self, checker: impl AssetChecker + 'static) -> Self {
        self.asset_checker = Some(Box::new(checker));
        self
    }

    #[must_use]
    pub fn with_expression_validator(
        mut self,
        validator: impl ExpressionValidator + 'static,
    ) -> Self {
        self.expression_validator = Some(Box::new(validator));
        self
    }

    /// Replace the asset checker, dropping cached results checked against
    /// the old one.
    pub fn set_asset_checker(&mut self, checker: impl AssetChecker + 'static) {
        self.asset_checker = Some(Box::new(checker));
        self.clear_cache();
    }

    /// Change the per-pass budget, e.g. for a slower on-demand full check.
    pub fn set_max_validation_time_ms(&mut self, budget_ms: u64) {
        self.config.max_validation_time_ms = budget_ms;
    }

    /// Run a full validation pass.
    pub fn validate(&mut self, mission: &dyn MissionProvider) -> MissionValidationReport {
        self.validate_with_progress(mission, |_| {})
    }

    /// Run a full validation pass, reporting progress as phases start and
    /// finish.
    ///
    /// The budget is checked after every phase. Once it is spent the
    /// remaining phases are skipped and contribute nothing to the graph.
    pub fn validate_with_progress<F>(
        &mut self,
        mission: &dyn MissionProvider,
        mut on_progress: F,
    ) -> MissionValidationReport
    where
        F: FnMut(ValidationProgress),
    {
        self.passes += 1;
        let pass_id = self.passes;
        let span = tracing::info_span!("validation_pass", pass_id, mission = mission.name());
        let _pass = span.enter();

        let started = self.clock.now();
        let budget = self.config.budget();
        let purged = self.cache.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "dropped expired cache entries");
        }
        self.graph.begin_pass(pass_id);

        let mut ctx = PassContext::new(
            mission,
            &mut self.graph,
            &mut self.cache,
            self.asset_checker.as_deref(),
            self.expression_validator.as_deref(),
            &self.config.limits,
        );

        let all = Phase::all();
        let mut completed = Vec::with_capacity(all.len());
        let mut skipped = Vec::new();
        let mut fraction = 0.0_f32;

        for (index, &phase) in all.iter().enumerate() {
            self.state = EngineState::RunningPhase(phase);
            on_progress(ValidationProgress {
                phase,
                fraction,
                finished: false,
            });

            {
                let phase_span = tracing::debug_span!("phase", phase = phase.label());
                let _phase = phase_span.enter();
                phases::run(phase, &mut ctx);
                ctx.flush_dependencies();
                ctx.graph.mark_phase_complete(phase);
            }
            completed.push(phase);

            fraction = if index + 1 == all.len() {
                1.0
            } else {
                (fraction + phase.weight()).min(1.0)
            };
            on_progress(ValidationProgress {
                phase,
                fraction,
                finished: true,
            });

            let remaining = &all[index + 1..];
            let elapsed = self.clock.now().saturating_duration_since(started);
            if !remaining.is_empty() && elapsed >= budget {
                skipped.extend_from_slice(remaining);
                let labels: Vec<&str> = remaining.iter().map(Phase::label).collect();
                ctx.mission_result.add_warning(format!(
                    "Validation timeout: {} ms budget spent after {}, skipped {}",
                    self.config.max_validation_time_ms,
                    phase.label(),
                    labels.join(", ")
                ));
                tracing::warn!(
                    elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    budget_ms = self.config.max_validation_time_ms,
                    skipped = skipped.len(),
                    "validation truncated"
                );
                break;
            }
        }

        self.state = EngineState::Aggregating;
        let (mission_result, entity_results) = ctx.finish();
        let elapsed = self.clock.now().saturating_duration_since(started);

        let report = MissionValidationReport {
            mission: mission.name().to_string(),
            pass_id,
            mission_result,
            entity_results,
            completed_phases: completed,
            skipped_phases: skipped,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        };

        tracing::info!(
            valid = report.is_valid(),
            errors = report.total_errors(),
            warnings = report.total_warnings(),
            graph_nodes = self.graph.len(),
            elapsed_ms = report.elapsed_ms,
            "validation pass complete"
        );
        self.state = EngineState::Done;
        report
    }

    /// Graph rebuilt by the last pass.
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn get_dependencies(&self, owner_id: &str) -> Vec<&DependencyInfo> {
        self.graph.get_dependencies(owner_id)
    }

    pub fn get_dependents(&self, path: &str) -> Vec<&str> {
        self.graph.get_dependents(path)
    }

    /// Force the next pass to re-check every entity.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        tracing::debug!("validation cache cleared");
    }

    pub fn cache(&self) -> &ValidationCache {
        &self.cache
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Number of passes run so far.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }
}
