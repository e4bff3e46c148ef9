//! Phase implementations and the state they share during one pass.

mod assets;
mod expressions;
mod objects;
mod performance;

use std::collections::{BTreeMap, BTreeSet};

use gfred_model::{MissionProvider, ValidationResult};

use crate::cache::ValidationCache;
use crate::collaborators::{AssetChecker, ExpressionValidator};
use crate::config::PerformanceLimits;
use crate::graph::{DependencyGraph, DependencyInfo};
use crate::phase::Phase;

/// Borrowed engine state plus the results accumulated by a running pass.
pub(crate) struct PassContext<'a> {
    pub mission: &'a dyn MissionProvider,
    pub graph: &'a mut DependencyGraph,
    pub cache: &'a mut ValidationCache,
    pub asset_checker: Option<&'a dyn AssetChecker>,
    pub expression_validator: Option<&'a dyn ExpressionValidator>,
    pub limits: &'a PerformanceLimits,
    pub mission_result: ValidationResult,
    pub entity_results: BTreeMap<String, ValidationResult>,
    dependencies: DependencyCollector,
}

impl<'a> PassContext<'a> {
    pub fn new(
        mission: &'a dyn MissionProvider,
        graph: &'a mut DependencyGraph,
        cache: &'a mut ValidationCache,
        asset_checker: Option<&'a dyn AssetChecker>,
        expression_validator: Option<&'a dyn ExpressionValidator>,
        limits: &'a PerformanceLimits,
    ) -> Self {
        Self {
            mission,
            graph,
            cache,
            asset_checker,
            expression_validator,
            limits,
            mission_result: ValidationResult::valid(),
            entity_results: BTreeMap::new(),
            dependencies: DependencyCollector::default(),
        }
    }

    /// Result slot for `key`, created empty on first use.
    pub fn entity_result(&mut self, key: &str) -> &mut ValidationResult {
        self.entity_results.entry(key.to_string()).or_default()
    }

    /// Register that `owner` depends on `info.dependency_path`.
    ///
    /// The first registration of a path decides its validity for the pass.
    /// Later owners are only added as dependents.
    pub fn depend(&mut self, owner: &str, info: DependencyInfo) {
        self.dependencies.record(owner, info);
    }

    /// Write every dependency registered so far into the graph.
    pub fn flush_dependencies(&mut self) {
        self.dependencies.flush(self.graph);
    }

    pub fn finish(self) -> (ValidationResult, BTreeMap<String, ValidationResult>) {
        (self.mission_result, self.entity_results)
    }
}

/// Dependencies registered during a pass, grouped by target path.
///
/// The graph upserts by path, so each node is written with the complete
/// dependent set of every owner before it is attached to those owners.
#[derive(Debug, Default)]
struct DependencyCollector {
    targets: BTreeMap<String, DependencyInfo>,
    links: Vec<(String, String)>,
    linked: BTreeSet<(String, String)>,
}

impl DependencyCollector {
    fn record(&mut self, owner: &str, info: DependencyInfo) {
        let path = info.dependency_path.clone();
        self.targets
            .entry(path.clone())
            .or_insert(info)
            .dependent_objects
            .insert(owner.to_string());

        let link = (owner.to_string(), path);
        if self.linked.insert(link.clone()) {
            self.links.push(link);
        }
    }

    fn flush(&self, graph: &mut DependencyGraph) {
        for (owner, path) in &self.links {
            if let Some(info) = self.targets.get(path) {
                graph.add_dependency(owner, info.clone());
            }
        }
    }
}

/// Run one phase against the pass context.
pub(crate) fn run(phase: Phase, ctx: &mut PassContext<'_>) {
    match phase {
        Phase::Objects => objects::run(ctx),
        Phase::Assets => assets::run(ctx),
        Phase::Expressions => expressions::run(ctx),
        Phase::Performance => performance::run(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyType;

    #[test]
    fn test_collector_writes_full_dependents_for_every_owner() {
        let mut collector = DependencyCollector::default();
        collector.record(
            "object:a",
            DependencyInfo::new("object:a", DependencyType::Asset, "GTF Ulysses").invalid("gone"),
        );
        collector.record(
            "object:b",
            DependencyInfo::new("object:b", DependencyType::Asset, "GTF Ulysses"),
        );

        let mut graph = DependencyGraph::new();
        collector.flush(&mut graph);

        let node = graph.node("GTF Ulysses").unwrap();
        assert!(!node.is_valid);
        assert_eq!(node.object_id, "object:a");
        assert_eq!(node.dependent_objects.len(), 2);
        assert_eq!(graph.get_dependents("GTF Ulysses"), vec!["object:a", "object:b"]);
    }

    #[test]
    fn test_collector_flush_is_repeatable() {
        let mut collector = DependencyCollector::default();
        collector.record(
            "wing:Alpha",
            DependencyInfo::new("wing:Alpha", DependencyType::ObjectReference, "object:a"),
        );

        let mut graph = DependencyGraph::new();
        collector.flush(&mut graph);
        collector.flush(&mut graph);

        assert_eq!(graph.get_dependencies("wing:Alpha").len(), 1);
    }
}
