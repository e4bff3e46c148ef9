//! Dependency graph rebuilt by every validation pass.
//!
//! Nodes are dependency targets keyed by path (an asset name, `sexp:<hash>`
//! for a scripted expression, or another entity's key). Edges map an owning
//! entity key to the ordered list of paths it depends on.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// What a dependency points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Ship class or other game asset.
    Asset,
    /// Scripted SEXP expression.
    SexpReference,
    /// Another mission entity.
    ObjectReference,
}

impl DependencyType {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::SexpReference => "SEXP",
            Self::ObjectReference => "Object",
        }
    }
}

/// One dependency target and its validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    /// Entity that registered this dependency first.
    pub object_id: String,
    pub dependency_type: DependencyType,
    pub dependency_path: String,
    pub is_valid: bool,
    pub error_message: Option<String>,
    /// Every entity that references this target.
    pub dependent_objects: BTreeSet<String>,
    /// Validation pass that produced this entry.
    pub pass_id: u64,
}

impl DependencyInfo {
    pub fn new(
        object_id: impl Into<String>,
        dependency_type: DependencyType,
        dependency_path: impl Into<String>,
    ) -> Self {
        let object_id = object_id.into();
        let mut dependent_objects = BTreeSet::new();
        dependent_objects.insert(object_id.clone());
        Self {
            object_id,
            dependency_type,
            dependency_path: dependency_path.into(),
            is_valid: true,
            error_message: None,
            dependent_objects,
            pass_id: 0,
        }
    }

    /// Mark the target as broken.
    #[must_use]
    pub fn invalid(mut self, message: impl Into<String>) -> Self {
        self.is_valid = false;
        self.error_message = Some(message.into());
        self
    }
}

/// Graph view handed to the layout: node ids plus `owner -> path` edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

/// Dependency edges of one validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, DependencyInfo>,
    edges: BTreeMap<String, Vec<String>>,
    pass_id: u64,
    completed_phases: Vec<Phase>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.completed_phases.clear();
    }

    /// Clear the graph and stamp subsequent entries with `pass_id`.
    pub fn begin_pass(&mut self, pass_id: u64) {
        self.clear();
        self.pass_id = pass_id;
    }

    /// Record that `phase` finished populating its part of the graph.
    pub fn mark_phase_complete(&mut self, phase: Phase) {
        if !self.completed_phases.contains(&phase) {
            self.completed_phases.push(phase);
        }
    }

    /// Pass that last rebuilt the graph.
    pub fn pass_id(&self) -> u64 {
        self.pass_id
    }

    /// Phases whose dependencies are present in this graph.
    pub fn completed_phases(&self) -> &[Phase] {
        &self.completed_phases
    }

    /// Upsert a node without attaching it to an owner.
    ///
    /// Re-adding a path replaces the previous entry.
    pub fn add_node(&mut self, mut info: DependencyInfo) {
        info.pass_id = self.pass_id;
        self.nodes.insert(info.dependency_path.clone(), info);
    }

    /// Upsert `info` and record that `owner_id` depends on its path.
    ///
    /// The owner's edge list never holds the same path twice.
    pub fn add_dependency(&mut self, owner_id: &str, info: DependencyInfo) {
        let path = info.dependency_path.clone();
        self.add_node(info);
        let paths = self.edges.entry(owner_id.to_string()).or_default();
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    /// Dependencies of `owner_id` in registration order.
    pub fn get_dependencies(&self, owner_id: &str) -> Vec<&DependencyInfo> {
        self.edges
            .get(owner_id)
            .map(|paths| paths.iter().filter_map(|p| self.nodes.get(p)).collect())
            .unwrap_or_default()
    }

    /// Owners whose edge list contains `path`, sorted by owner id.
    pub fn get_dependents(&self, path: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, paths)| paths.iter().any(|p| p == path))
            .map(|(owner, _)| owner.as_str())
            .collect()
    }

    pub fn node(&self, path: &str) -> Option<&DependencyInfo> {
        self.nodes.get(path)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DependencyInfo> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.edges
            .iter()
            .map(|(owner, paths)| (owner.as_str(), paths.as_slice()))
    }

    pub fn nodes_of_type(&self, dependency_type: DependencyType) -> Vec<&DependencyInfo> {
        self.nodes
            .values()
            .filter(|info| info.dependency_type == dependency_type)
            .collect()
    }

    pub fn invalid_nodes(&self) -> Vec<&DependencyInfo> {
        self.nodes.values().filter(|info| !info.is_valid).collect()
    }

    /// Number of dependency targets.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of owners with at least one dependency.
    pub fn owner_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges whose path has no node, as `(owner, path)` pairs.
    ///
    /// Always empty for a graph built by a validation pass.
    pub fn check_integrity(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(owner, paths)| {
                paths
                    .iter()
                    .filter(|p| !self.nodes.contains_key(p.as_str()))
                    .map(move |p| (owner.as_str(), p.as_str()))
            })
            .collect()
    }

    /// Node and edge lists for the layout, owners first.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        for (owner, paths) in &self.edges {
            if seen.insert(owner.as_str()) {
                nodes.push(owner.clone());
            }
            for path in paths {
                edges.push((owner.clone(), path.clone()));
            }
        }
        for path in self.nodes.keys() {
            if seen.insert(path.as_str()) {
                nodes.push(path.clone());
            }
        }

        GraphSnapshot { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(owner: &str, path: &str) -> DependencyInfo {
        DependencyInfo::new(owner, DependencyType::Asset, path)
    }

    #[test]
    fn test_add_dependency_is_idempotent() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("object:a", asset("object:a", "GTF Ulysses"));
        graph.add_dependency("object:a", asset("object:a", "GTF Ulysses"));

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get_dependencies("object:a").len(), 1);
    }

    #[test]
    fn test_last_writer_wins_on_same_path() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("object:a", asset("object:a", "GTF Ulysses"));
        graph.add_dependency(
            "object:b",
            asset("object:b", "GTF Ulysses").invalid("missing"),
        );

        let node = graph.node("GTF Ulysses").unwrap();
        assert!(!node.is_valid);
        assert_eq!(node.object_id, "object:b");
    }

    #[test]
    fn test_missing_owner_has_no_dependencies() {
        let graph = DependencyGraph::new();
        assert!(graph.get_dependencies("object:nobody").is_empty());
    }

    #[test]
    fn test_begin_pass_stamps_entries() {
        let mut graph = DependencyGraph::new();
        graph.begin_pass(7);
        graph.add_dependency("object:a", asset("object:a", "GTF Ulysses"));
        assert_eq!(graph.node("GTF Ulysses").unwrap().pass_id, 7);

        graph.begin_pass(8);
        assert!(graph.is_empty());
        assert_eq!(graph.owner_count(), 0);
        assert_eq!(graph.pass_id(), 8);
    }

    #[test]
    fn test_snapshot_lists_owners_then_targets() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("object:a", asset("object:a", "GTF Ulysses"));
        graph.add_dependency("wing:Alpha", asset("wing:Alpha", "object:a"));

        let snapshot = graph.snapshot();
        assert_eq!(snapshot.nodes, vec!["object:a", "wing:Alpha", "GTF Ulysses"]);
        assert_eq!(snapshot.edges.len(), 2);
    }

    #[test]
    fn test_integrity_reports_nothing_for_well_formed_graph() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("object:a", asset("object:a", "p1"));
        graph.add_dependency("object:b", asset("object:b", "p2"));
        assert!(graph.check_integrity().is_empty());
    }
}
