//! Force-directed solver.
//!
//! Nodes start evenly spaced on a circle, which keeps every pair apart from
//! the first iteration. Each iteration then applies:
//!
//! - inverse-square repulsion `repulsion_strength / d²` between every pair,
//! - linear spring attraction `attraction_strength * d * 0.01` along edges,
//! - `position += force * damping`, followed by `damping *= damping_decay`.
//!
//! Coincident nodes exert no force on each other. Positions are not clamped,
//! and disconnected components are never pulled together.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::position::Position;

/// Scale applied to spring forces relative to repulsion.
const SPRING_SCALE: f64 = 0.01;

/// Positions and force accumulators of a layout in progress.
#[derive(Debug, Clone)]
pub struct LayoutState<N: Ord + Clone> {
    ids: Vec<N>,
    index: BTreeMap<N, usize>,
    positions: Vec<Position>,
    forces: Vec<Position>,
    damping: f64,
}

impl<N: Ord + Clone> LayoutState<N> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self, id: &N) -> Option<Position> {
        self.index.get(id).map(|&i| self.positions[i])
    }

    /// Net force applied to `id` in the latest iteration.
    pub fn force(&self, id: &N) -> Option<Position> {
        self.index.get(id).map(|&i| self.forces[i])
    }

    /// Step multiplier of the next iteration.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn positions(&self) -> BTreeMap<N, Position> {
        self.ids
            .iter()
            .cloned()
            .zip(self.positions.iter().copied())
            .collect()
    }

    pub fn into_positions(self) -> BTreeMap<N, Position> {
        self.ids.into_iter().zip(self.positions).collect()
    }
}

/// Deterministic force-directed layout.
#[derive(Debug, Clone, Default)]
pub struct ForceDirectedLayout {
    config: LayoutConfig,
}

impl ForceDirectedLayout {
    /// Create a solver after checking the configuration.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Place `nodes` on the initial circle in input order.
    ///
    /// Repeated ids keep their first slot.
    pub fn initialize<N: Ord + Clone>(&self, nodes: &[N]) -> LayoutState<N> {
        let mut ids: Vec<N> = Vec::with_capacity(nodes.len());
        let mut index = BTreeMap::new();
        for node in nodes {
            if !index.contains_key(node) {
                index.insert(node.clone(), ids.len());
                ids.push(node.clone());
            }
        }

        let count = ids.len();
        let positions = (0..count)
            .map(|i| {
                let angle = TAU * i as f64 / count as f64;
                Position::on_circle(self.config.center, self.config.radius, angle)
            })
            .collect();

        LayoutState {
            ids,
            index,
            positions,
            forces: vec![Position::ZERO; count],
            damping: self.config.damping,
        }
    }

    /// Run one iteration.
    ///
    /// Edges whose endpoints are not in `state` are ignored.
    pub fn step<N: Ord + Clone>(&self, state: &mut LayoutState<N>, edges: &[(N, N)]) {
        state.forces.fill(Position::ZERO);

        let count = state.positions.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let delta = state.positions[i] - state.positions[j];
                let distance = delta.length();
                if distance == 0.0 {
                    continue;
                }
                let magnitude = self.config.repulsion_strength / (distance * distance);
                let push = delta * (magnitude / distance);
                state.forces[i] += push;
                state.forces[j] -= push;
            }
        }

        for (from, to) in edges {
            let (Some(&a), Some(&b)) = (state.index.get(from), state.index.get(to)) else {
                continue;
            };
            let delta = state.positions[b] - state.positions[a];
            let distance = delta.length();
            if distance == 0.0 {
                continue;
            }
            let magnitude = self.config.attraction_strength * distance * SPRING_SCALE;
            let pull = delta * (magnitude / distance);
            state.forces[a] += pull;
            state.forces[b] -= pull;
        }

        let damping = state.damping;
        for (position, force) in state.positions.iter_mut().zip(&state.forces) {
            *position += *force * damping;
        }
        state.damping *= self.config.damping_decay;
    }

    /// Lay out the graph and return every node's final position.
    pub fn calculate<N: Ord + Clone>(&self, nodes: &[N], edges: &[(N, N)]) -> BTreeMap<N, Position> {
        let mut state = self.initialize(nodes);
        if state.is_empty() {
            return BTreeMap::new();
        }
        for _ in 0..self.config.iterations {
            self.step(&mut state, edges);
        }
        tracing::trace!(
            nodes = state.len(),
            edges = edges.len(),
            iterations = self.config.iterations,
            "layout computed"
        );
        state.into_positions()
    }
}

/// Lay out `nodes` and `edges` with `config`.
///
/// The configuration is used as given; call [`LayoutConfig::validate`] first
/// when it comes from user input.
pub fn calculate_layout<N: Ord + Clone>(
    nodes: &[N],
    edges: &[(N, N)],
    config: &LayoutConfig,
) -> BTreeMap<N, Position> {
    ForceDirectedLayout {
        config: config.clone(),
    }
    .calculate(nodes, edges)
}
