use crate::error::GraphError;
use crate::geometry::{Point, Rect};
use crate::graph::DependencyGraph;
use crate::hierarchical::{HierarchicalLayout, Projection};
use crate::repulsion::RepulsionLayout;
use crate::runner::LayoutRunner;
use crate::settings::LayoutSettings;
use crate::tree_model::TreeModel;
use depview_core::{EdgeMatcher, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Everything one layout pass reads. Nothing in here changes during the pass.
#[derive(Debug, Clone)]
pub struct LayoutContext<'a> {
    pub graph: &'a DependencyGraph,
    /// Nodes the layout is free to place
    pub movable: Vec<NodeId>,
    /// Nodes that keep their prior position
    pub fixed: Vec<NodeId>,
    pub matcher: EdgeMatcher,
    pub viewport: Rect,
    pub prior_positions: HashMap<NodeId, Point>,
}

impl<'a> LayoutContext<'a> {
    /// Every graph node is movable and nothing has been placed yet.
    pub fn new(graph: &'a DependencyGraph, matcher: EdgeMatcher, viewport: Rect) -> Self {
        Self {
            graph,
            movable: graph.node_ids(),
            fixed: Vec::new(),
            matcher,
            viewport,
            prior_positions: HashMap::new(),
        }
    }

    pub fn with_movable(mut self, movable: Vec<NodeId>) -> Self {
        self.movable = movable;
        self
    }

    pub fn with_fixed(mut self, fixed: Vec<NodeId>) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_prior_positions(mut self, positions: HashMap<NodeId, Point>) -> Self {
        self.prior_positions = positions;
        self
    }

    /// Prior positions of the fixed nodes that have one.
    pub fn fixed_positions(&self) -> HashMap<NodeId, Point> {
        self.fixed
            .iter()
            .filter_map(|node| self.prior_positions.get(node).map(|&point| (*node, point)))
            .collect()
    }

    /// Movable nodes that are not also listed as fixed.
    fn free_nodes(&self) -> Vec<NodeId> {
        self.movable
            .iter()
            .copied()
            .filter(|node| !self.fixed.contains(node))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutAlgorithm {
    #[default]
    Tree,
    Radial,
    Grid,
    Repulsion,
}

impl LayoutAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Tree => "tree",
            LayoutAlgorithm::Radial => "radial",
            LayoutAlgorithm::Grid => "grid",
            LayoutAlgorithm::Repulsion => "repulsion",
        }
    }

    /// Start a layout pass over `context`.
    pub fn build_runner(
        &self,
        context: &LayoutContext<'_>,
        settings: &LayoutSettings,
    ) -> LayoutRunner {
        let free = context.free_nodes();
        let fixed = context.fixed_positions();

        match self {
            LayoutAlgorithm::Tree | LayoutAlgorithm::Radial => {
                let projection = if *self == LayoutAlgorithm::Tree {
                    Projection::Planar
                } else {
                    Projection::Radial
                };
                let tree = TreeModel::from_graph(context.graph, &context.matcher);
                let mut positions = HierarchicalLayout::compute(projection, &tree, &free, settings)
                    .into_positions();
                positions.extend(fixed);
                LayoutRunner::direct(positions)
            }
            LayoutAlgorithm::Grid => {
                let mut positions = grid_positions(&free, &context.viewport, settings.grid_spacing);
                positions.extend(fixed);
                LayoutRunner::direct(positions)
            }
            LayoutAlgorithm::Repulsion => {
                // Start from where nodes were, falling back to a grid for new ones.
                let mut seed = grid_positions(&free, &context.viewport, settings.grid_spacing);
                for node in &free {
                    if let Some(&point) = context.prior_positions.get(node) {
                        seed.insert(*node, point);
                    }
                }
                let layout = RepulsionLayout::new(&free, &fixed, &seed, &settings.repulsion);
                LayoutRunner::counted(
                    Box::new(layout),
                    settings.iteration_cost,
                    settings.step_budget,
                )
            }
        }
    }
}

/// Row-major grid with `ceil(sqrt(n))` columns, anchored at the viewport's min corner.
pub fn grid_positions(nodes: &[NodeId], viewport: &Rect, spacing: f32) -> HashMap<NodeId, Point> {
    if nodes.is_empty() {
        return HashMap::new();
    }

    let cols = (nodes.len() as f32).sqrt().ceil() as usize;
    nodes
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let col = (i % cols) as f32;
            let row = (i / cols) as f32;
            (node, viewport.min.translated(col * spacing, row * spacing))
        })
        .collect()
}

/// Named layouts available to a session.
///
/// Built explicitly and passed to whoever needs it; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, LayoutAlgorithm>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for algorithm in [
            LayoutAlgorithm::Tree,
            LayoutAlgorithm::Radial,
            LayoutAlgorithm::Grid,
            LayoutAlgorithm::Repulsion,
        ] {
            registry.register(algorithm.name(), algorithm);
        }
        registry
    }

    pub fn register(&mut self, name: &str, algorithm: LayoutAlgorithm) {
        if let Some(previous) = self.layouts.insert(name.to_string(), algorithm) {
            tracing::debug!("Layout {} re-registered (was {:?})", name, previous);
        }
    }

    pub fn lookup(&self, name: &str) -> Result<LayoutAlgorithm, GraphError> {
        self.layouts.get(name).copied().ok_or_else(|| {
            tracing::warn!("Unknown layout requested: {}", name);
            GraphError::UnknownLayout(name.to_string())
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }

    pub fn runner_for(
        &self,
        name: &str,
        context: &LayoutContext<'_>,
        settings: &LayoutSettings,
    ) -> Result<LayoutRunner, GraphError> {
        Ok(self.lookup(name)?.build_runner(context, settings))
    }
}
