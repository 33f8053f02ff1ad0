use crate::geometry::Point;
use crate::runner::IterativeLayout;
use crate::settings::RepulsionSettings;
use depview_core::NodeId;
use std::collections::HashMap;

/// Pairwise repulsion that spreads crowded nodes apart.
///
/// Every node pushes every other node away; fixed nodes push but never move. The
/// algorithm has no convergence test, so it must be driven by a counted runner.
pub struct RepulsionLayout {
    nodes: Vec<NodeId>,
    points: Vec<Point>,
    movable: Vec<bool>,
    index: HashMap<NodeId, usize>,
    settings: RepulsionSettings,
}

impl RepulsionLayout {
    /// `seed` supplies starting points for movable nodes; movable nodes without a seed
    /// are left out. Fixed nodes keep the point given in `fixed`.
    pub fn new(
        movable: &[NodeId],
        fixed: &HashMap<NodeId, Point>,
        seed: &HashMap<NodeId, Point>,
        settings: &RepulsionSettings,
    ) -> Self {
        let mut entries: Vec<(NodeId, Point, bool)> = Vec::new();
        for &node in movable {
            if fixed.contains_key(&node) {
                continue;
            }
            if let Some(&point) = seed.get(&node) {
                entries.push((node, point, true));
            }
        }
        entries.extend(fixed.iter().map(|(&node, &point)| (node, point, false)));

        // Deterministic iteration order for the force calculation.
        entries.sort_by_key(|(node, _, _)| *node);
        entries.dedup_by_key(|(node, _, _)| *node);

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (node, _, _))| (*node, i))
            .collect();

        Self {
            nodes: entries.iter().map(|(node, _, _)| *node).collect(),
            points: entries.iter().map(|(_, point, _)| *point).collect(),
            movable: entries.iter().map(|(_, _, movable)| *movable).collect(),
            index,
            settings: settings.clone(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn push_apart(delta: f32, force: f32) -> f32 {
    if delta.abs() > 0.01 {
        force * delta.signum()
    } else {
        0.0
    }
}

impl IterativeLayout for RepulsionLayout {
    fn step(&mut self) {
        let count = self.points.len();
        let mut forces = vec![(0.0f32, 0.0f32); count];

        for i in 0..count {
            for j in (i + 1)..count {
                let a = self.points[i];
                let b = self.points[j];
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                let dist = a.distance(b).max(self.settings.min_distance);
                let force = self.settings.strength / (dist * dist);

                let mut fx = push_apart(dx, force);
                let fy = push_apart(dy, force);
                // Coincident nodes: the lower-ordered one goes right, the other left.
                if fx == 0.0 && fy == 0.0 {
                    fx = force;
                }
                forces[i].0 += fx;
                forces[i].1 += fy;
                forces[j].0 -= fx;
                forces[j].1 -= fy;
            }
        }

        let damping = self.settings.damping;
        for (i, (fx, fy)) in forces.into_iter().enumerate() {
            if self.movable[i] {
                self.points[i] = self.points[i].translated(fx * damping, fy * damping);
            }
        }
    }

    fn done(&self) -> bool {
        false
    }

    fn position(&self, node: NodeId) -> Option<Point> {
        self.index.get(&node).map(|&i| self.points[i])
    }
}
