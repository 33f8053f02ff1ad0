use crate::geometry::Point;
use crate::settings::LayoutSettings;
use crate::tree_model::TreeModel;
use depview_core::NodeId;
use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

/// How (depth, offset) slots are turned into coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// x grows with depth, y with sibling offset.
    Planar,
    /// Depth becomes the radius, offset the angle around the circumference.
    Radial,
}

/// Spanning tree over the successor graph, restricted to the nodes being laid out.
///
/// Each node hangs under the first node that reaches it, so shared descendants and
/// cycles are placed exactly once.
#[derive(Debug, Default)]
struct SuccessorTree {
    roots: Vec<NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
    post_order: Vec<NodeId>,
}

impl SuccessorTree {
    fn build(tree: &TreeModel, universe: &[NodeId]) -> Self {
        let members: HashSet<NodeId> = universe.iter().copied().collect();
        let mut claimed: HashSet<NodeId> = HashSet::with_capacity(members.len());
        let mut result = SuccessorTree::default();

        // True roots first, then whatever a cycle left unreached.
        let candidates = tree.compute_roots(universe);
        for root in candidates.into_iter().chain(universe.iter().copied()) {
            if !claimed.insert(root) {
                continue;
            }
            result.roots.push(root);

            let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> =
                vec![(root, tree.successors_of(root), 0)];
            while let Some((node, successors, next)) = stack.last_mut() {
                if let Some(&child) = successors.get(*next) {
                    *next += 1;
                    let parent = *node;
                    if members.contains(&child) && claimed.insert(child) {
                        result.children.entry(parent).or_default().push(child);
                        stack.push((child, tree.successors_of(child), 0));
                    }
                    continue;
                }
                result.post_order.push(*node);
                stack.pop();
            }
        }
        result
    }

    fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.children.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bottom-up pass: a leaf is 0 wide, a parent spans its children plus the gaps between them.
    fn widths(&self, gap: f32) -> HashMap<NodeId, f32> {
        let mut widths = HashMap::with_capacity(self.post_order.len());
        for &node in &self.post_order {
            let span: f32 = self
                .children_of(node)
                .iter()
                .map(|child| widths.get(child).copied().unwrap_or(0.0) + gap)
                .sum();
            widths.insert(node, (span - gap).max(0.0));
        }
        widths
    }

    /// Top-down pass: hand every placed node's (depth, offset) to `record`.
    ///
    /// Returns the total span covered by all roots, margins included.
    fn place(
        &self,
        widths: &HashMap<NodeId, f32>,
        gap: f32,
        margin: f32,
        root_depth: u32,
        mut record: impl FnMut(NodeId, u32, f32),
    ) -> f32 {
        let width_of = |node: &NodeId| widths.get(node).copied().unwrap_or(0.0);
        let mut cursor = 0.0;

        for root in &self.roots {
            let half = width_of(root) / 2.0;
            let center = cursor + half;

            let mut pending = vec![(*root, root_depth, center)];
            while let Some((node, depth, offset)) = pending.pop() {
                record(node, depth, offset);

                let mut child_cursor = offset - width_of(&node) / 2.0;
                for child in self.children_of(node) {
                    let child_width = width_of(child);
                    pending.push((*child, depth + 1, child_cursor + child_width / 2.0));
                    child_cursor += child_width + gap;
                }
            }

            cursor = center + half + margin;
        }
        cursor
    }
}

/// Tree layout over one frozen (tree model, node set, settings) triple.
///
/// All work happens in the constructor; afterwards the layout is a read-only lookup.
/// Nodes outside the laid-out set have no position.
#[derive(Debug, Clone)]
pub struct HierarchicalLayout {
    projection: Projection,
    roots: Vec<NodeId>,
    circumference: f32,
    positions: HashMap<NodeId, Point>,
}

impl HierarchicalLayout {
    pub fn planar(tree: &TreeModel, universe: &[NodeId], settings: &LayoutSettings) -> Self {
        Self::compute(Projection::Planar, tree, universe, settings)
    }

    pub fn radial(tree: &TreeModel, universe: &[NodeId], settings: &LayoutSettings) -> Self {
        Self::compute(Projection::Radial, tree, universe, settings)
    }

    pub fn compute(
        projection: Projection,
        tree: &TreeModel,
        universe: &[NodeId],
        settings: &LayoutSettings,
    ) -> Self {
        let successor_tree = SuccessorTree::build(tree, universe);
        let widths = successor_tree.widths(settings.gap);
        let mut positions = HashMap::with_capacity(successor_tree.post_order.len());

        let circumference = match projection {
            Projection::Planar => successor_tree.place(
                &widths,
                settings.gap,
                settings.margin,
                0,
                |node, depth, offset| {
                    positions.insert(
                        node,
                        Point::new(depth as f32 * settings.expand_x, offset * settings.expand_y),
                    );
                },
            ),
            Projection::Radial => {
                // Distinct roots would all stack on the origin, so push them out a ring.
                let root_depth = if successor_tree.roots.len() > 1 { 1 } else { 0 };

                let dry_run = successor_tree.place(
                    &widths,
                    settings.gap,
                    settings.margin,
                    root_depth,
                    |_, _, _| {},
                );
                let circumference = if dry_run > 0.0 { dry_run } else { 1.0 };
                let angle_per_slot = TAU / circumference;

                successor_tree.place(
                    &widths,
                    settings.gap,
                    settings.margin,
                    root_depth,
                    |node, depth, offset| {
                        let radius = depth as f32 * settings.ring_spacing;
                        positions.insert(node, Point::from_polar(radius, offset * angle_per_slot));
                    },
                );
                circumference
            }
        };

        tracing::debug!(
            "{:?} tree layout: {} roots, {} nodes placed, circumference {}",
            projection,
            successor_tree.roots.len(),
            positions.len(),
            circumference
        );

        Self {
            projection,
            roots: successor_tree.roots,
            circumference,
            positions,
        }
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Roots in placement order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total offset span covered by the placement pass.
    pub fn circumference(&self) -> f32 {
        self.circumference
    }

    pub fn position(&self, node: NodeId) -> Option<Point> {
        self.positions.get(&node).copied()
    }

    /// Snapshot of every computed position.
    pub fn positions(&self) -> HashMap<NodeId, Point> {
        self.positions.clone()
    }

    pub fn into_positions(self) -> HashMap<NodeId, Point> {
        self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use depview_core::{Edge, EdgeMatcher, Node, Relation};
    use proptest::prelude::*;

    fn n(id: i64) -> NodeId {
        NodeId(id)
    }

    fn tree(node_count: i64, edges: &[(i64, i64)]) -> (TreeModel, Vec<NodeId>) {
        let graph = DependencyGraph::from_parts(
            (0..node_count).map(|id| Node::new(id, &format!("n{id}"))),
            edges
                .iter()
                .enumerate()
                .map(|(i, &(s, t))| Edge::new(i as i64, s, t, Relation::CONTAINS)),
        );
        let model = TreeModel::from_graph(&graph, &EdgeMatcher::forward(&[Relation::CONTAINS]));
        (model, graph.node_ids())
    }

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn chain_shares_one_offset_and_steps_by_expand_x() {
        let (model, universe) = tree(4, &[(0, 1), (1, 2), (2, 3)]);
        let layout = HierarchicalLayout::planar(&model, &universe, &LayoutSettings::default());

        let points: Vec<Point> = universe.iter().map(|&id| layout.position(id).unwrap()).collect();
        for (depth, point) in points.iter().enumerate() {
            assert_eq!(point.y, points[0].y);
            assert_eq!(point.x, depth as f32 * LayoutSettings::DEFAULT_EXPAND_X);
        }
        assert_eq!(layout.roots(), &[n(0)]);
    }

    #[test]
    fn parent_is_centered_over_children() {
        let (model, universe) = tree(4, &[(0, 1), (0, 2), (0, 3)]);
        let layout = HierarchicalLayout::planar(&model, &universe, &LayoutSettings::default());

        assert_close(layout.position(n(0)).unwrap(), Point::new(0.0, 1.0));
        assert_close(layout.position(n(1)).unwrap(), Point::new(12.0, 0.0));
        assert_close(layout.position(n(2)).unwrap(), Point::new(12.0, 1.0));
        assert_close(layout.position(n(3)).unwrap(), Point::new(12.0, 2.0));
    }

    #[test]
    fn roots_advance_past_previous_subtree_and_margin() {
        // Root 0 has two leaves, root 3 stands alone.
        let (model, universe) = tree(4, &[(0, 1), (0, 2)]);
        let layout = HierarchicalLayout::planar(&model, &universe, &LayoutSettings::default());

        assert_eq!(layout.roots(), &[n(0), n(3)]);
        assert_close(layout.position(n(0)).unwrap(), Point::new(0.0, 0.5));
        assert_close(layout.position(n(3)).unwrap(), Point::new(0.0, 2.0));
        assert_eq!(layout.circumference(), 3.0);
    }

    #[test]
    fn shared_descendant_is_placed_once_under_first_parent() {
        let (model, universe) = tree(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let layout = HierarchicalLayout::planar(&model, &universe, &LayoutSettings::default());

        assert_eq!(layout.positions().len(), 4);
        assert_eq!(layout.position(n(3)).unwrap().x, 2.0 * 12.0);
        assert_eq!(layout.position(n(3)).unwrap().y, layout.position(n(1)).unwrap().y);
    }

    #[test]
    fn cycle_without_roots_still_gets_placed() {
        let (model, universe) = tree(3, &[(0, 1), (1, 2), (2, 0)]);
        let layout = HierarchicalLayout::planar(&model, &universe, &LayoutSettings::default());

        assert_eq!(layout.roots(), &[n(0)]);
        assert_eq!(layout.positions().len(), 3);
    }

    #[test]
    fn nodes_outside_universe_have_no_position() {
        let (model, _) = tree(3, &[(0, 1), (1, 2)]);
        let layout = HierarchicalLayout::planar(&model, &[n(0), n(1)], &LayoutSettings::default());

        assert!(layout.position(n(2)).is_none());
        assert!(layout.position(n(99)).is_none());
    }

    #[test]
    fn empty_universe_places_nothing() {
        let (model, _) = tree(2, &[(0, 1)]);
        let layout = HierarchicalLayout::radial(&model, &[], &LayoutSettings::default());
        assert!(layout.positions().is_empty());
        assert!(layout.roots().is_empty());
    }

    #[test]
    fn radial_single_root_sits_at_center() {
        let (model, universe) = tree(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let layout = HierarchicalLayout::radial(&model, &universe, &LayoutSettings::default());

        assert_close(layout.position(n(0)).unwrap(), Point::ORIGIN);
        assert_eq!(layout.circumference(), 4.0);
        // Four leaves spread a quarter turn apart on the first ring.
        assert_close(layout.position(n(1)).unwrap(), Point::new(1.0, 0.0));
        assert_close(layout.position(n(2)).unwrap(), Point::new(0.0, 1.0));
        assert_close(layout.position(n(3)).unwrap(), Point::new(-1.0, 0.0));
        assert_close(layout.position(n(4)).unwrap(), Point::new(0.0, -1.0));
    }

    #[test]
    fn radial_multiple_roots_leave_center_empty() {
        let (model, universe) = tree(4, &[(0, 1), (2, 3)]);
        let layout = HierarchicalLayout::radial(&model, &universe, &LayoutSettings::default());

        for id in &universe {
            let point = layout.position(*id).unwrap();
            assert!(point.distance(Point::ORIGIN) >= 1.0 - 1e-4);
        }
    }

    #[test]
    fn rerunning_on_same_input_is_identical() {
        let (model, universe) = tree(6, &[(0, 1), (0, 2), (2, 3), (4, 5), (5, 4)]);
        let settings = LayoutSettings::default();

        for projection in [Projection::Planar, Projection::Radial] {
            let first = HierarchicalLayout::compute(projection, &model, &universe, &settings);
            let second = HierarchicalLayout::compute(projection, &model, &universe, &settings);
            assert_eq!(first.positions(), second.positions());
            assert_eq!(first.projection(), projection);
        }
    }

    #[test]
    fn deep_chain_is_placed_without_recursion() {
        let edges: Vec<(i64, i64)> = (0..20_000).map(|i| (i, i + 1)).collect();
        let (model, universe) = tree(20_001, &edges);
        let layout = HierarchicalLayout::planar(&model, &universe, &LayoutSettings::default());

        assert_eq!(layout.position(n(20_000)).unwrap().x, 20_000.0 * 12.0);
    }

    proptest! {
        #[test]
        fn prop_radial_with_several_roots_avoids_origin(
            edges in proptest::collection::vec((0i64..12, 0i64..12), 0..20)
        ) {
            let (model, universe) = tree(12, &edges);
            let layout = HierarchicalLayout::radial(&model, &universe, &LayoutSettings::default());
            prop_assume!(layout.roots().len() > 1);

            for id in &universe {
                let point = layout.position(*id).unwrap();
                prop_assert!(point != Point::ORIGIN, "{:?} placed at origin", id);
            }
        }

        #[test]
        fn prop_every_universe_node_is_placed(
            edges in proptest::collection::vec((0i64..10, 0i64..10), 0..20)
        ) {
            let (model, universe) = tree(10, &edges);
            let layout = HierarchicalLayout::planar(&model, &universe, &LayoutSettings::default());
            prop_assert_eq!(layout.positions().len(), universe.len());
        }
    }
}
