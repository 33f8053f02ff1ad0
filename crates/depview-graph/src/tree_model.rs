use crate::graph::DependencyGraph;
use depview_core::{EdgeMatcher, NodeId, SuccessorIndex};
use std::collections::{HashMap, HashSet};

/// Depth-first traversal over a successor index.
///
/// Answers root discovery and topological ordering for the nodes of one analysis
/// session. Build a fresh model whenever the graph or the edge matcher changes.
#[derive(Debug, Clone, Default)]
pub struct TreeModel {
    index: SuccessorIndex,
}

/// Per-node bookkeeping for one traversal. A zero tick means "not yet".
#[derive(Debug, Clone, Copy, Default)]
struct NodeState {
    discovered_tick: u64,
    explored_tick: u64,
    predecessor: Option<NodeId>,
}

impl NodeState {
    fn is_visited(&self) -> bool {
        self.discovered_tick != 0
    }

    fn is_explored(&self) -> bool {
        self.explored_tick != 0
    }
}

struct Frame {
    node: NodeId,
    successors: Vec<NodeId>,
    next: usize,
}

/// One white/grey/black pass. Owns all node state; dropped when the query returns.
struct Traversal<'a> {
    model: &'a TreeModel,
    states: HashMap<NodeId, NodeState>,
    tick: u64,
    post_order: Vec<NodeId>,
}

impl<'a> Traversal<'a> {
    fn new(model: &'a TreeModel) -> Self {
        Self {
            model,
            states: HashMap::new(),
            tick: 0,
            post_order: Vec::new(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn run(&mut self, universe: &[NodeId]) {
        for &node in universe {
            let visited = self.states.get(&node).is_some_and(NodeState::is_visited);
            if !visited {
                self.visit(node);
            }
        }
    }

    fn discover(&mut self, node: NodeId) -> Frame {
        let tick = self.next_tick();
        self.states.entry(node).or_default().discovered_tick = tick;
        Frame {
            node,
            successors: self.model.successors_of(node),
            next: 0,
        }
    }

    // Iterative form of the recursive visit: same child order, same post-order.
    fn visit(&mut self, start: NodeId) {
        let mut stack = vec![self.discover(start)];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.successors.get(frame.next) {
                frame.next += 1;
                let parent = frame.node;

                // First claimant wins, even when the child was already visited.
                let child_state = self.states.entry(child).or_default();
                if child_state.predecessor.is_none() {
                    child_state.predecessor = Some(parent);
                }
                if !child_state.is_visited() {
                    let child_frame = self.discover(child);
                    stack.push(child_frame);
                } else if !child_state.is_explored() {
                    tracing::trace!("Back edge {} -> {}", parent, child);
                }
                continue;
            }

            let node = frame.node;
            stack.pop();
            let tick = self.next_tick();
            self.states.entry(node).or_default().explored_tick = tick;
            if self.model.index.contains_key(&node) {
                self.post_order.push(node);
            }
        }
    }

    fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.states.get(&node).and_then(|state| state.predecessor)
    }
}

impl TreeModel {
    pub fn new(index: SuccessorIndex) -> Self {
        Self { index }
    }

    pub fn from_graph(graph: &DependencyGraph, matcher: &EdgeMatcher) -> Self {
        Self::new(graph.compute_successor_hierarchy(matcher))
    }

    pub fn index(&self) -> &SuccessorIndex {
        &self.index
    }

    pub fn is_interior(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    pub fn successors_of(&self, node: NodeId) -> Vec<NodeId> {
        self.index
            .get(&node)
            .map(|edges| edges.successor_nodes())
            .unwrap_or_default()
    }

    pub fn count_interior_nodes(&self) -> usize {
        self.index.len()
    }

    /// Every interior node plus every node one of them leads to.
    pub fn compute_tree_nodes(&self) -> HashSet<NodeId> {
        let mut result = HashSet::with_capacity(self.index.len() * 2);
        for (&node, edges) in &self.index {
            result.insert(node);
            result.extend(edges.successors());
        }
        result
    }

    pub fn count_tree_nodes(&self) -> usize {
        self.compute_tree_nodes().len()
    }

    /// Nodes of `universe` left without a predecessor once every node has been visited.
    ///
    /// Result follows `universe` order. Because predecessors are assigned to already
    /// visited nodes as well, members of a cycle can all end up with predecessors, in
    /// which case the cycle contributes no root.
    pub fn compute_roots(&self, universe: &[NodeId]) -> Vec<NodeId> {
        let mut traversal = Traversal::new(self);
        traversal.run(universe);

        let mut seen = HashSet::with_capacity(universe.len());
        let roots: Vec<NodeId> = universe
            .iter()
            .copied()
            .filter(|&node| seen.insert(node) && traversal.predecessor(node).is_none())
            .collect();

        tracing::debug!(
            "Computed {} roots for {} nodes",
            roots.len(),
            universe.len()
        );
        roots
    }

    /// Interior nodes reachable from `universe`, in depth-first post-order.
    ///
    /// Descendants always precede their ancestors when the successor graph is acyclic.
    pub fn topo_sort(&self, universe: &[NodeId]) -> Vec<NodeId> {
        let mut traversal = Traversal::new(self);
        traversal.run(universe);
        traversal.post_order
    }

    /// The predecessor recorded for every node the traversal touched.
    pub fn predecessors(&self, universe: &[NodeId]) -> HashMap<NodeId, NodeId> {
        let mut traversal = Traversal::new(self);
        traversal.run(universe);
        traversal
            .states
            .into_iter()
            .filter_map(|(node, state)| state.predecessor.map(|pred| (node, pred)))
            .collect()
    }
}
