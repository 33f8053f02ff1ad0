use depview_core::{Edge, EdgeMatcher, Node, NodeId, SuccessorIndex};
use std::collections::HashMap;

/// Node and edge store that the layout engine reads from.
///
/// Nodes are kept in insertion order and deduplicated by id. Edges whose endpoints
/// are unknown are dropped on insertion.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_map: HashMap<NodeId, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    pub fn add_node(&mut self, node: Node) {
        if !self.node_map.contains_key(&node.id) {
            self.node_map.insert(node.id, self.nodes.len());
            self.nodes.push(node);
        }
    }

    pub fn add_edge(&mut self, edge: Edge) {
        if self.node_map.contains_key(&edge.source) && self.node_map.contains_key(&edge.target) {
            self.edges.push(edge);
            return;
        }

        if !self.node_map.contains_key(&edge.source) {
            tracing::warn!(
                "Dropping edge {} because source node {} is missing from graph",
                edge.id,
                edge.source
            );
        }
        if !self.node_map.contains_key(&edge.target) {
            tracing::warn!(
                "Dropping edge {} because target node {} is missing from graph",
                edge.id,
                edge.target
            );
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|node| node.id).collect()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_map.contains_key(&id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.node_map.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// Index every node's matching edges, keyed by the node the edges lead away from.
    ///
    /// Forward matches are filed under the edge source, reverse matches under the edge
    /// target. An edge matching both directions is filed twice.
    pub fn compute_successor_hierarchy(&self, matcher: &EdgeMatcher) -> SuccessorIndex {
        let mut index = SuccessorIndex::new();
        for edge in &self.edges {
            if matcher.matches_forward(edge) {
                index
                    .entry(edge.source)
                    .or_default()
                    .push_forward(edge.clone());
            }
            if matcher.matches_reverse(edge) {
                index
                    .entry(edge.target)
                    .or_default()
                    .push_reverse(edge.clone());
            }
        }

        tracing::debug!(
            "Successor hierarchy: {} interior nodes from {} edges",
            index.len(),
            self.edges.len()
        );
        index
    }
}
