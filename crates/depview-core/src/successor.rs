use crate::{Edge, NodeId};
use std::collections::HashMap;

/// Edges leaving one node under an active [`crate::EdgeMatcher`].
///
/// `forward` edges have the owning node as source, `reverse` edges have it as
/// target. Both lists keep the order in which the graph yielded the edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessorEdges {
    pub forward: Vec<Edge>,
    pub reverse: Vec<Edge>,
}

impl SuccessorEdges {
    pub fn push_forward(&mut self, edge: Edge) {
        self.forward.push(edge);
    }

    pub fn push_reverse(&mut self, edge: Edge) {
        self.reverse.push(edge);
    }

    /// Successor nodes: forward targets first, then reverse sources.
    pub fn successors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.forward
            .iter()
            .map(|edge| edge.target)
            .chain(self.reverse.iter().map(|edge| edge.source))
    }

    pub fn successor_nodes(&self) -> Vec<NodeId> {
        self.successors().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forward.len() + self.reverse.len()
    }
}

/// Node to successor-edge mapping. A node without an entry has no tracked successors.
pub type SuccessorIndex = HashMap<NodeId, SuccessorEdges>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Relation;

    #[test]
    fn successors_list_forward_targets_before_reverse_sources() {
        let mut edges = SuccessorEdges::default();
        edges.push_reverse(Edge::new(1, 9, 1, Relation::EXTENDS));
        edges.push_forward(Edge::new(2, 1, 2, Relation::CALLS));
        edges.push_forward(Edge::new(3, 1, 3, Relation::CALLS));

        assert_eq!(
            edges.successor_nodes(),
            vec![NodeId(2), NodeId(3), NodeId(9)]
        );
        assert_eq!(edges.len(), 3);
        assert!(!edges.is_empty());
    }
}
