use crate::collapse::HiddenNodeMap;
use crate::graph::DependencyGraph;
use depview_core::{Edge, Node, NodeId};

/// The visible part of a graph once collapsing has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposedGraph {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<(NodeId, NodeId)>,
}

fn exposed_node(node: NodeId, hidden: &HiddenNodeMap) -> NodeId {
    hidden.get(&node).copied().unwrap_or(node)
}

/// Project raw nodes and edges through a hidden-node map.
///
/// Hidden nodes are dropped (their masters are already in `full_nodes`). Edge
/// endpoints are replaced by their masters, and edges that collapse onto a single
/// node are dropped. Parallel edges are kept.
pub fn project(
    full_nodes: &[NodeId],
    full_edges: &[(NodeId, NodeId)],
    hidden: &HiddenNodeMap,
) -> ExposedGraph {
    let nodes = full_nodes
        .iter()
        .copied()
        .filter(|node| !hidden.contains_key(node))
        .collect();

    let edges = full_edges
        .iter()
        .filter_map(|&(source, target)| {
            let source = exposed_node(source, hidden);
            let target = exposed_node(target, hidden);
            (source != target).then_some((source, target))
        })
        .collect();

    ExposedGraph { nodes, edges }
}

/// Project a whole graph, keeping node names, edge ids, and relations.
pub fn project_graph(graph: &DependencyGraph, hidden: &HiddenNodeMap) -> DependencyGraph {
    let nodes: Vec<Node> = graph
        .nodes()
        .iter()
        .filter(|node| !hidden.contains_key(&node.id))
        .cloned()
        .collect();

    let edges: Vec<Edge> = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = exposed_node(edge.source, hidden);
            let target = exposed_node(edge.target, hidden);
            (source != target).then(|| Edge {
                source,
                target,
                ..edge.clone()
            })
        })
        .collect();

    tracing::debug!(
        "Exposed graph: {}/{} nodes, {}/{} edges",
        nodes.len(),
        graph.node_count(),
        edges.len(),
        graph.edge_count()
    );
    DependencyGraph::from_parts(nodes, edges)
}
