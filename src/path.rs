use std::iter::once;

use crate::{
    graph::Graph,
    graph_store::{EdgeId, NodeId},
};

/// A walk through a graph: a start node followed by `(edge, node)` steps.
///
/// Steps may follow an edge against its stored direction, which is how
/// paths found by undirected runs are represented.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
}

impl Path {
    /// Creates a new path consisting of a single node.
    pub fn new(start: NodeId) -> Self {
        Self {
            nodes: vec![start],
            edges: Vec::new(),
        }
    }

    /// Returns the first node in the path.
    pub fn first_node(&self) -> NodeId {
        self.nodes[0]
    }

    /// Returns the last node in the path.
    pub fn last_node(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Returns the nodes in order, starting with the first node.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns the edges in order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Number of edges in the path.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the path has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns an iterator over the nodes in the path along with the edges
    /// connecting them. Each item is a tuple of the form `(incoming_edge,
    /// node, outgoing_edge)`; the edges are `None` only for the first node's
    /// incoming edge and the last node's outgoing edge.
    pub fn nodes_with_edges(
        &self,
    ) -> impl Iterator<Item = (Option<EdgeId>, NodeId, Option<EdgeId>)> + '_ {
        let incoming = once(None).chain(self.edges.iter().copied().map(Some));
        let outgoing = self.edges.iter().copied().map(Some).chain(once(None));
        incoming
            .zip(outgoing)
            .zip(self.nodes.iter().copied())
            .map(|((in_edge, out_edge), node)| (in_edge, node, out_edge))
    }

    /// Appends a step without checking it against any graph.
    pub fn add_edge_and_node(&mut self, edge: EdgeId, node: NodeId) {
        self.edges.push(edge);
        self.nodes.push(node);
    }

    /// Appends an edge incident to the current last node, moving to its
    /// other endpoint.  Panics if the edge does not touch the last node.
    pub fn add_edge<G: Graph>(&mut self, graph: &G, edge: EdgeId) {
        let last = self.last_node();
        let next = if graph.edge_source(edge) == last {
            graph.edge_target(edge)
        } else if graph.edge_target(edge) == last {
            graph.edge_source(edge)
        } else {
            panic!("edge {edge:?} does not touch the end of the path at {last:?}");
        };
        self.add_edge_and_node(edge, next);
    }

    /// Appends all steps of another path.  Panics if the other path does
    /// not start where this one ends.
    pub fn extend_with(&mut self, other: &Path) {
        assert_eq!(
            self.last_node(),
            other.first_node(),
            "paths do not meet end to start"
        );
        self.edges.extend_from_slice(&other.edges);
        self.nodes.extend_from_slice(&other.nodes[1..]);
    }

    /// Sum of the weights of the path's edges.
    pub fn total_weight<G: Graph>(&self, graph: &G) -> f64 {
        self.edges.iter().map(|&eid| graph.edge_weight(eid)).sum()
    }

    /// Checks that every step is an edge of `graph` joining consecutive
    /// nodes.  With `directed` set, each edge must also run forwards.
    pub fn is_valid_in<G: Graph>(&self, graph: &G, directed: bool) -> bool {
        self.nodes.iter().all(|n| graph.check_valid_node_id(n).is_ok())
            && self.edges.iter().enumerate().all(|(i, edge)| {
                if graph.check_valid_edge_id(edge).is_err() {
                    return false;
                }
                let (from, to) = (self.nodes[i], self.nodes[i + 1]);
                let (source, target) = (graph.edge_source(*edge), graph.edge_target(*edge));
                (source == from && target == to)
                    || (!directed && source == to && target == from)
            })
    }
}
