//! `Graph` and `GraphMut` are the core traits of this crate.  `Graph` is the
//! read-only, index-addressable view that every traversal engine and
//! algorithm consumes; `GraphMut` adds structural mutation.
//!
//! Storage is always directed.  Whether an edge is followed source-to-target,
//! target-to-source, or both ways is decided per run by the traversal
//! configuration, not by the graph.
//!
//! Dense indices are unique in `[0, num_nodes)` (respectively
//! `[0, num_edges)`) at any instant but are reassigned by removals, so they
//! must never be cached across a mutation.  [`NodeId`] and [`EdgeId`] are the
//! stable handles.

use std::collections::HashSet;

use crate::graph_store::{EdgeId, NodeId};

/// Structural version of a graph.  Both counters only ever grow, so a
/// derivation computed at one version is stale as soon as either differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreVersion {
    pub nodes: u64,
    pub edges: u64,
}

/// A read-only directed graph whose nodes and edges are addressable both by
/// stable handle and by dense index.
///
/// Implementations are expected to make [`Self::node_at`],
/// [`Self::index_of_node`], [`Self::edge_at`] and [`Self::index_of_edge`]
/// O(1).
pub trait Graph {
    type NodeData;
    type EdgeData;

    // Nodes

    /// Gets the number of nodes in the graph.
    fn num_nodes(&self) -> usize;

    /// Gets the node currently stored at a dense index.  Panics if the index
    /// is out of range.
    fn node_at(&self, index: usize) -> NodeId;

    /// Gets the dense index of a node.  Panics if the node is not in the
    /// graph.
    fn index_of_node(&self, id: NodeId) -> usize;

    /// Gets the data associated with a node.
    fn node_data(&self, id: NodeId) -> &Self::NodeData;

    /// Checks if a NodeId is valid in the graph, returning a reason if it is
    /// not.
    fn check_valid_node_id(&self, id: &NodeId) -> Result<(), &'static str>;

    /// Panics if the given NodeId is not valid in the graph.
    fn assert_valid_node_id(&self, id: &NodeId) {
        if let Err(reason) = self.check_valid_node_id(id) {
            panic!("Invalid NodeId: {:?}: {}", id, reason);
        }
    }

    /// Returns true if the graph has no nodes.
    fn is_empty(&self) -> bool {
        self.num_nodes() == 0
    }

    /// Gets an iterator over all node ids in index order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.num_nodes()).map(|i| self.node_at(i))
    }

    /// Gets a snapshot of all node ids in index order.  The snapshot is valid
    /// until the next structural mutation.
    fn nodes(&self) -> Vec<NodeId> {
        self.node_ids().collect()
    }

    // Edges

    /// Gets the number of edges in the graph.
    fn num_edges(&self) -> usize;

    /// Gets the edge currently stored at a dense index.  Panics if the index
    /// is out of range.
    fn edge_at(&self, index: usize) -> EdgeId;

    /// Gets the dense index of an edge.  Panics if the edge is not in the
    /// graph.
    fn index_of_edge(&self, id: EdgeId) -> usize;

    /// Gets the data associated with an edge.
    fn edge_data(&self, id: EdgeId) -> &Self::EdgeData;

    /// Gets the source node of an edge.
    fn edge_source(&self, id: EdgeId) -> NodeId;

    /// Gets the target node of an edge.
    fn edge_target(&self, id: EdgeId) -> NodeId;

    /// Gets the weight used by shortest-path and spanning-tree algorithms.
    fn edge_weight(&self, id: EdgeId) -> f64;

    /// Checks if an EdgeId is valid in the graph, returning a reason if it is
    /// not.
    fn check_valid_edge_id(&self, id: &EdgeId) -> Result<(), &'static str>;

    /// Panics if the given EdgeId is not valid in the graph.
    fn assert_valid_edge_id(&self, id: &EdgeId) {
        if let Err(reason) = self.check_valid_edge_id(id) {
            panic!("Invalid EdgeId: {:?}: {}", id, reason);
        }
    }

    /// Gets an iterator over all edge ids in index order.
    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.num_edges()).map(|i| self.edge_at(i))
    }

    /// Gets a snapshot of all edge ids in index order.
    fn edges(&self) -> Vec<EdgeId> {
        self.edge_ids().collect()
    }

    /// Gets an iterator over the edges whose source is the given node, in
    /// insertion order.
    fn edges_from(&self, from: NodeId) -> impl Iterator<Item = EdgeId> + '_;

    /// Gets an iterator over the edges whose target is the given node, in
    /// insertion order.
    fn edges_into(&self, into: NodeId) -> impl Iterator<Item = EdgeId> + '_;

    /// Gets the number of edges whose source is the given node.
    fn num_edges_from(&self, from: NodeId) -> usize {
        self.edges_from(from).count()
    }

    /// Gets the number of edges whose target is the given node.
    fn num_edges_into(&self, into: NodeId) -> usize {
        self.edges_into(into).count()
    }

    /// Gets an iterator over the edges from one node to another.
    fn edges_between(&self, from: NodeId, into: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges_from(from)
            .filter(move |&eid| self.edge_target(eid) == into)
    }

    /// Checks if there is at least one edge from one node to another.
    fn has_edge(&self, from: NodeId, into: NodeId) -> bool {
        self.edges_between(from, into).next().is_some()
    }

    /// Gets the distinct targets of the node's outgoing edges.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut visited = HashSet::new();
        self.edges_from(node).filter_map(move |eid| {
            let nid = self.edge_target(eid);
            visited.insert(nid).then_some(nid)
        })
    }

    /// Gets the distinct sources of the node's incoming edges.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut visited = HashSet::new();
        self.edges_into(node).filter_map(move |eid| {
            let nid = self.edge_source(eid);
            visited.insert(nid).then_some(nid)
        })
    }

    // Versions

    /// Counter incremented by every node insertion or removal.
    fn node_version(&self) -> u64;

    /// Counter incremented by every edge insertion, removal or re-weighting.
    fn edge_version(&self) -> u64;

    /// Both version counters.
    fn version(&self) -> StoreVersion {
        StoreVersion {
            nodes: self.node_version(),
            edges: self.edge_version(),
        }
    }
}

/// A graph that supports structural mutation.
pub trait GraphMut: Graph {
    /// Creates a new, empty graph.
    fn new() -> Self;

    /// Adds a node with the given data, returning its id.
    fn add_node(&mut self, data: Self::NodeData) -> NodeId;

    /// Removes a node and every edge incident to it, returning the node's
    /// data.
    fn remove_node(&mut self, id: NodeId) -> Self::NodeData;

    /// Adds an edge of weight `1.0` from one node to another.
    fn add_edge(&mut self, from: NodeId, into: NodeId, data: Self::EdgeData) -> EdgeId {
        self.add_weighted_edge(from, into, data, 1.0)
    }

    /// Adds an edge with an explicit weight.  Parallel edges and self-loops
    /// are allowed.
    fn add_weighted_edge(
        &mut self,
        from: NodeId,
        into: NodeId,
        data: Self::EdgeData,
        weight: f64,
    ) -> EdgeId;

    /// Removes an edge, returning its data.
    fn remove_edge(&mut self, id: EdgeId) -> Self::EdgeData;

    /// Replaces an edge's weight, returning the previous one.
    fn set_edge_weight(&mut self, id: EdgeId, weight: f64) -> f64;

    /// Gets mutable access to a node's data.  Not a structural mutation.
    fn node_data_mut(&mut self, id: NodeId) -> &mut Self::NodeData;

    /// Gets mutable access to an edge's data.  Not a structural mutation.
    fn edge_data_mut(&mut self, id: EdgeId) -> &mut Self::EdgeData;

    /// Removes all nodes and edges from the graph.
    fn clear(&mut self) {
        while self.num_nodes() > 0 {
            let last = self.node_at(self.num_nodes() - 1);
            self.remove_node(last);
        }
    }

    /// Reserves capacity for at least the given number of additional nodes
    /// and edges.  Does nothing by default.
    fn reserve(&mut self, additional_nodes: usize, additional_edges: usize) {
        let _ = additional_nodes;
        let _ = additional_edges;
    }
}
