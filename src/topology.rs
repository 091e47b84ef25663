//! Dense structural snapshot of a graph.
//!
//! Every engine and algorithm run starts by taking a [`Topology`].  It
//! re-derives node and edge indices from the graph at that instant, so runs
//! never depend on indices cached before a mutation, and it gives the
//! traversal loops plain slice access instead of handle lookups.

use crate::{
    graph::{Graph, StoreVersion},
    graph_store::{EdgeId, NodeId},
};

/// Which incidence list of a node is being scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Incidence {
    /// Out-edges; the far end is the edge's target.
    Out,
    /// In-edges; the far end is the edge's source.
    In,
}

/// One edge as seen while standing on one of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeStep {
    /// Dense index of the edge.
    pub edge: usize,
    /// The node the edge is being examined from.
    pub from: usize,
    /// The far endpoint.
    pub to: usize,
    /// True when the step follows the edge from source to target.
    pub forward: bool,
}

#[derive(Clone, Debug)]
pub struct Topology {
    node_ids: Vec<NodeId>,
    edge_ids: Vec<EdgeId>,
    sources: Vec<usize>,
    targets: Vec<usize>,
    weights: Vec<f64>,
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
    version: StoreVersion,
}

impl Topology {
    pub fn new<G: Graph>(graph: &G) -> Self {
        let num_nodes = graph.num_nodes();
        let num_edges = graph.num_edges();
        let node_ids = graph.nodes();
        let edge_ids = graph.edges();
        let mut sources = Vec::with_capacity(num_edges);
        let mut targets = Vec::with_capacity(num_edges);
        let mut weights = Vec::with_capacity(num_edges);
        for &eid in &edge_ids {
            sources.push(graph.index_of_node(graph.edge_source(eid)));
            targets.push(graph.index_of_node(graph.edge_target(eid)));
            weights.push(graph.edge_weight(eid));
        }
        // Built per node so incidence lists keep the store's insertion order.
        let out_edges = node_ids
            .iter()
            .map(|&nid| graph.edges_from(nid).map(|e| graph.index_of_edge(e)).collect())
            .collect();
        let in_edges = node_ids
            .iter()
            .map(|&nid| graph.edges_into(nid).map(|e| graph.index_of_edge(e)).collect())
            .collect();
        debug_assert_eq!(node_ids.len(), num_nodes);
        Self {
            node_ids,
            edge_ids,
            sources,
            targets,
            weights,
            out_edges,
            in_edges,
            version: graph.version(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.node_ids.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_ids.len()
    }

    pub fn node_id(&self, index: usize) -> NodeId {
        self.node_ids[index]
    }

    pub fn edge_id(&self, index: usize) -> EdgeId {
        self.edge_ids[index]
    }

    /// Finds the dense index of a node.  Linear in the number of nodes; the
    /// graph itself answers this in O(1) and should be preferred when at hand.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.node_ids.iter().position(|&nid| nid == id)
    }

    pub fn source(&self, edge: usize) -> usize {
        self.sources[edge]
    }

    pub fn target(&self, edge: usize) -> usize {
        self.targets[edge]
    }

    pub fn weight(&self, edge: usize) -> f64 {
        self.weights[edge]
    }

    pub fn is_self_loop(&self, edge: usize) -> bool {
        self.sources[edge] == self.targets[edge]
    }

    pub fn out_edges(&self, node: usize) -> &[usize] {
        &self.out_edges[node]
    }

    pub fn in_edges(&self, node: usize) -> &[usize] {
        &self.in_edges[node]
    }

    /// The version of the graph the snapshot was taken from.
    pub fn version(&self) -> StoreVersion {
        self.version
    }

    /// The `cursor`-th edge of one incidence list of `node`, as a step away
    /// from `node`.
    pub fn step(&self, node: usize, incidence: Incidence, cursor: usize) -> Option<EdgeStep> {
        match incidence {
            Incidence::Out => self.out_edges[node].get(cursor).map(|&edge| EdgeStep {
                edge,
                from: node,
                to: self.targets[edge],
                forward: true,
            }),
            Incidence::In => self.in_edges[node].get(cursor).map(|&edge| EdgeStep {
                edge,
                from: node,
                to: self.sources[edge],
                forward: false,
            }),
        }
    }

    /// All steps leaving `node` under the given incidence scan order.
    pub fn steps<'t>(
        &'t self,
        node: usize,
        order: &'t [Incidence],
    ) -> impl Iterator<Item = EdgeStep> + 't {
        order.iter().flat_map(move |&incidence| {
            (0..)
                .map(move |cursor| self.step(node, incidence, cursor))
                .take_while(Option::is_some)
                .flatten()
        })
    }

    /// Node indices whose predicate holds, as a dense flag set.
    pub(crate) fn mark_nodes(&self, predicate: impl Fn(NodeId) -> bool) -> bitvec::vec::BitVec {
        self.node_ids.iter().map(|&nid| predicate(nid)).collect()
    }
}
