//! Spanning trees and minimum spanning forests.
//!
//! [`TraversalSpanningTree`] keeps the tree edges of a breadth- or
//! depth-first walk.  [`Kruskal`], [`Boruvka`] and [`Prim`] build minimum
//! spanning forests of the undirected view; they all break weight ties by
//! edge index, so on the same graph they pick the same edges.

use std::cmp::Ordering;

use crate::{
    collections::UnionFind,
    graph_store::{EdgeId, NodeId},
    topology::Topology,
    traversal::Plan,
};

mod boruvka;
mod kruskal;
mod prim;
mod traversal_tree;

pub use boruvka::Boruvka;
pub use kruskal::Kruskal;
pub use prim::Prim;
pub use traversal_tree::{SpanningTreeKind, TraversalSpanningTree};

/// A spanning forest.  Edges are listed in the order they were chosen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanningTree {
    edges: Vec<EdgeId>,
    total_weight: f64,
    roots: Vec<NodeId>,
}

impl SpanningTree {
    pub(crate) fn from_indices(topology: &Topology, edges: &[usize], roots: &[usize]) -> Self {
        Self {
            edges: edges.iter().map(|&e| topology.edge_id(e)).collect(),
            total_weight: edges.iter().map(|&e| topology.weight(e)).sum(),
            roots: roots.iter().map(|&n| topology.node_id(n)).collect(),
        }
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// One node per tree of the forest.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn num_trees(&self) -> usize {
        self.roots.len()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }
}

/// Orders edges by weight, then by index.
pub(crate) fn compare_edges(topology: &Topology, a: usize, b: usize) -> Ordering {
    topology
        .weight(a)
        .total_cmp(&topology.weight(b))
        .then(a.cmp(&b))
}

/// Edges a minimum spanning forest may use: no self-loops, no excluded
/// endpoint.
pub(crate) fn candidate_edges(topology: &Topology, plan: &Plan) -> Vec<usize> {
    (0..topology.num_edges())
        .filter(|&e| {
            !topology.is_self_loop(e)
                && !plan.is_excluded(topology.source(e))
                && !plan.is_excluded(topology.target(e))
        })
        .collect()
}

/// The lowest-indexed node of every set, in index order.
pub(crate) fn forest_roots(topology: &Topology, plan: &Plan, sets: &mut UnionFind) -> Vec<usize> {
    let mut seen = vec![false; topology.num_nodes()];
    let mut roots = Vec::new();
    for node in 0..topology.num_nodes() {
        if plan.is_excluded(node) {
            continue;
        }
        let set = sets.find(node);
        if !seen[set] {
            seen[set] = true;
            roots.push(node);
        }
    }
    roots
}
