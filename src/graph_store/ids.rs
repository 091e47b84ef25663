use std::fmt::{self, Debug};

use crate::graph_id::GraphId;

/// Stable handle to a node of a [`GraphStore`](super::GraphStore).
///
/// Unlike the node's dense index, a `NodeId` survives removals of other
/// nodes and is never reused by the store that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(super) key: usize,
    pub(super) graph_id: GraphId,
}

/// Stable handle to an edge of a [`GraphStore`](super::GraphStore).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    pub(super) key: usize,
    pub(super) graph_id: GraphId,
}

impl NodeId {
    pub(super) fn new(key: usize, graph_id: GraphId) -> Self {
        Self { key, graph_id }
    }

    /// The store-unique key of this node, in insertion order.
    pub fn key(&self) -> usize {
        self.key
    }
}

impl EdgeId {
    pub(super) fn new(key: usize, graph_id: GraphId) -> Self {
        Self { key, graph_id }
    }

    /// The store-unique key of this edge, in insertion order.
    pub fn key(&self) -> usize {
        self.key
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.key)
    }
}

impl Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.key)
    }
}
