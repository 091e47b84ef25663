use thiserror::Error;

use crate::graph_store::{EdgeId, NodeId};

/// Errors reported by traversal engines and algorithms.
///
/// These are reserved for programmer errors.  Conditions that depend on the
/// data, such as an unreachable node or a negative cycle, are reported as
/// state on the algorithm's output instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A configuration value was rejected when it was set.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// An output accessor was used before `compute` ran.
    #[error("{algorithm} has not been computed")]
    NotComputed { algorithm: &'static str },

    /// A configured root or query node does not belong to the graph.
    #[error("node {0:?} is not part of the graph")]
    UnknownNode(NodeId),

    /// An edge handle does not belong to the graph.
    #[error("edge {0:?} is not part of the graph")]
    UnknownEdge(EdgeId),

    /// A recursive traversal was requested on a graph too large for the call
    /// stack.
    #[error("recursive traversal of {nodes} nodes exceeds the limit of {limit}")]
    RecursionLimit { nodes: usize, limit: usize },

    /// A pair reported as reachable has no edge to rebuild the path from.
    #[error("no edge from node index {from} to node index {to} while rebuilding a path")]
    MissingPathEdge { from: usize, to: usize },
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
