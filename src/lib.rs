//! An index-addressable directed multigraph store, a hook-driven traversal
//! engine (depth-first, breadth-first and best-first), and the classic
//! algorithms built on it: connected, weak, strong and biconnected
//! components, shortest paths, spanning trees, longest paths and
//! topological sorting.
//!
//! Algorithms never write into the graph.  Each run takes a
//! [`Topology`] snapshot and keeps its scratch state to itself, so any
//! number of runs may read the same graph at once.

pub mod algorithms;
pub mod collections;
pub mod error;
pub mod graph;
pub mod graph_store;
pub mod path;
pub mod prelude;
pub mod run_state;
pub mod topology;
pub mod traversal;

mod graph_id;
mod tracing_support;

#[cfg(test)]
mod graph_test_support;

pub use error::{GraphError, Result};
pub use graph::{Graph, GraphMut, StoreVersion};
pub use graph_store::{EdgeId, GraphStore, NodeId};
pub use path::Path;
pub use run_state::{AbortFlag, RunState};
pub use topology::Topology;
pub use tracing_support::{dump_method_timings, init_tracing, method_timings, reset_method_timings};
