pub use crate::algorithms::GraphAlgorithm;
pub use crate::error::{GraphError, Result};
pub use crate::graph::{Graph, GraphMut};
pub use crate::graph_store::{EdgeId, GraphStore, NodeId};
pub use crate::path::Path;
pub use crate::run_state::{AbortFlag, RunState};
pub use crate::topology::Topology;
pub use crate::traversal::{TraversalConfig, TraversalVisitor};
