//! Algorithms built on the traversal engines.
//!
//! Every algorithm is a configured value implementing [`GraphAlgorithm`].
//! `compute` runs it against a graph and keeps the output, the final
//! [`RunState`] and the graph version it saw; `output` hands the result
//! back until the next `compute` or `reset`.

use crate::{
    error::{GraphError, Result},
    graph::{Graph, StoreVersion},
    run_state::RunState,
    topology::Topology,
};

pub mod components;
pub mod longest_path;
pub mod shortest_path;
pub mod spanning_tree;
pub mod topological_sort;

pub use components::{
    BiconnectedComponents, BiconnectedResult, Components, ConnectedComponents, StrongComponents,
    StrongComponentsResult, WeakComponents,
};
pub use longest_path::{LongestPath, LongestPathResult};
pub use shortest_path::{
    AStar, AllPairsShortestPaths, BellmanFord, Dijkstra, FloydWarshall, QueueKind,
    RepeatedSingleSource, ShortestPaths, SingleSourceShortestPaths, UNREACHABLE,
};
pub use spanning_tree::{
    Boruvka, Kruskal, Prim, SpanningTree, SpanningTreeKind, TraversalSpanningTree,
};
pub use topological_sort::{TopologicalOrder, TopologicalSort};

/// Output, final state and graph version of an algorithm's last run.
#[derive(Clone, Debug)]
pub struct RunRecord<T> {
    state: RunState,
    output: Option<T>,
    version: Option<StoreVersion>,
}

impl<T> Default for RunRecord<T> {
    fn default() -> Self {
        Self {
            state: RunState::NotStarted,
            output: None,
            version: None,
        }
    }
}

impl<T> RunRecord<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the result of a run and returns its state.
    pub fn finish(&mut self, topology: &Topology, state: RunState, output: T) -> RunState {
        self.state = state;
        self.output = Some(output);
        self.version = Some(topology.version());
        state
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn output(&self) -> Option<&T> {
        self.output.as_ref()
    }

    pub fn version(&self) -> Option<StoreVersion> {
        self.version
    }
}

/// A graph algorithm with a compute / read-output lifecycle.
///
/// Outputs are snapshots: they refer to nodes by [`NodeId`] and stay
/// readable after the graph changes, but [`Self::is_stale`] reports once
/// they no longer describe it.
///
/// [`NodeId`]: crate::graph_store::NodeId
pub trait GraphAlgorithm {
    type Output;

    /// Name used in log spans and errors.
    fn name(&self) -> &'static str;

    /// Runs the algorithm on a snapshot, replacing any previous output.
    fn compute_on(&mut self, topology: &Topology) -> Result<RunState>;

    fn record(&self) -> &RunRecord<Self::Output>;

    fn record_mut(&mut self) -> &mut RunRecord<Self::Output>;

    /// Runs the algorithm on a graph.
    fn compute<G: Graph>(&mut self, graph: &G) -> Result<RunState> {
        self.compute_on(&Topology::new(graph))
    }

    /// Discards the last output.
    fn reset(&mut self) {
        self.record_mut().clear();
    }

    fn run_state(&self) -> RunState {
        self.record().state()
    }

    fn output(&self) -> Result<&Self::Output> {
        self.record().output().ok_or(GraphError::NotComputed {
            algorithm: self.name(),
        })
    }

    /// Graph version the last output was computed from.
    fn computed_version(&self) -> Option<StoreVersion> {
        self.record().version()
    }

    /// True if there is no output or the graph changed since it was
    /// computed.
    fn is_stale<G: Graph>(&self, graph: &G) -> bool {
        self.computed_version() != Some(graph.version())
    }
}
