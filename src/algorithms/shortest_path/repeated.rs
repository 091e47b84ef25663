use super::{AllPairsShortestPaths, SingleSourceShortestPaths};
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    run_state::RunState,
    topology::Topology,
    tracing_support::{debug, info_span},
};

/// All-pairs shortest paths by running a single-source solver once from
/// every node.
///
/// The solver's own configuration (direction, exclusions, abort flag) is
/// kept; only its source changes between runs.  An aborted inner run stops
/// the whole computation with the rows gathered so far.
#[derive(Clone, Debug, Default)]
pub struct RepeatedSingleSource<S> {
    solver: S,
    record: RunRecord<AllPairsShortestPaths>,
}

impl<S> RepeatedSingleSource<S>
where
    S: SingleSourceShortestPaths + Clone,
{
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            record: RunRecord::new(),
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }
}

impl<S> GraphAlgorithm for RepeatedSingleSource<S>
where
    S: SingleSourceShortestPaths + Clone,
{
    type Output = AllPairsShortestPaths;

    fn name(&self) -> &'static str {
        "repeated_single_source"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "repeated_single_source",
            solver = self.solver.name(),
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let mut solver = self.solver.clone();
        let mut trees = Vec::with_capacity(topology.num_nodes());
        let mut state = RunState::Completed;
        for source in 0..topology.num_nodes() {
            solver.set_source(topology.node_id(source));
            if solver.compute_on(topology)? == RunState::Aborted {
                debug!(source, "repeated_single_source aborted");
                state = RunState::Aborted;
                break;
            }
            trees.push(solver.output()?.clone());
        }
        let output = AllPairsShortestPaths::from_trees(topology, trees);
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<AllPairsShortestPaths> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<AllPairsShortestPaths> {
        &mut self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithms::shortest_path::{BellmanFord, Dijkstra, FloydWarshall, QueueKind, UNREACHABLE},
        graph::{Graph, GraphMut},
        graph_store::GraphStore,
        graph_test_support::ArbGraph,
        run_state::AbortFlag,
        traversal::TraversalConfig,
    };
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_rows_per_source() {
        let mut graph = GraphStore::<(), ()>::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_weighted_edge(a, b, (), 2.0);
        graph.add_weighted_edge(b, c, (), 3.0);
        let mut repeated = RepeatedSingleSource::new(Dijkstra::new(a));
        assert_eq!(repeated.compute(&graph).unwrap(), RunState::Completed);
        let all_pairs = repeated.output().unwrap();
        assert_eq!(all_pairs.distance(a, c), 5.0);
        assert_eq!(all_pairs.distance(b, c), 3.0);
        assert_eq!(all_pairs.distance(c, a), UNREACHABLE);
        assert_eq!(all_pairs.path(a, c).unwrap().unwrap().nodes(), &[a, b, c]);
    }

    #[test]
    fn test_abort_keeps_partial_rows() {
        let mut graph = GraphStore::<(), ()>::new();
        let a = graph.add_node(());
        graph.add_node(());
        let abort = AbortFlag::new();
        abort.abort();
        let solver = Dijkstra::with_config(TraversalConfig::new().root(a).abort_flag(abort));
        let mut repeated = RepeatedSingleSource::new(solver);
        assert_eq!(repeated.compute(&graph).unwrap(), RunState::Aborted);
        assert!(repeated.output().unwrap().distances().is_empty());
    }

    #[quickcheck]
    fn prop_all_pairs_solvers_agree(ArbGraph { graph }: ArbGraph, undirected: bool) -> bool {
        let config = || TraversalConfig::new().directed(!undirected);
        let mut floyd_warshall = FloydWarshall::with_config(config());
        floyd_warshall.compute(&graph).unwrap();
        let expected = floyd_warshall.output().unwrap().distances().to_vec();

        let mut by_heap = RepeatedSingleSource::new(Dijkstra::with_config(config()));
        let mut by_fifo =
            RepeatedSingleSource::new(Dijkstra::with_config(config()).queue(QueueKind::Fifo));
        let mut by_bellman_ford = RepeatedSingleSource::new(BellmanFord::with_config(config()));
        by_heap.compute(&graph).unwrap();
        by_fifo.compute(&graph).unwrap();
        by_bellman_ford.compute(&graph).unwrap();
        by_heap.output().unwrap().distances() == expected.as_slice()
            && by_fifo.output().unwrap().distances() == expected.as_slice()
            && by_bellman_ford.output().unwrap().distances() == expected.as_slice()
    }
}
