use std::collections::VecDeque;

use bitvec::vec::BitVec;

use super::{ShortestPaths, SingleSourceShortestPaths, UNREACHABLE};
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    collections::{FibonacciHeap, HeapHandle},
    error::{GraphError, Result},
    graph_store::NodeId,
    run_state::RunState,
    topology::Topology,
    tracing_support::{debug, info_span},
    traversal::{Plan, TraversalConfig},
};

/// The frontier structure used by [`Dijkstra`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// Pop the closest node and never relax a settled node again.  Exact
    /// for non-negative weights; silently wrong with negative ones.
    #[default]
    FibonacciHeap,
    /// First-in first-out; a node is queued again whenever its distance
    /// improves.  Tolerates negative weights at a higher cost.
    Fifo,
}

/// Single-source shortest paths by Dijkstra's algorithm.
///
/// Every designated root of the configuration is a source at distance 0.
/// Direction, reversal, exclusions and the depth limit (in edges) are
/// honored.
#[derive(Clone, Debug, Default)]
pub struct Dijkstra {
    config: TraversalConfig,
    queue: QueueKind,
    record: RunRecord<ShortestPaths>,
}

impl Dijkstra {
    pub fn new(source: NodeId) -> Self {
        Self::with_config(TraversalConfig::new().root(source))
    }

    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn queue(mut self, queue: QueueKind) -> Self {
        self.queue = queue;
        self
    }
}

/// Scratch state of one run.
struct Search {
    distances: Vec<f64>,
    predecessor_edges: Vec<Option<usize>>,
    predecessor_nodes: Vec<Option<usize>>,
    hops: Vec<usize>,
}

impl Search {
    fn new(n: usize) -> Self {
        Self {
            distances: vec![UNREACHABLE; n],
            predecessor_edges: vec![None; n],
            predecessor_nodes: vec![None; n],
            hops: vec![0; n],
        }
    }

    /// Records the edge `from -> to` if it improves `to`; returns whether it
    /// did.
    fn relax(&mut self, from: usize, to: usize, edge: usize, weight: f64) -> bool {
        let candidate = self.distances[from] + weight;
        if candidate < self.distances[to] {
            self.distances[to] = candidate;
            self.predecessor_edges[to] = Some(edge);
            self.predecessor_nodes[to] = Some(from);
            self.hops[to] = self.hops[from] + 1;
            true
        } else {
            false
        }
    }
}

fn run_heap(topology: &Topology, plan: &Plan, search: &mut Search) -> RunState {
    let n = topology.num_nodes();
    let mut heap = FibonacciHeap::with_capacity(n);
    let mut handles: Vec<Option<HeapHandle>> = vec![None; n];
    let mut settled: BitVec = BitVec::repeat(false, n);
    for &root in &plan.roots {
        search.distances[root] = 0.0;
        if handles[root].is_none() {
            handles[root] = Some(heap.push(0.0, root));
        }
    }
    while let Some((_, node)) = heap.pop_min() {
        if plan.is_aborted() {
            return RunState::Aborted;
        }
        settled.set(node, true);
        if !plan.scans_at(search.hops[node]) {
            continue;
        }
        for step in topology.steps(node, plan.order) {
            if plan.is_aborted() {
                return RunState::Aborted;
            }
            if settled[step.to] || plan.is_excluded(step.to) {
                continue;
            }
            if search.relax(node, step.to, step.edge, topology.weight(step.edge)) {
                let distance = search.distances[step.to];
                match handles[step.to] {
                    Some(handle) if heap.contains(handle) => {
                        heap.decrease_key(handle, distance);
                    }
                    _ => handles[step.to] = Some(heap.push(distance, step.to)),
                }
            }
        }
    }
    RunState::Completed
}

/// Returns the run state and whether a negative cycle stopped the run.
fn run_fifo(topology: &Topology, plan: &Plan, search: &mut Search) -> (RunState, bool) {
    let n = topology.num_nodes();
    let mut queue = VecDeque::new();
    let mut queued: BitVec = BitVec::repeat(false, n);
    let mut enqueues = vec![0usize; n];
    for &root in &plan.roots {
        search.distances[root] = 0.0;
        if !queued[root] {
            queued.set(root, true);
            queue.push_back(root);
        }
    }
    while let Some(node) = queue.pop_front() {
        if plan.is_aborted() {
            return (RunState::Aborted, false);
        }
        queued.set(node, false);
        if !plan.scans_at(search.hops[node]) {
            continue;
        }
        for step in topology.steps(node, plan.order) {
            if plan.is_aborted() {
                return (RunState::Aborted, false);
            }
            if plan.is_excluded(step.to) {
                continue;
            }
            if search.relax(node, step.to, step.edge, topology.weight(step.edge))
                && !queued[step.to]
            {
                enqueues[step.to] += 1;
                // Without negative cycles a node improves at most once per
                // node in the graph.
                if enqueues[step.to] > n {
                    return (RunState::Completed, true);
                }
                queued.set(step.to, true);
                queue.push_back(step.to);
            }
        }
    }
    (RunState::Completed, false)
}

impl GraphAlgorithm for Dijkstra {
    type Output = ShortestPaths;

    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "dijkstra",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        if self.config.designated_roots().is_empty() {
            return Err(GraphError::InvalidConfiguration(
                "shortest paths need a source",
            ));
        }
        let plan = self.config.plan(topology)?;
        let mut search = Search::new(topology.num_nodes());
        let (state, negative_cycle) = match self.queue {
            QueueKind::FibonacciHeap => (run_heap(topology, &plan, &mut search), false),
            QueueKind::Fifo => run_fifo(topology, &plan, &mut search),
        };
        if state == RunState::Aborted {
            debug!(nodes = topology.num_nodes(), "dijkstra aborted");
        }
        let output = ShortestPaths::from_indices(
            topology,
            &plan.roots,
            search.distances,
            &search.predecessor_edges,
            &search.predecessor_nodes,
            negative_cycle,
        );
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<ShortestPaths> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<ShortestPaths> {
        &mut self.record
    }
}

impl SingleSourceShortestPaths for Dijkstra {
    fn set_source(&mut self, source: NodeId) {
        self.config = self.config.clone().set_roots([source]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{Graph, GraphMut},
        graph_store::GraphStore,
        graph_test_support::{ArbGraph, relaxed_distances},
        run_state::AbortFlag,
    };
    use quickcheck_macros::quickcheck;

    fn diamond() -> (GraphStore<&'static str, ()>, Vec<NodeId>) {
        let mut graph = GraphStore::new();
        let n: Vec<_> = ["s", "a", "b", "t"].map(|s| graph.add_node(s)).to_vec();
        for (x, y, w) in [(0, 1, 1.0), (0, 2, 4.0), (1, 2, 2.0), (1, 3, 6.0), (2, 3, 1.0)] {
            graph.add_weighted_edge(n[x], n[y], (), w);
        }
        (graph, n)
    }

    #[test]
    fn test_diamond() {
        let (graph, n) = diamond();
        for queue in [QueueKind::FibonacciHeap, QueueKind::Fifo] {
            let mut dijkstra = Dijkstra::new(n[0]).queue(queue);
            assert_eq!(dijkstra.compute(&graph).unwrap(), RunState::Completed);
            let paths = dijkstra.output().unwrap();
            assert_eq!(paths.distances(), &[0.0, 1.0, 3.0, 4.0]);
            assert_eq!(paths.path_to(n[3]).unwrap().nodes(), &[n[0], n[1], n[2], n[3]]);
            assert_eq!(paths.path_to(n[3]).unwrap().total_weight(&graph), 4.0);
        }
    }

    #[test]
    fn test_unreachable_and_reversed() {
        let (graph, n) = diamond();
        let mut dijkstra = Dijkstra::new(n[3]);
        dijkstra.compute(&graph).unwrap();
        assert!(!dijkstra.output().unwrap().is_reachable(n[0]));
        assert!(dijkstra.output().unwrap().path_to(n[0]).is_none());

        let mut reversed = Dijkstra::with_config(TraversalConfig::new().root(n[3]).reversed(true));
        reversed.compute(&graph).unwrap();
        assert_eq!(reversed.output().unwrap().distance_to(n[0]), 4.0);
    }

    #[test]
    fn test_requires_source() {
        let (graph, _) = diamond();
        let mut dijkstra = Dijkstra::default();
        assert!(matches!(
            dijkstra.compute(&graph),
            Err(GraphError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_negative_edge_is_wrong_with_heap_but_not_fifo() {
        // s -> a (2), s -> b (3), b -> a (-2): the heap settles a at 2.
        let mut graph = GraphStore::<(), ()>::new();
        let s = graph.add_node(());
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_weighted_edge(s, a, (), 2.0);
        graph.add_weighted_edge(s, b, (), 3.0);
        graph.add_weighted_edge(b, a, (), -2.0);

        let mut heap = Dijkstra::new(s);
        heap.compute(&graph).unwrap();
        assert_eq!(heap.output().unwrap().distance_to(a), 2.0);

        let mut fifo = Dijkstra::new(s).queue(QueueKind::Fifo);
        fifo.compute(&graph).unwrap();
        assert_eq!(fifo.output().unwrap().distance_to(a), 1.0);
        assert!(!fifo.output().unwrap().has_negative_cycle());
    }

    #[test]
    fn test_fifo_stops_on_negative_cycle() {
        let mut graph = GraphStore::<(), ()>::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_weighted_edge(a, b, (), 1.0);
        graph.add_weighted_edge(b, a, (), -2.0);
        let mut fifo = Dijkstra::new(a).queue(QueueKind::Fifo);
        assert_eq!(fifo.compute(&graph).unwrap(), RunState::Completed);
        assert!(fifo.output().unwrap().has_negative_cycle());
    }

    #[test]
    fn test_abort_keeps_partial_output() {
        let (graph, n) = diamond();
        let abort = AbortFlag::new();
        abort.abort();
        let mut dijkstra = Dijkstra::with_config(TraversalConfig::new().root(n[0]).abort_flag(abort));
        assert_eq!(dijkstra.compute(&graph).unwrap(), RunState::Aborted);
        assert_eq!(dijkstra.run_state(), RunState::Aborted);
        assert!(dijkstra.output().is_ok());
    }

    #[quickcheck]
    fn prop_matches_relaxation(ArbGraph { graph }: ArbGraph, undirected: bool) -> bool {
        if graph.is_empty() {
            return true;
        }
        let source = graph.node_at(0);
        let expected = relaxed_distances(&graph, source, !undirected);
        [QueueKind::FibonacciHeap, QueueKind::Fifo].into_iter().all(|queue| {
            let config = TraversalConfig::new().root(source).directed(!undirected);
            let mut dijkstra = Dijkstra::with_config(config).queue(queue);
            dijkstra.compute(&graph).unwrap();
            let paths = dijkstra.output().unwrap();
            paths.distances() == expected.as_slice()
                && graph.node_ids().all(|node| match paths.path_to(node) {
                    Some(path) => {
                        path.is_valid_in(&graph, !undirected)
                            && path.total_weight(&graph) == paths.distance_to(node)
                    }
                    None => !paths.is_reachable(node),
                })
        })
    }
}
