use std::{collections::BinaryHeap, sync::Arc};

use derivative::Derivative;

use super::{Color, TraversalConfig, TraversalVisitor};
use crate::{
    algorithms::shortest_path::UNREACHABLE,
    collections::MinScored,
    error::{GraphError, Result},
    graph_store::NodeId,
    run_state::RunState,
    topology::Topology,
    tracing_support::debug,
};

pub type Heuristic = Arc<dyn Fn(NodeId) -> f64 + Send + Sync>;

/// Best-first search ordered by `g + h(node)`, where `g` is the cost of the
/// best path found so far and `h` an optional heuristic estimate of the
/// remaining cost.  Without a heuristic this is Dijkstra's algorithm with
/// lazy deletion.
///
/// A node is relaxed whenever a strictly cheaper path to it turns up, even
/// after it was settled, so an inadmissible heuristic costs time rather
/// than correctness.  Visitor hooks: `on_new_tree` and `on_discover_node`
/// for each root, `on_discover_node` on a node's first reach,
/// `on_tree_edge` on every improving relaxation and `on_finish_node` every
/// time a node is settled.
#[derive(Clone, Default, Derivative)]
#[derivative(Debug)]
pub struct BestFirst {
    config: TraversalConfig,
    #[derivative(Debug = "ignore")]
    heuristic: Option<Heuristic>,
    target: Option<NodeId>,
}

/// What a best-first run found.  Vectors are indexed by node index.
#[derive(Clone, Debug, PartialEq)]
pub struct BestFirstOutcome {
    pub state: RunState,
    /// Cost of the best path found; [`UNREACHABLE`] if none.
    pub distances: Vec<f64>,
    pub predecessor_edges: Vec<Option<usize>>,
    pub predecessor_nodes: Vec<Option<usize>>,
    /// Index of the configured target, if any.
    pub target: Option<usize>,
    pub target_reached: bool,
    /// Set when an improving path grew to `n` edges, which only a negative
    /// cycle can cause.  The run stops at that point.
    pub negative_cycle: bool,
}

impl BestFirst {
    pub fn new(config: TraversalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn heuristic(mut self, heuristic: impl Fn(NodeId) -> f64 + Send + Sync + 'static) -> Self {
        self.heuristic = Some(Arc::new(heuristic));
        self
    }

    /// Stops the search as soon as `target` is settled.
    pub fn target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn run<V>(&self, topology: &Topology, visitor: &mut V) -> Result<BestFirstOutcome>
    where
        V: TraversalVisitor + ?Sized,
    {
        if self.config.designated_roots().is_empty() {
            return Err(GraphError::InvalidConfiguration(
                "best-first search needs at least one root",
            ));
        }
        let plan = self.config.plan(topology)?;
        let target = self
            .target
            .map(|t| topology.index_of(t).ok_or(GraphError::UnknownNode(t)))
            .transpose()?;
        let estimate = |node: usize| {
            self.heuristic
                .as_ref()
                .map_or(0.0, |h| h(topology.node_id(node)))
        };

        let n = topology.num_nodes();
        let mut distances = vec![UNREACHABLE; n];
        let mut predecessor_edges = vec![None; n];
        let mut predecessor_nodes = vec![None; n];
        let mut hops = vec![0; n];
        let mut colors = vec![Color::White; n];
        let mut heap = BinaryHeap::new();

        for &root in &plan.roots {
            if colors[root] != Color::White {
                continue;
            }
            distances[root] = 0.0;
            colors[root] = Color::Gray;
            visitor.on_new_tree(root);
            visitor.on_discover_node(root, 0);
            heap.push(MinScored(estimate(root), (root, 0.0)));
        }

        let mut state = RunState::Completed;
        let mut target_reached = false;
        let mut negative_cycle = false;
        'search: while let Some(MinScored(_, (node, cost))) = heap.pop() {
            if plan.is_aborted() {
                state = RunState::Aborted;
                break;
            }
            if cost > distances[node] {
                continue;
            }
            colors[node] = Color::Black;
            visitor.on_finish_node(node, hops[node]);
            if Some(node) == target {
                target_reached = true;
                break;
            }
            if !plan.scans_at(hops[node]) {
                continue;
            }
            for step in topology.steps(node, plan.order) {
                if plan.is_aborted() {
                    state = RunState::Aborted;
                    break 'search;
                }
                if plan.is_excluded(step.to) {
                    continue;
                }
                let candidate = cost + topology.weight(step.edge);
                if candidate < distances[step.to] {
                    // Every improvement extends a walk of strict
                    // improvements; one with `n` edges repeats a node, and
                    // the cycle it closes is negative.
                    if hops[node] + 1 >= n {
                        negative_cycle = true;
                        break 'search;
                    }
                    if colors[step.to] == Color::White {
                        visitor.on_discover_node(step.to, hops[node] + 1);
                    }
                    distances[step.to] = candidate;
                    predecessor_edges[step.to] = Some(step.edge);
                    predecessor_nodes[step.to] = Some(node);
                    hops[step.to] = hops[node] + 1;
                    colors[step.to] = Color::Gray;
                    visitor.on_tree_edge(step);
                    heap.push(MinScored(candidate + estimate(step.to), (step.to, candidate)));
                }
            }
        }
        if state == RunState::Aborted {
            debug!(nodes = n, "best-first search aborted");
        }

        Ok(BestFirstOutcome {
            state,
            distances,
            predecessor_edges,
            predecessor_nodes,
            target,
            target_reached,
            negative_cycle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::GraphMut,
        graph_store::GraphStore,
        run_state::AbortFlag,
        topology::EdgeStep,
        traversal::TraversalEvent,
    };

    fn weighted(n: usize, edges: &[(usize, usize, f64)]) -> (GraphStore<usize, ()>, Vec<NodeId>) {
        let mut graph = GraphStore::new();
        let nodes: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
        for &(a, b, w) in edges {
            graph.add_weighted_edge(nodes[a], nodes[b], (), w);
        }
        (graph, nodes)
    }

    #[test]
    fn test_requires_a_root() {
        let (graph, _) = weighted(1, &[]);
        let err = BestFirst::default()
            .run(&Topology::new(&graph), &mut Vec::<TraversalEvent>::new())
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_plain_search_finds_cheapest_paths() {
        let (graph, nodes) = weighted(
            4,
            &[(0, 1, 4.0), (0, 2, 1.0), (2, 1, 2.0), (1, 3, 1.0), (2, 3, 5.0)],
        );
        let topology = Topology::new(&graph);
        let outcome = BestFirst::new(TraversalConfig::new().root(nodes[0]))
            .run(&topology, &mut Vec::<TraversalEvent>::new())
            .unwrap();
        assert_eq!(outcome.state, RunState::Completed);
        assert_eq!(outcome.distances, vec![0.0, 3.0, 1.0, 4.0]);
        assert_eq!(outcome.predecessor_nodes, vec![None, Some(2), Some(0), Some(1)]);
        assert!(!outcome.negative_cycle);
    }

    #[test]
    fn test_settled_node_is_reopened_by_cheaper_path() {
        // The heuristic hides the cheap route through b until a and t have
        // been settled once.
        let (graph, nodes) = weighted(4, &[(0, 1, 5.0), (0, 2, 1.0), (2, 1, 1.0), (1, 3, 1.0)]);
        let b = nodes[2];
        let topology = Topology::new(&graph);
        let mut events = Vec::<TraversalEvent>::new();
        let outcome = BestFirst::new(TraversalConfig::new().root(nodes[0]))
            .heuristic(move |n| if n == b { 10.0 } else { 0.0 })
            .run(&topology, &mut events)
            .unwrap();
        assert_eq!(outcome.distances, vec![0.0, 2.0, 1.0, 3.0]);
        let settles_of_a = events
            .iter()
            .filter(|e| matches!(e, TraversalEvent::Finish { node: 1, .. }))
            .count();
        assert_eq!(settles_of_a, 2);
    }

    #[test]
    fn test_inconsistent_heuristic_reopens_without_cycle() {
        // The last node is settled once per improving path, more times than
        // there are nodes, yet the graph is acyclic.
        let (graph, nodes) = weighted(
            5,
            &[
                (0, 1, 183.0),
                (0, 2, 448.0),
                (0, 3, 857.0),
                (0, 4, 899.0),
                (1, 2, 57.0),
                (1, 3, 323.0),
                (1, 4, 279.0),
                (2, 3, 30.0),
                (2, 4, 202.0),
                (3, 4, 82.0),
            ],
        );
        let estimates: Vec<(NodeId, f64)> = nodes
            .iter()
            .copied()
            .zip([0.0, 1406.0, 950.0, 940.0, 353.0])
            .collect();
        let topology = Topology::new(&graph);
        let mut events = Vec::<TraversalEvent>::new();
        let outcome = BestFirst::new(TraversalConfig::new().root(nodes[0]))
            .heuristic(move |n| {
                estimates
                    .iter()
                    .find(|&&(id, _)| id == n)
                    .map_or(0.0, |&(_, h)| h)
            })
            .run(&topology, &mut events)
            .unwrap();
        assert_eq!(outcome.state, RunState::Completed);
        assert!(!outcome.negative_cycle);
        assert_eq!(outcome.distances, vec![0.0, 183.0, 240.0, 270.0, 352.0]);
        let settles_of_last = events
            .iter()
            .filter(|e| matches!(e, TraversalEvent::Finish { node: 4, .. }))
            .count();
        assert!(settles_of_last > 5);
    }

    #[test]
    fn test_target_stops_early() {
        let (graph, nodes) = weighted(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 3, 10.0)]);
        let topology = Topology::new(&graph);
        let outcome = BestFirst::new(TraversalConfig::new().root(nodes[0]))
            .target(nodes[1])
            .run(&topology, &mut Vec::<TraversalEvent>::new())
            .unwrap();
        assert!(outcome.target_reached);
        assert_eq!(outcome.target, Some(1));
        assert_eq!(outcome.distances[1], 1.0);
        assert_eq!(outcome.distances[2], UNREACHABLE);
        assert_eq!(outcome.distances[3], 10.0);
    }

    #[test]
    fn test_negative_cycle_stops_the_run() {
        let (graph, nodes) = weighted(2, &[(0, 1, 1.0), (1, 0, -3.0)]);
        let topology = Topology::new(&graph);
        let outcome = BestFirst::new(TraversalConfig::new().root(nodes[0]))
            .run(&topology, &mut Vec::<TraversalEvent>::new())
            .unwrap();
        assert!(outcome.negative_cycle);
    }

    #[test]
    fn test_abort() {
        let (graph, nodes) = weighted(2, &[(0, 1, 1.0)]);
        let abort = AbortFlag::new();
        abort.abort();
        let outcome = BestFirst::new(TraversalConfig::new().root(nodes[0]).abort_flag(abort))
            .run(&Topology::new(&graph), &mut Vec::<TraversalEvent>::new())
            .unwrap();
        assert_eq!(outcome.state, RunState::Aborted);
    }

    struct AbortOnFirstEdge(AbortFlag);

    impl TraversalVisitor for AbortOnFirstEdge {
        fn on_tree_edge(&mut self, _step: EdgeStep) {
            self.0.abort();
        }
    }

    #[test]
    fn test_abort_between_edges() {
        let (graph, nodes) = weighted(3, &[(0, 1, 1.0), (0, 2, 1.0)]);
        let abort = AbortFlag::new();
        let outcome = BestFirst::new(TraversalConfig::new().root(nodes[0]).abort_flag(abort.clone()))
            .run(&Topology::new(&graph), &mut AbortOnFirstEdge(abort))
            .unwrap();
        assert_eq!(outcome.state, RunState::Aborted);
        let reached = outcome.distances.iter().filter(|&&d| d < UNREACHABLE).count();
        assert_eq!(reached, 2);
    }
}
