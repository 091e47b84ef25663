use super::{ShortestPaths, SingleSourceShortestPaths, UNREACHABLE, arcs};
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::{GraphError, Result},
    graph_store::NodeId,
    run_state::RunState,
    topology::Topology,
    tracing_support::{debug, info_span},
    traversal::TraversalConfig,
};

/// Single-source shortest paths by Bellman-Ford relaxation.
///
/// Handles negative weights.  After `n - 1` passes one more pass over the
/// edges decides [`ShortestPaths::has_negative_cycle`]; when it is set the
/// distances of nodes on or behind the cycle are meaningless.  The depth
/// limit of the configuration is not used.
#[derive(Clone, Debug, Default)]
pub struct BellmanFord {
    config: TraversalConfig,
    record: RunRecord<ShortestPaths>,
}

impl BellmanFord {
    pub fn new(source: NodeId) -> Self {
        Self::with_config(TraversalConfig::new().root(source))
    }

    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            record: RunRecord::new(),
        }
    }
}

impl GraphAlgorithm for BellmanFord {
    type Output = ShortestPaths;

    fn name(&self) -> &'static str {
        "bellman_ford"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "bellman_ford",
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
        let n = topology.num_nodes();
        let mut distances = vec![UNREACHABLE; n];
        let mut predecessor_edges = vec![None; n];
        let mut predecessor_nodes = vec![None; n];
        for &root in &plan.roots {
            distances[root] = 0.0;
        }

        let usable = |from: usize, to: usize| !plan.is_excluded(from) && !plan.is_excluded(to);
        let mut state = RunState::Completed;
        for _ in 1..n {
            if plan.is_aborted() {
                state = RunState::Aborted;
                break;
            }
            let mut changed = false;
            for edge in 0..topology.num_edges() {
                let weight = topology.weight(edge);
                for (from, to) in arcs(topology, plan.order, edge) {
                    if !usable(from, to) || distances[from] == UNREACHABLE {
                        continue;
                    }
                    if distances[from] + weight < distances[to] {
                        distances[to] = distances[from] + weight;
                        predecessor_edges[to] = Some(edge);
                        predecessor_nodes[to] = Some(from);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let has_negative_cycle = state == RunState::Completed
            && (0..topology.num_edges()).any(|edge| {
                let weight = topology.weight(edge);
                arcs(topology, plan.order, edge).any(|(from, to)| {
                    usable(from, to)
                        && distances[from] != UNREACHABLE
                        && distances[from] + weight < distances[to]
                })
            });
        if has_negative_cycle {
            debug!("bellman_ford found a negative cycle");
        }
        if state == RunState::Aborted {
            debug!(nodes = n, "bellman_ford aborted");
        }
        let output = ShortestPaths::from_indices(
            topology,
            &plan.roots,
            distances,
            &predecessor_edges,
            &predecessor_nodes,
            has_negative_cycle,
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

impl SingleSourceShortestPaths for BellmanFord {
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
        graph_test_support::{ArbDag, ArbGraph, relaxed_distances},
    };
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_negative_edges_without_cycle() {
        let mut graph = GraphStore::<(), ()>::new();
        let n: Vec<_> = (0..4).map(|_| graph.add_node(())).collect();
        graph.add_weighted_edge(n[0], n[1], (), 4.0);
        graph.add_weighted_edge(n[0], n[2], (), 5.0);
        graph.add_weighted_edge(n[2], n[1], (), -3.0);
        graph.add_weighted_edge(n[1], n[3], (), 1.0);
        let mut bellman_ford = BellmanFord::new(n[0]);
        assert_eq!(bellman_ford.compute(&graph).unwrap(), RunState::Completed);
        let paths = bellman_ford.output().unwrap();
        assert_eq!(paths.distances(), &[0.0, 2.0, 5.0, 3.0]);
        assert!(!paths.has_negative_cycle());
        assert_eq!(paths.path_to(n[3]).unwrap().nodes(), &[n[0], n[2], n[1], n[3]]);
    }

    #[test]
    fn test_detects_negative_cycle() {
        let mut graph = GraphStore::<(), ()>::new();
        let n: Vec<_> = (0..3).map(|_| graph.add_node(())).collect();
        graph.add_weighted_edge(n[0], n[1], (), 1.0);
        graph.add_weighted_edge(n[1], n[2], (), -1.0);
        graph.add_weighted_edge(n[2], n[1], (), -1.0);
        let mut bellman_ford = BellmanFord::new(n[0]);
        bellman_ford.compute(&graph).unwrap();
        assert!(bellman_ford.output().unwrap().has_negative_cycle());
    }

    #[test]
    fn test_unreachable_cycle_is_not_reported() {
        let mut graph = GraphStore::<(), ()>::new();
        let n: Vec<_> = (0..3).map(|_| graph.add_node(())).collect();
        graph.add_weighted_edge(n[1], n[2], (), -1.0);
        graph.add_weighted_edge(n[2], n[1], (), -1.0);
        let mut bellman_ford = BellmanFord::new(n[0]);
        bellman_ford.compute(&graph).unwrap();
        let paths = bellman_ford.output().unwrap();
        assert!(!paths.has_negative_cycle());
        assert!(!paths.is_reachable(n[1]));
    }

    #[test]
    fn test_undirected_negative_edge_is_a_cycle() {
        let mut graph = GraphStore::<(), ()>::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_weighted_edge(a, b, (), -1.0);
        let mut bellman_ford =
            BellmanFord::with_config(TraversalConfig::new().root(a).directed(false));
        bellman_ford.compute(&graph).unwrap();
        assert!(bellman_ford.output().unwrap().has_negative_cycle());
    }

    #[quickcheck]
    fn prop_matches_relaxation(ArbGraph { graph }: ArbGraph, undirected: bool) -> bool {
        if graph.is_empty() {
            return true;
        }
        let source = graph.node_at(0);
        let config = TraversalConfig::new().root(source).directed(!undirected);
        let mut bellman_ford = BellmanFord::with_config(config);
        bellman_ford.compute(&graph).unwrap();
        let paths = bellman_ford.output().unwrap();
        paths.distances() == relaxed_distances(&graph, source, !undirected).as_slice()
            && !paths.has_negative_cycle()
    }

    #[quickcheck]
    fn prop_dag_with_negative_weights(ArbDag { graph }: ArbDag) -> bool {
        if graph.is_empty() {
            return true;
        }
        let source = graph.node_at(0);
        let mut bellman_ford = BellmanFord::new(source);
        bellman_ford.compute(&graph).unwrap();
        let paths = bellman_ford.output().unwrap();
        !paths.has_negative_cycle()
            && paths.distances() == relaxed_distances(&graph, source, true).as_slice()
            && graph.node_ids().all(|node| {
                paths.path_to(node).is_none_or(|path| {
                    path.is_valid_in(&graph, true)
                        && path.total_weight(&graph) == paths.distance_to(node)
                })
            })
    }
}
