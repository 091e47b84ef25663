use super::ShortestPaths;
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    graph_store::NodeId,
    path::Path,
    run_state::RunState,
    topology::Topology,
    tracing_support::{debug, info_span},
    traversal::{BestFirst, TraversalConfig},
};

/// Cheapest path between two nodes, guided by a heuristic estimate of the
/// remaining cost.
///
/// Without a heuristic this is uniform-cost search.  A node whose cost
/// improves after it was settled is expanded again, so an inadmissible
/// heuristic only costs extra work.  The output holds whatever the search
/// settled before reaching the target.
#[derive(Clone, Debug)]
pub struct AStar {
    search: BestFirst,
    target: NodeId,
    record: RunRecord<ShortestPaths>,
}

impl AStar {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self::with_config(TraversalConfig::new().root(source), target)
    }

    /// Searches from the designated roots of `config`.
    pub fn with_config(config: TraversalConfig, target: NodeId) -> Self {
        Self {
            search: BestFirst::new(config.roots_only(true)).target(target),
            target,
            record: RunRecord::new(),
        }
    }

    pub fn heuristic(mut self, heuristic: impl Fn(NodeId) -> f64 + Send + Sync + 'static) -> Self {
        self.search = self.search.heuristic(heuristic);
        self
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The path found by the last run, if it reached the target.
    pub fn path(&self) -> Result<Option<Path>> {
        Ok(self.output()?.path_to(self.target))
    }
}

impl GraphAlgorithm for AStar {
    type Output = ShortestPaths;

    fn name(&self) -> &'static str {
        "astar"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "astar",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let outcome = self.search.run(topology, &mut ())?;
        if !outcome.target_reached {
            debug!(state = ?outcome.state, "astar did not reach its target");
        }
        let sources = self.search.config().plan(topology)?.roots;
        let output = ShortestPaths::from_indices(
            topology,
            &sources,
            outcome.distances,
            &outcome.predecessor_edges,
            &outcome.predecessor_nodes,
            outcome.negative_cycle,
        );
        Ok(self.record.finish(topology, outcome.state, output))
    }

    fn record(&self) -> &RunRecord<ShortestPaths> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<ShortestPaths> {
        &mut self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithms::shortest_path::Dijkstra,
        graph::{Graph, GraphMut},
        graph_store::GraphStore,
        graph_test_support::ArbGraph,
        run_state::AbortFlag,
    };
    use quickcheck_macros::quickcheck;

    /// A 5x5 grid with unit weights in both directions.
    fn grid() -> (GraphStore<(i32, i32), ()>, Vec<NodeId>) {
        let mut graph = GraphStore::new();
        let mut nodes = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                nodes.push(graph.add_node((x, y)));
            }
        }
        for y in 0..5 {
            for x in 0..5 {
                let here = nodes[y * 5 + x];
                if x + 1 < 5 {
                    graph.add_edge(here, nodes[y * 5 + x + 1], ());
                    graph.add_edge(nodes[y * 5 + x + 1], here, ());
                }
                if y + 1 < 5 {
                    graph.add_edge(here, nodes[(y + 1) * 5 + x], ());
                    graph.add_edge(nodes[(y + 1) * 5 + x], here, ());
                }
            }
        }
        (graph, nodes)
    }

    #[test]
    fn test_manhattan_heuristic() {
        let (graph, nodes) = grid();
        let coords: Vec<_> = nodes.iter().map(|&n| *graph.node_data(n)).collect();
        let lookup: std::collections::HashMap<_, _> =
            nodes.iter().copied().zip(coords.iter().copied()).collect();
        let mut astar = AStar::new(nodes[0], nodes[24]).heuristic(move |n| {
            let (x, y) = lookup[&n];
            f64::from((4 - x) + (4 - y))
        });
        assert_eq!(astar.compute(&graph).unwrap(), RunState::Completed);
        let path = astar.path().unwrap().unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path.first_node(), nodes[0]);
        assert_eq!(path.last_node(), nodes[24]);
        assert!(path.is_valid_in(&graph, true));
    }

    #[test]
    fn test_unreachable_target() {
        let mut graph = GraphStore::<(), ()>::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let mut astar = AStar::new(a, b);
        astar.compute(&graph).unwrap();
        assert_eq!(astar.path().unwrap(), None);
    }

    #[test]
    fn test_path_before_compute() {
        let mut graph = GraphStore::<(), ()>::new();
        let a = graph.add_node(());
        assert!(AStar::new(a, a).path().is_err());
    }

    #[test]
    fn test_abort() {
        let (graph, nodes) = grid();
        let abort = AbortFlag::new();
        abort.abort();
        let mut astar =
            AStar::with_config(TraversalConfig::new().root(nodes[0]).abort_flag(abort), nodes[24]);
        assert_eq!(astar.compute(&graph).unwrap(), RunState::Aborted);
    }

    #[quickcheck]
    fn prop_agrees_with_dijkstra(ArbGraph { graph }: ArbGraph) -> bool {
        if graph.is_empty() {
            return true;
        }
        let source = graph.node_at(0);
        let mut dijkstra = Dijkstra::new(source);
        dijkstra.compute(&graph).unwrap();
        let expected = dijkstra.output().unwrap();
        graph.node_ids().all(|target| {
            let mut astar = AStar::new(source, target);
            astar.compute(&graph).unwrap();
            astar.output().unwrap().distance_to(target) == expected.distance_to(target)
        })
    }
}
