use super::Components;
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    run_state::RunState,
    topology::Topology,
    tracing_support::info_span,
    traversal::{Bfs, TraversalConfig, TraversalVisitor},
};

/// Connected components of the undirected view, one per breadth-first tree.
#[derive(Clone, Debug, Default)]
pub struct ConnectedComponents {
    config: TraversalConfig,
    record: RunRecord<Components>,
}

impl ConnectedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the roots, exclusions and abort flag of `config`.  Edge
    /// direction and any depth limit are ignored.
    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            record: RunRecord::new(),
        }
    }
}

/// Numbers each traversal tree and labels its nodes.
pub(super) struct TreeLabeller {
    pub membership: Vec<Option<usize>>,
    pub trees: usize,
}

impl TreeLabeller {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            membership: vec![None; num_nodes],
            trees: 0,
        }
    }
}

impl TraversalVisitor for TreeLabeller {
    fn on_new_tree(&mut self, _root: usize) {
        self.trees += 1;
    }

    fn on_discover_node(&mut self, node: usize, _depth: usize) {
        self.membership[node] = Some(self.trees - 1);
    }
}

impl GraphAlgorithm for ConnectedComponents {
    type Output = Components;

    fn name(&self) -> &'static str {
        "connected_components"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "connected_components",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let mut labeller = TreeLabeller::new(topology.num_nodes());
        let state = Bfs::new(self.config.clone().directed(false).unlimited_depth())
            .run(topology, &mut labeller)?;
        let output = Components::from_membership(topology, labeller.membership);
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<Components> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<Components> {
        &mut self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{Graph, GraphMut},
        graph_store::GraphStore,
        graph_test_support::{ArbGraph, reachable_from},
    };
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_direction_is_ignored() {
        let mut graph = GraphStore::<&str, ()>::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.add_edge(b, a, ());
        graph.add_edge(c, b, ());
        graph.add_edge(d, d, ());

        let mut cc = ConnectedComponents::new();
        assert_eq!(cc.compute(&graph).unwrap(), RunState::Completed);
        let output = cc.output().unwrap();
        assert_eq!(output.len(), 2);
        assert_eq!(output.groups()[0], vec![a, b, c]);
        assert_eq!(output.groups()[1], vec![d]);
    }

    #[test]
    fn test_excluded_node_splits_component() {
        let mut graph = GraphStore::<&str, ()>::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        graph.add_edge(a, b, ());
        graph.add_edge(b, c, ());
        let mut cc = ConnectedComponents::with_config(TraversalConfig::new().exclude(move |n| n == b));
        cc.compute(&graph).unwrap();
        let output = cc.output().unwrap();
        assert_eq!(output.len(), 2);
        assert_eq!(output.component_of(b), None);
        assert!(!output.same_component(a, c));
    }

    #[quickcheck]
    fn prop_components_match_reachability(ArbGraph { graph }: ArbGraph) -> bool {
        let mut cc = ConnectedComponents::new();
        cc.compute(&graph).unwrap();
        let output = cc.output().unwrap();
        graph.node_ids().all(|a| {
            let reachable = reachable_from(&graph, a, false, None, None);
            graph
                .node_ids()
                .all(|b| output.same_component(a, b) == reachable.contains(&b))
        })
    }
}
