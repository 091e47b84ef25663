use super::Components;
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    collections::UnionFind,
    error::Result,
    run_state::RunState,
    topology::{EdgeStep, Topology},
    tracing_support::info_span,
    traversal::{Dfs, TraversalConfig, TraversalVisitor},
};

/// Weakly connected components, found with directed depth-first search.
///
/// Each depth-first tree starts as its own component.  A cross edge into
/// an earlier tree merges the two trees in a union-find table, and a final
/// pass resolves every node to its merged component.
#[derive(Clone, Debug, Default)]
pub struct WeakComponents {
    config: TraversalConfig,
    record: RunRecord<Components>,
}

impl WeakComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the roots, direction reversal, exclusions and abort flag of
    /// `config`.  Traversal is always directed and never depth limited.
    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            record: RunRecord::new(),
        }
    }
}

struct TreeMerger {
    tree_of: Vec<Option<usize>>,
    trees: usize,
    equivalence: UnionFind,
}

impl TraversalVisitor for TreeMerger {
    fn on_new_tree(&mut self, _root: usize) {
        self.trees += 1;
    }

    fn on_discover_node(&mut self, node: usize, _depth: usize) {
        self.tree_of[node] = Some(self.trees - 1);
    }

    fn on_forward_or_cross_edge(&mut self, step: EdgeStep) {
        if let Some(other) = self.tree_of[step.to] {
            self.equivalence.union(self.trees - 1, other);
        }
    }
}

impl GraphAlgorithm for WeakComponents {
    type Output = Components;

    fn name(&self) -> &'static str {
        "weak_components"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "weak_components",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let n = topology.num_nodes();
        let mut merger = TreeMerger {
            tree_of: vec![None; n],
            trees: 0,
            equivalence: UnionFind::new(n),
        };
        let state = Dfs::new(self.config.clone().directed(true).unlimited_depth())
            .run(topology, &mut merger)?;

        // Renumber merged trees in order of their first tree.
        let mut renumbered = vec![None; merger.trees];
        let mut count = 0;
        for tree in 0..merger.trees {
            let root = merger.equivalence.find(tree);
            if renumbered[root].is_none() {
                renumbered[root] = Some(count);
                count += 1;
            }
        }
        let membership = merger
            .tree_of
            .iter()
            .map(|tree| tree.and_then(|t| renumbered[merger.equivalence.find(t)]))
            .collect();
        let output = Components::from_membership(topology, membership);
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
        algorithms::ConnectedComponents,
        graph::{Graph, GraphMut},
        graph_store::GraphStore,
        graph_test_support::ArbGraph,
    };
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_cross_edges_merge_trees() {
        // Trees rooted at a and b, then c points into both.
        let mut graph = GraphStore::<&str, ()>::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.add_edge(c, a, ());
        graph.add_edge(c, b, ());

        let mut wcc = WeakComponents::new();
        wcc.compute(&graph).unwrap();
        let output = wcc.output().unwrap();
        assert_eq!(output.len(), 2);
        assert_eq!(output.groups()[0], vec![a, b, c]);
        assert_eq!(output.groups()[1], vec![d]);
    }

    #[test]
    fn test_depth_limit_is_ignored() {
        let mut graph = GraphStore::<&str, ()>::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        graph.add_edge(a, b, ());
        graph.add_edge(b, c, ());

        let mut wcc = WeakComponents::with_config(TraversalConfig::new().max_depth(1).unwrap());
        assert_eq!(wcc.compute(&graph).unwrap(), RunState::Completed);
        let output = wcc.output().unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output.groups()[0], vec![a, b, c]);
    }

    #[test]
    fn test_not_computed() {
        let wcc = WeakComponents::new();
        assert_eq!(
            wcc.output().unwrap_err(),
            crate::error::GraphError::NotComputed {
                algorithm: "weak_components"
            }
        );
    }

    #[quickcheck]
    fn prop_weak_components_match_connected_components(ArbGraph { graph }: ArbGraph) -> bool {
        let mut wcc = WeakComponents::new();
        let mut cc = ConnectedComponents::new();
        wcc.compute(&graph).unwrap();
        cc.compute(&graph).unwrap();
        let (weak, connected) = (wcc.output().unwrap(), cc.output().unwrap());
        weak.len() == connected.len()
            && graph.node_ids().all(|a| {
                graph
                    .node_ids()
                    .all(|b| weak.same_component(a, b) == connected.same_component(a, b))
            })
    }
}
