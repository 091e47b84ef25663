use super::{SpanningTree, candidate_edges, compare_edges, forest_roots};
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    collections::UnionFind,
    error::Result,
    run_state::RunState,
    topology::Topology,
    tracing_support::{debug, info_span},
    traversal::TraversalConfig,
};

/// Minimum spanning forest by Kruskal's algorithm: edges in ascending
/// `(weight, index)` order join the forest unless both ends are already
/// connected.
#[derive(Clone, Debug, Default)]
pub struct Kruskal {
    config: TraversalConfig,
    record: RunRecord<SpanningTree>,
}

impl Kruskal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the exclusions and abort flag of `config` are used.
    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            record: RunRecord::new(),
        }
    }
}

impl GraphAlgorithm for Kruskal {
    type Output = SpanningTree;

    fn name(&self) -> &'static str {
        "kruskal"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "kruskal",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let plan = self.config.plan(topology)?;
        let mut candidates = candidate_edges(topology, &plan);
        candidates.sort_by(|&a, &b| compare_edges(topology, a, b));

        let mut sets = UnionFind::new(topology.num_nodes());
        let mut chosen = Vec::new();
        let mut state = RunState::Completed;
        for edge in candidates {
            if plan.is_aborted() {
                debug!(chosen = chosen.len(), "kruskal aborted");
                state = RunState::Aborted;
                break;
            }
            if sets.union(topology.source(edge), topology.target(edge)) {
                chosen.push(edge);
            }
        }
        let roots = forest_roots(topology, &plan, &mut sets);
        let output = SpanningTree::from_indices(topology, &chosen, &roots);
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<SpanningTree> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<SpanningTree> {
        &mut self.record
    }
}
