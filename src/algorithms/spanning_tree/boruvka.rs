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

/// Minimum spanning forest by Borůvka's algorithm.  Each round every
/// component picks its cheapest outgoing edge and all picks are merged at
/// once; at most `log2(n)` rounds are needed.
#[derive(Clone, Debug, Default)]
pub struct Boruvka {
    config: TraversalConfig,
    record: RunRecord<SpanningTree>,
}

impl Boruvka {
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

impl GraphAlgorithm for Boruvka {
    type Output = SpanningTree;

    fn name(&self) -> &'static str {
        "boruvka"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "boruvka",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let plan = self.config.plan(topology)?;
        let candidates = candidate_edges(topology, &plan);
        let n = topology.num_nodes();
        let mut sets = UnionFind::new(n);
        let mut chosen = Vec::new();
        let mut state = RunState::Completed;
        let mut rounds = 0;
        loop {
            if plan.is_aborted() {
                debug!(rounds, "boruvka aborted");
                state = RunState::Aborted;
                break;
            }
            let mut cheapest: Vec<Option<usize>> = vec![None; n];
            for &edge in &candidates {
                let a = sets.find(topology.source(edge));
                let b = sets.find(topology.target(edge));
                if a == b {
                    continue;
                }
                for set in [a, b] {
                    let better = cheapest[set]
                        .is_none_or(|best| compare_edges(topology, edge, best).is_lt());
                    if better {
                        cheapest[set] = Some(edge);
                    }
                }
            }
            let picks: Vec<usize> = cheapest.into_iter().flatten().collect();
            if picks.is_empty() {
                break;
            }
            for edge in picks {
                // Two components may pick the same edge.
                if sets.union(topology.source(edge), topology.target(edge)) {
                    chosen.push(edge);
                }
            }
            rounds += 1;
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
