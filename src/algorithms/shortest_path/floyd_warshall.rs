use super::{AllPairsShortestPaths, UNREACHABLE, arcs};
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    run_state::RunState,
    topology::Topology,
    tracing_support::{debug, info_span},
    traversal::TraversalConfig,
};

/// All-pairs shortest paths by Floyd-Warshall.  Cubic in the number of
/// nodes.
///
/// Roots and the depth limit of the configuration are not used.  A negative
/// diagonal entry sets [`AllPairsShortestPaths::has_negative_cycle`].
#[derive(Clone, Debug, Default)]
pub struct FloydWarshall {
    config: TraversalConfig,
    record: RunRecord<AllPairsShortestPaths>,
}

impl FloydWarshall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            record: RunRecord::new(),
        }
    }
}

impl GraphAlgorithm for FloydWarshall {
    type Output = AllPairsShortestPaths;

    fn name(&self) -> &'static str {
        "floyd_warshall"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "floyd_warshall",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let plan = self.config.plan(topology)?;
        let n = topology.num_nodes();
        let mut dist = vec![vec![UNREACHABLE; n]; n];
        let mut via: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
        let mut direct: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
        for (i, row) in dist.iter_mut().enumerate() {
            if !plan.is_excluded(i) {
                row[i] = 0.0;
            }
        }
        for edge in 0..topology.num_edges() {
            let weight = topology.weight(edge);
            for (from, to) in arcs(topology, plan.order, edge) {
                if plan.is_excluded(from) || plan.is_excluded(to) {
                    continue;
                }
                if weight < dist[from][to] {
                    dist[from][to] = weight;
                    direct[from][to] = Some(edge);
                }
            }
        }

        let mut state = RunState::Completed;
        for k in 0..n {
            if plan.is_aborted() {
                debug!(nodes = n, k, "floyd_warshall aborted");
                state = RunState::Aborted;
                break;
            }
            for i in 0..n {
                let through = dist[i][k];
                if through == UNREACHABLE {
                    continue;
                }
                for j in 0..n {
                    let onward = dist[k][j];
                    if onward != UNREACHABLE && through + onward < dist[i][j] {
                        dist[i][j] = through + onward;
                        via[i][j] = Some(k);
                    }
                }
            }
        }

        let has_negative_cycle = (0..n).any(|i| dist[i][i] < 0.0);
        if has_negative_cycle {
            debug!("floyd_warshall found a negative cycle");
        }
        let output =
            AllPairsShortestPaths::from_intermediates(topology, dist, via, direct, has_negative_cycle);
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<AllPairsShortestPaths> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<AllPairsShortestPaths> {
        &mut self.record
    }
}
