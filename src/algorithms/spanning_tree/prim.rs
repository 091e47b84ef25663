use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use bitvec::vec::BitVec;

use super::SpanningTree;
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    run_state::RunState,
    topology::{Incidence, Topology},
    tracing_support::{debug, info_span},
    traversal::TraversalConfig,
};

const BOTH_WAYS: &[Incidence] = &[Incidence::Out, Incidence::In];

/// Minimum spanning forest by Prim's algorithm, growing one tree at a time
/// from the lowest-indexed node not yet covered.
#[derive(Clone, Debug, Default)]
pub struct Prim {
    config: TraversalConfig,
    record: RunRecord<SpanningTree>,
}

impl Prim {
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

/// An edge on the frontier of the growing tree.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    weight: f64,
    edge: usize,
    to: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then(self.edge.cmp(&other.edge))
    }
}

impl GraphAlgorithm for Prim {
    type Output = SpanningTree;

    fn name(&self) -> &'static str {
        "prim"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "prim",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let plan = self.config.plan(topology)?;
        let n = topology.num_nodes();
        let mut in_tree: BitVec = BitVec::repeat(false, n);
        let mut frontier = BinaryHeap::new();
        let mut chosen = Vec::new();
        let mut roots = Vec::new();
        let mut state = RunState::Completed;

        // Returns false when the run was aborted partway through the scan.
        let grow = |node: usize, in_tree: &mut BitVec, frontier: &mut BinaryHeap<Reverse<Candidate>>| {
            in_tree.set(node, true);
            for step in topology.steps(node, BOTH_WAYS) {
                if plan.is_aborted() {
                    return false;
                }
                if !in_tree[step.to] && !plan.is_excluded(step.to) {
                    frontier.push(Reverse(Candidate {
                        weight: topology.weight(step.edge),
                        edge: step.edge,
                        to: step.to,
                    }));
                }
            }
            true
        };

        'trees: for start in 0..n {
            if in_tree[start] || plan.is_excluded(start) {
                continue;
            }
            roots.push(start);
            let mut grown = grow(start, &mut in_tree, &mut frontier);
            while grown {
                let Some(Reverse(candidate)) = frontier.pop() else {
                    continue 'trees;
                };
                if plan.is_aborted() {
                    break;
                }
                if in_tree[candidate.to] {
                    continue;
                }
                chosen.push(candidate.edge);
                grown = grow(candidate.to, &mut in_tree, &mut frontier);
            }
            debug!(chosen = chosen.len(), "prim aborted");
            state = RunState::Aborted;
            break;
        }
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
