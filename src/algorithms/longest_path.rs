//! Longest simple paths by dynamic programming over a depth-first walk.
//!
//! On a directed acyclic graph `longest[u] = max(0, w(u, v) + longest[v])`
//! is settled for every edge once `v` has finished, which depth-first
//! order guarantees for tree edges on return and for forward and cross
//! edges on sight.  A back edge means a cycle; the walk still completes but
//! the result is then only a lower bound.
//!
//! On the undirected view every node keeps its two heaviest downward
//! branches, so the longest path may bend through a node instead of
//! starting at it.  Here every non-tree edge closes a cycle.

use std::collections::HashMap;

use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    graph_store::NodeId,
    path::Path,
    run_state::RunState,
    topology::{EdgeStep, Topology},
    tracing_support::{debug, info_span},
    traversal::{Dfs, DfsMode, TraversalConfig, TraversalVisitor},
};

#[derive(Clone, Debug, Default)]
pub struct LongestPath {
    config: TraversalConfig,
    mode: DfsMode,
    record: RunRecord<LongestPathResult>,
}

impl LongestPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction comes from `config`: directed finds the longest path along
    /// edges, undirected the longest path of the undirected view.  Any
    /// depth limit is ignored.
    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn mode(mut self, mode: DfsMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LongestPathResult {
    length: f64,
    path: Option<Path>,
    longest_from: Vec<f64>,
    lookup: HashMap<NodeId, usize>,
    has_cycle: bool,
}

impl LongestPathResult {
    /// Total weight of the longest path; 0 for a graph without edges.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The longest path, or `None` if the walk reached no node.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Weight of the longest path starting at `node` and leading away from
    /// it.  In the undirected view this only counts paths that go down the
    /// traversal tree.  `None` for nodes the walk did not reach.
    pub fn longest_from(&self, node: NodeId) -> Option<f64> {
        self.lookup
            .get(&node)
            .and_then(|&i| self.longest_from.get(i).copied())
            .filter(|value| !value.is_nan())
    }

    /// True if the walk found a cycle.  Lengths are unreliable when set.
    pub fn has_cycle(&self) -> bool {
        self.has_cycle
    }
}

/// A downward branch: its weight and the first step into it.
#[derive(Clone, Copy, Debug, Default)]
struct Branch {
    weight: f64,
    step: Option<(usize, usize)>,
}

/// Collects the two best branches below each node.  Directed runs only use
/// the first.
struct Branches {
    directed: bool,
    reached: Vec<bool>,
    best: Vec<Branch>,
    second: Vec<Branch>,
    has_cycle: bool,
}

impl Branches {
    fn new(num_nodes: usize, directed: bool) -> Self {
        Self {
            directed,
            reached: vec![false; num_nodes],
            best: vec![Branch::default(); num_nodes],
            second: vec![Branch::default(); num_nodes],
            has_cycle: false,
        }
    }

    fn relax(&mut self, step: EdgeStep, weight: f64) {
        let (u, v) = (step.from, step.to);
        let branch = Branch {
            weight: weight + self.best[v].weight,
            step: Some((step.edge, v)),
        };
        if branch.weight > self.best[u].weight {
            self.second[u] = self.best[u];
            self.best[u] = branch;
        } else if branch.weight > self.second[u].weight {
            self.second[u] = branch;
        }
    }

    /// The steps of the best branch below `node`.
    fn chain(&self, first: Branch, limit: usize) -> Vec<(usize, usize)> {
        let mut steps = Vec::new();
        let mut next = first.step;
        while let Some((edge, node)) = next {
            if steps.len() >= limit {
                break;
            }
            steps.push((edge, node));
            next = self.best[node].step;
        }
        steps
    }

    fn through(&self, node: usize) -> f64 {
        if self.directed {
            self.best[node].weight
        } else {
            self.best[node].weight + self.second[node].weight
        }
    }
}

/// Feeds every edge whose far end has finished into [`Branches`].
struct Walker<'t> {
    topology: &'t Topology,
    branches: Branches,
}

impl TraversalVisitor for Walker<'_> {
    fn on_discover_node(&mut self, node: usize, _depth: usize) {
        self.branches.reached[node] = true;
    }

    fn on_finish_edge(&mut self, step: EdgeStep) {
        self.branches.relax(step, self.topology.weight(step.edge));
    }

    fn on_forward_or_cross_edge(&mut self, step: EdgeStep) {
        if self.branches.directed {
            self.branches.relax(step, self.topology.weight(step.edge));
        }
    }

    fn on_back_edge(&mut self, _step: EdgeStep) {
        self.branches.has_cycle = true;
    }
}

fn assemble(topology: &Topology, branches: &Branches) -> (f64, Option<Path>) {
    let n = topology.num_nodes();
    let Some(start) = (0..n)
        .filter(|&i| branches.reached[i])
        .reduce(|a, b| if branches.through(b) > branches.through(a) { b } else { a })
    else {
        return (0.0, None);
    };

    let lower = if branches.directed {
        Vec::new()
    } else {
        branches.chain(branches.second[start], n)
    };
    let upper = branches.chain(branches.best[start], n);

    // Walk the second branch backwards up to `start`, then the best branch
    // down.
    let first = lower.last().map_or(start, |&(_, node)| node);
    let mut path = Path::new(topology.node_id(first));
    for k in (0..lower.len()).rev() {
        let node = if k == 0 { start } else { lower[k - 1].1 };
        path.add_edge_and_node(topology.edge_id(lower[k].0), topology.node_id(node));
    }
    for &(edge, node) in &upper {
        path.add_edge_and_node(topology.edge_id(edge), topology.node_id(node));
    }
    (branches.through(start), Some(path))
}

impl GraphAlgorithm for LongestPath {
    type Output = LongestPathResult;

    fn name(&self) -> &'static str {
        "longest_path"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "longest_path",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let directed = self.config.is_directed();
        let mut walker = Walker {
            topology,
            branches: Branches::new(topology.num_nodes(), directed),
        };
        let state = Dfs::new(self.config.clone().unlimited_depth())
            .mode(self.mode)
            .run(topology, &mut walker)?;
        let branches = walker.branches;
        if branches.has_cycle {
            debug!("longest_path walked into a cycle");
        }
        let (length, path) = assemble(topology, &branches);
        let longest_from = (0..topology.num_nodes())
            .map(|i| {
                if branches.reached[i] {
                    branches.best[i].weight
                } else {
                    f64::NAN
                }
            })
            .collect();
        let lookup = (0..topology.num_nodes())
            .map(|i| (topology.node_id(i), i))
            .collect();
        let output = LongestPathResult {
            length,
            path,
            longest_from,
            lookup,
            has_cycle: branches.has_cycle,
        };
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<LongestPathResult> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<LongestPathResult> {
        &mut self.record
    }
}
