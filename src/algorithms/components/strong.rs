use bitvec::vec::BitVec;

use super::Components;
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    graph_store::NodeId,
    run_state::RunState,
    topology::{EdgeStep, Topology},
    tracing_support::info_span,
    traversal::{Dfs, DfsMode, TraversalConfig, TraversalVisitor},
};

/// Strongly connected components by Tarjan's algorithm.
///
/// Components come out in the order they close, which is a reverse
/// topological order of the condensation.  With a reversed configuration
/// the components are the same but close in the opposite order.
#[derive(Clone, Debug, Default)]
pub struct StrongComponents {
    config: TraversalConfig,
    mode: DfsMode,
    record: RunRecord<StrongComponentsResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrongComponentsResult {
    components: Components,
    roots: Vec<NodeId>,
}

impl StrongComponentsResult {
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// The node that closed each component; the first node of the component
    /// the search discovered.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        self.components
            .component_of(node)
            .map(|group| self.roots[group])
    }
}

impl StrongComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any depth limit in `config` is ignored.
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

const UNVISITED: usize = usize::MAX;

struct Tarjan {
    dfn: Vec<usize>,
    low: Vec<usize>,
    counter: usize,
    stack: Vec<usize>,
    on_stack: BitVec,
    groups: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            dfn: vec![UNVISITED; n],
            low: vec![UNVISITED; n],
            counter: 0,
            stack: Vec::new(),
            on_stack: BitVec::repeat(false, n),
            groups: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn lower(&mut self, node: usize, value: usize) {
        self.low[node] = self.low[node].min(value);
    }
}

impl TraversalVisitor for Tarjan {
    fn on_discover_node(&mut self, node: usize, _depth: usize) {
        self.dfn[node] = self.counter;
        self.low[node] = self.counter;
        self.counter += 1;
        self.stack.push(node);
        self.on_stack.set(node, true);
    }

    fn on_back_edge(&mut self, step: EdgeStep) {
        self.lower(step.from, self.dfn[step.to]);
    }

    fn on_forward_or_cross_edge(&mut self, step: EdgeStep) {
        if self.on_stack[step.to] {
            self.lower(step.from, self.dfn[step.to]);
        }
    }

    fn on_finish_edge(&mut self, step: EdgeStep) {
        self.lower(step.from, self.low[step.to]);
    }

    fn on_finish_node(&mut self, node: usize, _depth: usize) {
        if self.low[node] != self.dfn[node] {
            return;
        }
        let mut group = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack.set(member, false);
            group.push(member);
            if member == node {
                break;
            }
        }
        group.reverse();
        self.groups.push(group);
        self.roots.push(node);
    }
}

impl GraphAlgorithm for StrongComponents {
    type Output = StrongComponentsResult;

    fn name(&self) -> &'static str {
        "strong_components"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "strong_components",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let mut tarjan = Tarjan::new(topology.num_nodes());
        let state = Dfs::new(self.config.clone().unlimited_depth())
            .mode(self.mode)
            .run(topology, &mut tarjan)?;
        let output = StrongComponentsResult {
            components: Components::from_groups(topology, tarjan.groups),
            roots: tarjan.roots.into_iter().map(|r| topology.node_id(r)).collect(),
        };
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<StrongComponentsResult> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<StrongComponentsResult> {
        &mut self.record
    }
}
