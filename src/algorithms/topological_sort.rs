use std::collections::HashMap;

use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    graph_store::NodeId,
    run_state::RunState,
    topology::{EdgeStep, Topology},
    tracing_support::{debug, info_span},
    traversal::{Dfs, DfsMode, TraversalConfig, TraversalVisitor},
};

/// Topological order as reverse depth-first finishing order.
///
/// Edges are always followed in their stored direction, or against it when
/// the configuration is reversed.  A graph with a cycle still gets an
/// order, but [`TopologicalOrder::is_acyclic`] is false and some edge runs
/// backwards in it.
#[derive(Clone, Debug, Default)]
pub struct TopologicalSort {
    config: TraversalConfig,
    mode: DfsMode,
    record: RunRecord<TopologicalOrder>,
}

impl TopologicalSort {
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

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologicalOrder {
    order: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    is_acyclic: bool,
}

impl TopologicalOrder {
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn is_acyclic(&self) -> bool {
        self.is_acyclic
    }

    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.positions.get(&node).copied()
    }
}

#[derive(Default)]
struct FinishOrder {
    finished: Vec<usize>,
    back_edges: usize,
}

impl TraversalVisitor for FinishOrder {
    fn on_finish_node(&mut self, node: usize, _depth: usize) {
        self.finished.push(node);
    }

    fn on_back_edge(&mut self, _step: EdgeStep) {
        self.back_edges += 1;
    }
}

impl GraphAlgorithm for TopologicalSort {
    type Output = TopologicalOrder;

    fn name(&self) -> &'static str {
        "topological_sort"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "topological_sort",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let mut visitor = FinishOrder::default();
        let state = Dfs::new(self.config.clone().directed(true).unlimited_depth())
            .mode(self.mode)
            .run(topology, &mut visitor)?;
        if visitor.back_edges > 0 {
            debug!(back_edges = visitor.back_edges, "topological_sort found cycles");
        }
        let order: Vec<NodeId> = visitor
            .finished
            .iter()
            .rev()
            .map(|&i| topology.node_id(i))
            .collect();
        let positions = order.iter().enumerate().map(|(i, &nid)| (nid, i)).collect();
        let output = TopologicalOrder {
            order,
            positions,
            is_acyclic: visitor.back_edges == 0,
        };
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<TopologicalOrder> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<TopologicalOrder> {
        &mut self.record
    }
}
