use super::SpanningTree;
use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    run_state::RunState,
    topology::{EdgeStep, Topology},
    tracing_support::info_span,
    traversal::{Bfs, Dfs, TraversalConfig, TraversalVisitor},
};

/// Which engine a [`TraversalSpanningTree`] walks with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpanningTreeKind {
    #[default]
    BreadthFirst,
    DepthFirst,
}

/// The tree edges of a traversal from the configured roots.  Unless the
/// configuration is roots-only the result is a forest covering every node
/// that is not excluded.
#[derive(Clone, Debug, Default)]
pub struct TraversalSpanningTree {
    config: TraversalConfig,
    kind: SpanningTreeKind,
    record: RunRecord<SpanningTree>,
}

impl TraversalSpanningTree {
    pub fn new(kind: SpanningTreeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_config(config: TraversalConfig, kind: SpanningTreeKind) -> Self {
        Self {
            config,
            kind,
            record: RunRecord::new(),
        }
    }

    pub fn kind(&self) -> SpanningTreeKind {
        self.kind
    }
}

#[derive(Default)]
struct TreeEdges {
    edges: Vec<usize>,
    roots: Vec<usize>,
}

impl TraversalVisitor for TreeEdges {
    fn on_new_tree(&mut self, root: usize) {
        self.roots.push(root);
    }

    fn on_tree_edge(&mut self, step: EdgeStep) {
        self.edges.push(step.edge);
    }
}

impl GraphAlgorithm for TraversalSpanningTree {
    type Output = SpanningTree;

    fn name(&self) -> &'static str {
        "traversal_spanning_tree"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "traversal_spanning_tree",
            kind = ?self.kind,
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let mut tree = TreeEdges::default();
        let state = match self.kind {
            SpanningTreeKind::BreadthFirst => Bfs::new(self.config.clone()).run(topology, &mut tree)?,
            SpanningTreeKind::DepthFirst => Dfs::new(self.config.clone()).run(topology, &mut tree)?,
        };
        let output = SpanningTree::from_indices(topology, &tree.edges, &tree.roots);
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<SpanningTree> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<SpanningTree> {
        &mut self.record
    }
}
