//! The traversal engines every algorithm is built on.
//!
//! An engine walks a [`Topology`] and reports what it sees as a stream of
//! [`TraversalEvent`]s, either pulled from an iterator ([`DfsEvents`],
//! [`BfsEvents`]) or pushed into a [`TraversalVisitor`].  All colors and
//! cursors live in the engine; neither the graph nor the topology is
//! written.

use std::sync::Arc;

use bitvec::vec::BitVec;
use derivative::Derivative;

use crate::{
    error::{GraphError, Result},
    graph_store::NodeId,
    run_state::AbortFlag,
    topology::{EdgeStep, Incidence, Topology},
};

mod best_first;
mod bfs;
mod dfs;

pub use best_first::{BestFirst, BestFirstOutcome};
pub use bfs::{Bfs, BfsEvents};
pub use dfs::{Dfs, DfsEvents, DfsMode, IMPLICIT_RECURSION_LIMIT};

/// Progress marker for nodes and edges during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    /// Not reached yet.
    #[default]
    White,
    /// Reached but not finished.
    Gray,
    /// Finished.
    Black,
}

/// Classification of an edge by the color of its far end when first
/// examined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Tree,
    Back,
    ForwardOrCross,
}

/// One step of a traversal.  Node indices refer to the run's [`Topology`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraversalEvent {
    NewTree { root: usize },
    Discover { node: usize, depth: usize },
    Finish { node: usize, depth: usize },
    Edge { step: EdgeStep, kind: EdgeKind },
    /// The walk has returned across a tree edge, after the child's finish.
    FinishEdge { step: EdgeStep },
}

impl TraversalEvent {
    /// Calls the visitor method matching this event.
    pub fn dispatch<V: TraversalVisitor + ?Sized>(self, visitor: &mut V) {
        match self {
            TraversalEvent::NewTree { root } => visitor.on_new_tree(root),
            TraversalEvent::Discover { node, depth } => visitor.on_discover_node(node, depth),
            TraversalEvent::Finish { node, depth } => visitor.on_finish_node(node, depth),
            TraversalEvent::Edge { step, kind } => match kind {
                EdgeKind::Tree => visitor.on_tree_edge(step),
                EdgeKind::Back => visitor.on_back_edge(step),
                EdgeKind::ForwardOrCross => visitor.on_forward_or_cross_edge(step),
            },
            TraversalEvent::FinishEdge { step } => visitor.on_finish_edge(step),
        }
    }
}

/// Receives traversal events.  Every method does nothing by default, so an
/// algorithm overrides only the events it cares about.
pub trait TraversalVisitor {
    fn on_new_tree(&mut self, _root: usize) {}
    fn on_discover_node(&mut self, _node: usize, _depth: usize) {}
    fn on_finish_node(&mut self, _node: usize, _depth: usize) {}
    fn on_tree_edge(&mut self, _step: EdgeStep) {}
    fn on_back_edge(&mut self, _step: EdgeStep) {}
    fn on_forward_or_cross_edge(&mut self, _step: EdgeStep) {}
    fn on_finish_edge(&mut self, _step: EdgeStep) {}
}

impl TraversalVisitor for () {}

/// Records every event it receives, in order.
impl TraversalVisitor for Vec<TraversalEvent> {
    fn on_new_tree(&mut self, root: usize) {
        self.push(TraversalEvent::NewTree { root });
    }
    fn on_discover_node(&mut self, node: usize, depth: usize) {
        self.push(TraversalEvent::Discover { node, depth });
    }
    fn on_finish_node(&mut self, node: usize, depth: usize) {
        self.push(TraversalEvent::Finish { node, depth });
    }
    fn on_tree_edge(&mut self, step: EdgeStep) {
        self.push(TraversalEvent::Edge {
            step,
            kind: EdgeKind::Tree,
        });
    }
    fn on_back_edge(&mut self, step: EdgeStep) {
        self.push(TraversalEvent::Edge {
            step,
            kind: EdgeKind::Back,
        });
    }
    fn on_forward_or_cross_edge(&mut self, step: EdgeStep) {
        self.push(TraversalEvent::Edge {
            step,
            kind: EdgeKind::ForwardOrCross,
        });
    }
    fn on_finish_edge(&mut self, step: EdgeStep) {
        self.push(TraversalEvent::FinishEdge { step });
    }
}

pub type NodePredicate = Arc<dyn Fn(NodeId) -> bool + Send + Sync>;

/// Settings shared by all traversal engines.
///
/// ```
/// use graphwalk::prelude::*;
///
/// let mut graph = GraphStore::<(), ()>::new();
/// let a = graph.add_node(());
/// let config = TraversalConfig::new()
///     .directed(false)
///     .root(a)
///     .roots_only(true)
///     .max_depth(3)
///     .unwrap();
/// assert!(!config.is_directed());
/// assert!(TraversalConfig::new().max_depth(0).is_err());
/// ```
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct TraversalConfig {
    directed: bool,
    reversed: bool,
    roots: Vec<NodeId>,
    roots_only: bool,
    max_depth: Option<usize>,
    #[derivative(Debug = "ignore")]
    exclude: Option<NodePredicate>,
    abort: AbortFlag,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            directed: true,
            reversed: false,
            roots: Vec::new(),
            roots_only: false,
            max_depth: None,
            exclude: None,
            abort: AbortFlag::new(),
        }
    }
}

const FORWARD: &[Incidence] = &[Incidence::Out];
const BACKWARD: &[Incidence] = &[Incidence::In];
const BOTH: &[Incidence] = &[Incidence::Out, Incidence::In];
const BOTH_REVERSED: &[Incidence] = &[Incidence::In, Incidence::Out];

impl TraversalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow edges only along their stored direction (default), or both
    /// ways.
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Follow edges against their stored direction.
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Adds a designated root.  Roots are tried in the order given.
    pub fn root(mut self, root: NodeId) -> Self {
        self.roots.push(root);
        self
    }

    pub fn roots(mut self, roots: impl IntoIterator<Item = NodeId>) -> Self {
        self.roots.extend(roots);
        self
    }

    /// Replaces the designated roots.
    pub fn set_roots(mut self, roots: impl IntoIterator<Item = NodeId>) -> Self {
        self.roots = roots.into_iter().collect();
        self
    }

    /// Stop after the designated roots instead of restarting from every
    /// node not yet reached.
    pub fn roots_only(mut self, roots_only: bool) -> Self {
        self.roots_only = roots_only;
        self
    }

    /// Nodes at depth `max_depth` are discovered and finished but their
    /// edges are not examined.
    pub fn max_depth(mut self, max_depth: usize) -> Result<Self> {
        if max_depth == 0 {
            return Err(GraphError::InvalidConfiguration(
                "max_depth must be at least 1",
            ));
        }
        self.max_depth = Some(max_depth);
        Ok(self)
    }

    /// Drops any depth limit set with [`max_depth`](Self::max_depth).
    pub fn unlimited_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Hides every node the predicate accepts, along with its incident
    /// edges.
    pub fn exclude(mut self, predicate: impl Fn(NodeId) -> bool + Send + Sync + 'static) -> Self {
        self.exclude = Some(Arc::new(predicate));
        self
    }

    pub fn abort_flag(mut self, abort: AbortFlag) -> Self {
        self.abort = abort;
        self
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn designated_roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_roots_only(&self) -> bool {
        self.roots_only
    }

    pub fn depth_limit(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn abort(&self) -> &AbortFlag {
        &self.abort
    }

    pub fn is_excluded(&self, node: NodeId) -> bool {
        self.exclude.as_ref().is_some_and(|predicate| predicate(node))
    }

    /// Incidence lists scanned from each node, in order.
    pub fn scan_order(&self) -> &'static [Incidence] {
        match (self.directed, self.reversed) {
            (true, false) => FORWARD,
            (true, true) => BACKWARD,
            (false, false) => BOTH,
            (false, true) => BOTH_REVERSED,
        }
    }

    /// Resolves the configuration against one topology.
    pub(crate) fn plan(&self, topology: &Topology) -> Result<Plan> {
        let excluded = match &self.exclude {
            Some(predicate) => topology.mark_nodes(|nid| predicate(nid)),
            None => BitVec::repeat(false, topology.num_nodes()),
        };
        let mut roots = Vec::with_capacity(self.roots.len());
        for &root in &self.roots {
            let index = topology
                .index_of(root)
                .ok_or(GraphError::UnknownNode(root))?;
            if !excluded[index] {
                roots.push(index);
            }
        }
        Ok(Plan {
            order: self.scan_order(),
            roots,
            roots_only: self.roots_only,
            max_depth: self.max_depth,
            excluded,
            abort: self.abort.clone(),
        })
    }
}

/// A configuration resolved to dense indices.
#[derive(Clone, Debug)]
pub(crate) struct Plan {
    pub order: &'static [Incidence],
    pub roots: Vec<usize>,
    pub roots_only: bool,
    pub max_depth: Option<usize>,
    pub excluded: BitVec,
    pub abort: AbortFlag,
}

impl Plan {
    /// Whether a node at `depth` gets its edges examined.
    pub fn scans_at(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|limit| depth < limit)
    }

    pub fn is_excluded(&self, node: usize) -> bool {
        self.excluded[node]
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }

    pub fn root_cursor(&self) -> RootCursor {
        RootCursor {
            next_designated: 0,
            next_scan: 0,
        }
    }
}

/// Picks the root of each new tree: designated roots first, then every
/// remaining White node in index order.
#[derive(Clone, Debug)]
pub(crate) struct RootCursor {
    next_designated: usize,
    next_scan: usize,
}

impl RootCursor {
    pub fn next_root(&mut self, plan: &Plan, node_colors: &[Color]) -> Option<usize> {
        while let Some(&root) = plan.roots.get(self.next_designated) {
            self.next_designated += 1;
            if node_colors[root] == Color::White {
                return Some(root);
            }
        }
        if plan.roots_only {
            return None;
        }
        while self.next_scan < node_colors.len() {
            let node = self.next_scan;
            self.next_scan += 1;
            if node_colors[node] == Color::White && !plan.excluded[node] {
                return Some(node);
            }
        }
        None
    }
}

/// Position of a traversal within one node's incidence lists.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScanCursor {
    phase: usize,
    cursor: usize,
}

impl ScanCursor {
    pub fn new() -> Self {
        Self {
            phase: 0,
            cursor: 0,
        }
    }

    /// The next edge step from `node`, or `None` once every list in `order`
    /// is exhausted.
    pub fn advance(
        &mut self,
        topology: &Topology,
        node: usize,
        order: &[Incidence],
    ) -> Option<EdgeStep> {
        while let Some(&incidence) = order.get(self.phase) {
            if let Some(step) = topology.step(node, incidence, self.cursor) {
                self.cursor += 1;
                return Some(step);
            }
            self.phase += 1;
            self.cursor = 0;
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::graph::GraphMut;
    use crate::graph_store::GraphStore;

    pub type Store = GraphStore<&'static str, ()>;

    /// Builds a store with one node per name and the given edges between
    /// name indices.
    pub fn build(names: &[&'static str], edges: &[(usize, usize)]) -> (Store, Vec<NodeId>) {
        let mut graph = Store::new();
        let nodes: Vec<_> = names.iter().map(|&n| graph.add_node(n)).collect();
        for &(a, b) in edges {
            graph.add_edge(nodes[a], nodes[b], ());
        }
        (graph, nodes)
    }

    /// Event stream with edges reduced to `(from, to, kind)` for readable
    /// assertions.
    pub fn summarize(events: &[TraversalEvent]) -> Vec<String> {
        events
            .iter()
            .map(|event| match *event {
                TraversalEvent::NewTree { root } => format!("tree {root}"),
                TraversalEvent::Discover { node, depth } => format!("discover {node}@{depth}"),
                TraversalEvent::Finish { node, .. } => format!("finish {node}"),
                TraversalEvent::Edge { step, kind } => {
                    format!("{kind:?} {}->{}", step.from, step.to)
                }
                TraversalEvent::FinishEdge { step } => {
                    format!("return {}->{}", step.to, step.from)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::build;
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_scan_order() {
        let config = TraversalConfig::new();
        assert_eq!(config.scan_order(), &[Incidence::Out]);
        assert_eq!(config.clone().reversed(true).scan_order(), &[Incidence::In]);
        assert_eq!(
            config.clone().directed(false).scan_order(),
            &[Incidence::Out, Incidence::In]
        );
        assert_eq!(
            config.directed(false).reversed(true).scan_order(),
            &[Incidence::In, Incidence::Out]
        );
    }

    #[test]
    fn test_zero_max_depth_is_rejected() {
        assert_eq!(
            TraversalConfig::new().max_depth(0).unwrap_err(),
            GraphError::InvalidConfiguration("max_depth must be at least 1")
        );
    }

    #[test]
    fn test_unlimited_depth_clears_the_limit() {
        let config = TraversalConfig::new().max_depth(2).unwrap();
        assert_eq!(config.depth_limit(), Some(2));
        assert_eq!(config.unlimited_depth().depth_limit(), None);
    }

    #[test]
    fn test_plan_rejects_unknown_root() {
        let (graph, _) = build(&["a", "b"], &[]);
        let (other, _) = build(&["x", "y", "z"], &[]);
        let foreign = other.node_ids().last().unwrap();
        let topology = Topology::new(&graph);
        let err = TraversalConfig::new()
            .root(foreign)
            .plan(&topology)
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(foreign));
    }

    #[test]
    fn test_plan_skips_excluded_roots() {
        let (graph, nodes) = build(&["a", "b", "c"], &[]);
        let topology = Topology::new(&graph);
        let hidden = nodes[1];
        let plan = TraversalConfig::new()
            .roots([nodes[1], nodes[2]])
            .exclude(move |nid| nid == hidden)
            .plan(&topology)
            .unwrap();
        assert_eq!(plan.roots, vec![2]);
        assert!(plan.is_excluded(1));
    }

    #[test]
    fn test_root_cursor_prefers_designated_roots() {
        let (graph, nodes) = build(&["a", "b", "c"], &[]);
        let topology = Topology::new(&graph);
        let plan = TraversalConfig::new().root(nodes[2]).plan(&topology).unwrap();
        let mut colors = vec![Color::White; 3];
        let mut cursor = plan.root_cursor();
        assert_eq!(cursor.next_root(&plan, &colors), Some(2));
        colors[2] = Color::Black;
        assert_eq!(cursor.next_root(&plan, &colors), Some(0));
        colors[0] = Color::Black;
        assert_eq!(cursor.next_root(&plan, &colors), Some(1));
        colors[1] = Color::Black;
        assert_eq!(cursor.next_root(&plan, &colors), None);
    }

    #[test]
    fn test_debug_omits_predicate() {
        let config = TraversalConfig::new().exclude(|_| false);
        let text = format!("{config:?}");
        assert!(text.contains("directed: true"));
        assert!(!text.contains("exclude"));
    }
}
