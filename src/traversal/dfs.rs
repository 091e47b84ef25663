use super::{
    Color, EdgeKind, Plan, RootCursor, ScanCursor, TraversalConfig, TraversalEvent,
    TraversalVisitor,
};
use crate::{
    error::{GraphError, Result},
    run_state::RunState,
    topology::{EdgeStep, Topology},
    tracing_support::debug,
};

/// Largest graph, in nodes, that [`DfsMode::Implicit`] will walk.  Each
/// level of the walk is one native stack frame.
pub const IMPLICIT_RECURSION_LIMIT: usize = 4096;

/// How depth-first search keeps track of where it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DfsMode {
    /// A heap-allocated frame stack; works at any depth.
    #[default]
    Explicit,
    /// Native recursion; refuses graphs above [`IMPLICIT_RECURSION_LIMIT`].
    Implicit,
}

/// Depth-first search.  Both modes produce the same event sequence.
#[derive(Clone, Debug, Default)]
pub struct Dfs {
    config: TraversalConfig,
    mode: DfsMode,
}

impl Dfs {
    pub fn new(config: TraversalConfig) -> Self {
        Self {
            config,
            mode: DfsMode::default(),
        }
    }

    pub fn mode(mut self, mode: DfsMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Starts an explicit-stack walk that yields events on demand.
    pub fn events<'t>(&self, topology: &'t Topology) -> Result<DfsEvents<'t>> {
        Ok(DfsEvents::new(topology, self.config.plan(topology)?))
    }

    /// Walks the whole forest, feeding every event to `visitor`.
    pub fn run<V>(&self, topology: &Topology, visitor: &mut V) -> Result<RunState>
    where
        V: TraversalVisitor + ?Sized,
    {
        let plan = self.config.plan(topology)?;
        let completed = match self.mode {
            DfsMode::Explicit => {
                let mut events = DfsEvents::new(topology, plan);
                for event in events.by_ref() {
                    event.dispatch(visitor);
                }
                !events.was_aborted()
            }
            DfsMode::Implicit => {
                if topology.num_nodes() > IMPLICIT_RECURSION_LIMIT {
                    return Err(GraphError::RecursionLimit {
                        nodes: topology.num_nodes(),
                        limit: IMPLICIT_RECURSION_LIMIT,
                    });
                }
                Recursive::new(topology, &plan, visitor).run()
            }
        };
        if completed {
            Ok(RunState::Completed)
        } else {
            debug!(nodes = topology.num_nodes(), "depth-first search aborted");
            Ok(RunState::Aborted)
        }
    }
}

#[derive(Clone, Debug)]
struct Frame {
    node: usize,
    depth: usize,
    scan: ScanCursor,
    entered_by: Option<EdgeStep>,
}

impl Frame {
    fn new(node: usize, depth: usize, entered_by: Option<EdgeStep>) -> Self {
        Self {
            node,
            depth,
            scan: ScanCursor::new(),
            entered_by,
        }
    }
}

/// Explicit-stack depth-first search as an iterator of events.
///
/// The iterator ends early, and [`DfsEvents::was_aborted`] turns true, once
/// the configured abort flag is raised.
#[derive(Clone, Debug)]
pub struct DfsEvents<'t> {
    topology: &'t Topology,
    plan: Plan,
    roots: RootCursor,
    node_colors: Vec<Color>,
    edge_colors: Vec<Color>,
    stack: Vec<Frame>,
    pending: Option<TraversalEvent>,
    aborted: bool,
}

impl<'t> DfsEvents<'t> {
    pub(crate) fn new(topology: &'t Topology, plan: Plan) -> Self {
        Self {
            topology,
            roots: plan.root_cursor(),
            plan,
            node_colors: vec![Color::White; topology.num_nodes()],
            edge_colors: vec![Color::White; topology.num_edges()],
            stack: Vec::new(),
            pending: None,
            aborted: false,
        }
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    /// Current color of a node.
    pub fn node_color(&self, node: usize) -> Color {
        self.node_colors[node]
    }

    fn start_tree(&mut self) -> Option<TraversalEvent> {
        let root = self.roots.next_root(&self.plan, &self.node_colors)?;
        self.node_colors[root] = Color::Gray;
        self.stack.push(Frame::new(root, 0, None));
        self.pending = Some(TraversalEvent::Discover {
            node: root,
            depth: 0,
        });
        Some(TraversalEvent::NewTree { root })
    }
}

impl Iterator for DfsEvents<'_> {
    type Item = TraversalEvent;

    fn next(&mut self) -> Option<TraversalEvent> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }
        if self.aborted {
            return None;
        }
        if self.plan.is_aborted() {
            self.aborted = true;
            return None;
        }
        if self.stack.is_empty() {
            return self.start_tree();
        }

        let topology = self.topology;
        let order = self.plan.order;
        let frame = self.stack.last_mut()?;
        if self.plan.scans_at(frame.depth) {
            while let Some(step) = frame.scan.advance(topology, frame.node, order) {
                if self.edge_colors[step.edge] != Color::White || self.plan.is_excluded(step.to) {
                    continue;
                }
                let kind = match self.node_colors[step.to] {
                    Color::White => {
                        let depth = frame.depth + 1;
                        self.edge_colors[step.edge] = Color::Gray;
                        self.node_colors[step.to] = Color::Gray;
                        self.stack.push(Frame::new(step.to, depth, Some(step)));
                        self.pending = Some(TraversalEvent::Discover {
                            node: step.to,
                            depth,
                        });
                        return Some(TraversalEvent::Edge {
                            step,
                            kind: EdgeKind::Tree,
                        });
                    }
                    Color::Gray => EdgeKind::Back,
                    Color::Black => EdgeKind::ForwardOrCross,
                };
                self.edge_colors[step.edge] = Color::Black;
                return Some(TraversalEvent::Edge { step, kind });
            }
        }

        let frame = self.stack.pop()?;
        self.node_colors[frame.node] = Color::Black;
        if let Some(step) = frame.entered_by {
            self.edge_colors[step.edge] = Color::Black;
            self.pending = Some(TraversalEvent::FinishEdge { step });
        }
        Some(TraversalEvent::Finish {
            node: frame.node,
            depth: frame.depth,
        })
    }
}

/// Native-recursion walker behind [`DfsMode::Implicit`].
struct Recursive<'a, 't, V: ?Sized> {
    topology: &'t Topology,
    plan: &'a Plan,
    visitor: &'a mut V,
    node_colors: Vec<Color>,
    edge_colors: Vec<Color>,
    aborted: bool,
}

impl<'a, 't, V> Recursive<'a, 't, V>
where
    V: TraversalVisitor + ?Sized,
{
    fn new(topology: &'t Topology, plan: &'a Plan, visitor: &'a mut V) -> Self {
        Self {
            topology,
            plan,
            visitor,
            node_colors: vec![Color::White; topology.num_nodes()],
            edge_colors: vec![Color::White; topology.num_edges()],
            aborted: false,
        }
    }

    /// Returns false if the walk was aborted.
    fn run(mut self) -> bool {
        let mut roots = self.plan.root_cursor();
        while let Some(root) = roots.next_root(self.plan, &self.node_colors) {
            if self.plan.is_aborted() {
                return false;
            }
            self.visitor.on_new_tree(root);
            self.node_colors[root] = Color::Gray;
            self.visit(root, 0);
            if self.aborted {
                return false;
            }
        }
        true
    }

    fn visit(&mut self, node: usize, depth: usize) {
        self.visitor.on_discover_node(node, depth);
        if self.plan.scans_at(depth) {
            let topology = self.topology;
            for step in topology.steps(node, self.plan.order) {
                if self.plan.is_aborted() {
                    self.aborted = true;
                    return;
                }
                if self.edge_colors[step.edge] != Color::White || self.plan.is_excluded(step.to) {
                    continue;
                }
                match self.node_colors[step.to] {
                    Color::White => {
                        self.edge_colors[step.edge] = Color::Gray;
                        self.node_colors[step.to] = Color::Gray;
                        self.visitor.on_tree_edge(step);
                        self.visit(step.to, depth + 1);
                        if self.aborted {
                            return;
                        }
                        self.edge_colors[step.edge] = Color::Black;
                        self.visitor.on_finish_edge(step);
                    }
                    Color::Gray => {
                        self.edge_colors[step.edge] = Color::Black;
                        self.visitor.on_back_edge(step);
                    }
                    Color::Black => {
                        self.edge_colors[step.edge] = Color::Black;
                        self.visitor.on_forward_or_cross_edge(step);
                    }
                }
            }
        }
        self.node_colors[node] = Color::Black;
        self.visitor.on_finish_node(node, depth);
    }
}
