use std::collections::VecDeque;

use super::{
    Color, EdgeKind, Plan, RootCursor, ScanCursor, TraversalConfig, TraversalEvent,
    TraversalVisitor,
};
use crate::{error::Result, run_state::RunState, topology::Topology, tracing_support::debug};

/// Breadth-first search.  Depth is the level below the tree's root.
#[derive(Clone, Debug, Default)]
pub struct Bfs {
    config: TraversalConfig,
}

impl Bfs {
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn events<'t>(&self, topology: &'t Topology) -> Result<BfsEvents<'t>> {
        Ok(BfsEvents::new(topology, self.config.plan(topology)?))
    }

    pub fn run<V>(&self, topology: &Topology, visitor: &mut V) -> Result<RunState>
    where
        V: TraversalVisitor + ?Sized,
    {
        let mut events = self.events(topology)?;
        for event in events.by_ref() {
            event.dispatch(visitor);
        }
        if events.was_aborted() {
            debug!(nodes = topology.num_nodes(), "breadth-first search aborted");
            Ok(RunState::Aborted)
        } else {
            Ok(RunState::Completed)
        }
    }
}

#[derive(Clone, Debug)]
struct Current {
    node: usize,
    depth: usize,
    scan: ScanCursor,
}

/// Breadth-first search as an iterator of events.  Nodes turn Gray when
/// queued and Black once their edges have been scanned.
#[derive(Clone, Debug)]
pub struct BfsEvents<'t> {
    topology: &'t Topology,
    plan: Plan,
    roots: RootCursor,
    node_colors: Vec<Color>,
    edge_colors: Vec<Color>,
    queue: VecDeque<(usize, usize)>,
    current: Option<Current>,
    pending: Option<TraversalEvent>,
    aborted: bool,
}

impl<'t> BfsEvents<'t> {
    pub(crate) fn new(topology: &'t Topology, plan: Plan) -> Self {
        Self {
            topology,
            roots: plan.root_cursor(),
            plan,
            node_colors: vec![Color::White; topology.num_nodes()],
            edge_colors: vec![Color::White; topology.num_edges()],
            queue: VecDeque::new(),
            current: None,
            pending: None,
            aborted: false,
        }
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    pub fn node_color(&self, node: usize) -> Color {
        self.node_colors[node]
    }
}

impl Iterator for BfsEvents<'_> {
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

        if self.current.is_none() {
            if let Some((node, depth)) = self.queue.pop_front() {
                self.current = Some(Current {
                    node,
                    depth,
                    scan: ScanCursor::new(),
                });
            } else {
                let root = self.roots.next_root(&self.plan, &self.node_colors)?;
                self.node_colors[root] = Color::Gray;
                self.current = Some(Current {
                    node: root,
                    depth: 0,
                    scan: ScanCursor::new(),
                });
                self.pending = Some(TraversalEvent::Discover {
                    node: root,
                    depth: 0,
                });
                return Some(TraversalEvent::NewTree { root });
            }
        }

        let topology = self.topology;
        let order = self.plan.order;
        let current = self.current.as_mut()?;
        if self.plan.scans_at(current.depth) {
            while let Some(step) = current.scan.advance(topology, current.node, order) {
                if self.edge_colors[step.edge] != Color::White || self.plan.is_excluded(step.to) {
                    continue;
                }
                self.edge_colors[step.edge] = Color::Black;
                let kind = match self.node_colors[step.to] {
                    Color::White => {
                        let depth = current.depth + 1;
                        self.node_colors[step.to] = Color::Gray;
                        self.queue.push_back((step.to, depth));
                        self.pending = Some(TraversalEvent::Discover {
                            node: step.to,
                            depth,
                        });
                        EdgeKind::Tree
                    }
                    Color::Gray => EdgeKind::Back,
                    Color::Black => EdgeKind::ForwardOrCross,
                };
                return Some(TraversalEvent::Edge { step, kind });
            }
        }

        let finished = self.current.take()?;
        self.node_colors[finished.node] = Color::Black;
        Some(TraversalEvent::Finish {
            node: finished.node,
            depth: finished.depth,
        })
    }
}
