//! Single-source and all-pairs shortest paths.

use std::collections::HashMap;

use crate::{
    algorithms::GraphAlgorithm,
    error::{GraphError, Result},
    graph_store::{EdgeId, NodeId},
    path::Path,
    topology::{Incidence, Topology},
};

mod astar;
mod bellman_ford;
mod dijkstra;
mod floyd_warshall;
mod repeated;

pub use astar::AStar;
pub use bellman_ford::BellmanFord;
pub use dijkstra::{Dijkstra, QueueKind};
pub use floyd_warshall::FloydWarshall;
pub use repeated::RepeatedSingleSource;

/// Distance reported for nodes no path reaches.
pub const UNREACHABLE: f64 = f64::MAX;

/// A solver whose output is a shortest-path tree from a single source.
pub trait SingleSourceShortestPaths: GraphAlgorithm<Output = ShortestPaths> {
    /// Replaces the source used by the next `compute`.
    fn set_source(&mut self, source: NodeId);
}

/// The directed arcs an edge offers under a scan order: `(from, to)` pairs
/// in the direction a traversal may cross the edge.
pub(crate) fn arcs(
    topology: &Topology,
    order: &[Incidence],
    edge: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let (source, target) = (topology.source(edge), topology.target(edge));
    let self_loop = source == target;
    order
        .iter()
        .enumerate()
        .filter(move |&(i, _)| !(self_loop && i > 0))
        .map(move |(_, incidence)| match incidence {
            Incidence::Out => (source, target),
            Incidence::In => (target, source),
        })
}

/// A shortest-path tree: distances and predecessors by node index of the
/// snapshot the run used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShortestPaths {
    sources: Vec<NodeId>,
    node_ids: Vec<NodeId>,
    lookup: HashMap<NodeId, usize>,
    distances: Vec<f64>,
    predecessor_nodes: Vec<Option<NodeId>>,
    predecessor_edges: Vec<Option<EdgeId>>,
    has_negative_cycle: bool,
}

impl ShortestPaths {
    pub(crate) fn from_indices(
        topology: &Topology,
        sources: &[usize],
        distances: Vec<f64>,
        predecessor_edges: &[Option<usize>],
        predecessor_nodes: &[Option<usize>],
        has_negative_cycle: bool,
    ) -> Self {
        let node_ids: Vec<_> = (0..topology.num_nodes()).map(|i| topology.node_id(i)).collect();
        let lookup = node_ids.iter().enumerate().map(|(i, &nid)| (nid, i)).collect();
        Self {
            sources: sources.iter().map(|&s| topology.node_id(s)).collect(),
            lookup,
            distances,
            predecessor_nodes: predecessor_nodes
                .iter()
                .map(|p| p.map(|n| topology.node_id(n)))
                .collect(),
            predecessor_edges: predecessor_edges
                .iter()
                .map(|p| p.map(|e| topology.edge_id(e)))
                .collect(),
            node_ids,
            has_negative_cycle,
        }
    }

    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    /// Distances by node index; [`UNREACHABLE`] where no path exists.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn predecessor_nodes(&self) -> &[Option<NodeId>] {
        &self.predecessor_nodes
    }

    pub fn predecessor_edges(&self) -> &[Option<EdgeId>] {
        &self.predecessor_edges
    }

    /// Distance to a node; [`UNREACHABLE`] if no path was found or the node
    /// was not in the graph.
    pub fn distance_to(&self, node: NodeId) -> f64 {
        self.lookup
            .get(&node)
            .map_or(UNREACHABLE, |&i| self.distances[i])
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance_to(node) != UNREACHABLE
    }

    pub fn predecessor_node(&self, node: NodeId) -> Option<NodeId> {
        self.lookup.get(&node).and_then(|&i| self.predecessor_nodes[i])
    }

    pub fn predecessor_edge(&self, node: NodeId) -> Option<EdgeId> {
        self.lookup.get(&node).and_then(|&i| self.predecessor_edges[i])
    }

    /// True if the solver detected a cycle of negative total weight.  Only
    /// Bellman-Ford looks for one everywhere; the other solvers set it when
    /// they happen to run into one.
    pub fn has_negative_cycle(&self) -> bool {
        self.has_negative_cycle
    }

    /// The path from a source to `node` along predecessor edges.  `None` if
    /// the node is unreachable or its predecessor chain loops.
    pub fn path_to(&self, node: NodeId) -> Option<Path> {
        let mut index = *self.lookup.get(&node)?;
        if self.distances[index] == UNREACHABLE {
            return None;
        }
        let mut steps = Vec::new();
        while let (Some(edge), Some(previous)) =
            (self.predecessor_edges[index], self.predecessor_nodes[index])
        {
            steps.push((edge, self.node_ids[index]));
            if steps.len() > self.node_ids.len() {
                return None;
            }
            index = self.lookup[&previous];
        }
        let mut path = Path::new(self.node_ids[index]);
        for (edge, node) in steps.into_iter().rev() {
            path.add_edge_and_node(edge, node);
        }
        Some(path)
    }
}

/// How an all-pairs result rebuilds its paths.
#[derive(Clone, Debug, PartialEq)]
enum Routes {
    /// Floyd-Warshall: the intermediate node chosen for each pair, and the
    /// cheapest direct edge for each pair.
    Intermediate {
        via: Vec<Vec<Option<usize>>>,
        direct: Vec<Vec<Option<usize>>>,
        edge_ids: Vec<EdgeId>,
    },
    /// One shortest-path tree per source.
    Trees(Vec<ShortestPaths>),
}

/// Distances and paths between every ordered pair of nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct AllPairsShortestPaths {
    node_ids: Vec<NodeId>,
    lookup: HashMap<NodeId, usize>,
    distances: Vec<Vec<f64>>,
    routes: Routes,
    has_negative_cycle: bool,
}

impl AllPairsShortestPaths {
    fn with_routes(
        topology: &Topology,
        distances: Vec<Vec<f64>>,
        routes: Routes,
        has_negative_cycle: bool,
    ) -> Self {
        let node_ids: Vec<_> = (0..topology.num_nodes()).map(|i| topology.node_id(i)).collect();
        let lookup = node_ids.iter().enumerate().map(|(i, &nid)| (nid, i)).collect();
        Self {
            node_ids,
            lookup,
            distances,
            routes,
            has_negative_cycle,
        }
    }

    pub(crate) fn from_intermediates(
        topology: &Topology,
        distances: Vec<Vec<f64>>,
        via: Vec<Vec<Option<usize>>>,
        direct: Vec<Vec<Option<usize>>>,
        has_negative_cycle: bool,
    ) -> Self {
        let edge_ids = (0..topology.num_edges()).map(|e| topology.edge_id(e)).collect();
        let routes = Routes::Intermediate {
            via,
            direct,
            edge_ids,
        };
        Self::with_routes(topology, distances, routes, has_negative_cycle)
    }

    pub(crate) fn from_trees(topology: &Topology, trees: Vec<ShortestPaths>) -> Self {
        let distances = trees.iter().map(|tree| tree.distances.clone()).collect();
        let has_negative_cycle = trees.iter().any(ShortestPaths::has_negative_cycle);
        Self::with_routes(topology, distances, Routes::Trees(trees), has_negative_cycle)
    }

    pub fn num_nodes(&self) -> usize {
        self.node_ids.len()
    }

    /// The distance matrix by node index.
    pub fn distances(&self) -> &[Vec<f64>] {
        &self.distances
    }

    /// Distance between two nodes; [`UNREACHABLE`] if there is no path or
    /// either node was not in the graph.
    pub fn distance(&self, from: NodeId, to: NodeId) -> f64 {
        match (self.lookup.get(&from), self.lookup.get(&to)) {
            (Some(&i), Some(&j)) => self.distances.get(i).map_or(UNREACHABLE, |row| row[j]),
            _ => UNREACHABLE,
        }
    }

    pub fn is_reachable(&self, from: NodeId, to: NodeId) -> bool {
        self.distance(from, to) != UNREACHABLE
    }

    pub fn has_negative_cycle(&self) -> bool {
        self.has_negative_cycle
    }

    /// Rebuilds a shortest path.  `Ok(None)` if `to` is unreachable from
    /// `from`, or if the path would run through a negative cycle.
    pub fn path(&self, from: NodeId, to: NodeId) -> Result<Option<Path>> {
        let &i = self.lookup.get(&from).ok_or(GraphError::UnknownNode(from))?;
        let &j = self.lookup.get(&to).ok_or(GraphError::UnknownNode(to))?;
        if self.distances.get(i).is_none_or(|row| row[j] == UNREACHABLE) {
            return Ok(None);
        }
        match &self.routes {
            Routes::Trees(trees) => Ok(trees[i].path_to(to)),
            Routes::Intermediate {
                via,
                direct,
                edge_ids,
            } => {
                let mut path = Path::new(from);
                if i == j {
                    return Ok(Some(path));
                }
                // Frames are unwound left to right: an intermediate node
                // splits a frame, anything else must be a direct edge.
                let mut frames = vec![(i, j)];
                while let Some((src, dst)) = frames.pop() {
                    match via[src][dst] {
                        Some(k) => {
                            frames.push((k, dst));
                            frames.push((src, k));
                        }
                        None => {
                            let edge = direct[src][dst]
                                .ok_or(GraphError::MissingPathEdge { from: src, to: dst })?;
                            path.add_edge_and_node(edge_ids[edge], self.node_ids[dst]);
                            if path.len() > self.node_ids.len() {
                                return Ok(None);
                            }
                        }
                    }
                }
                Ok(Some(path))
            }
        }
    }
}
