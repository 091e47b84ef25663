use std::{collections::HashMap, fmt::Debug};

use crate::{
    graph::{Graph, GraphMut},
    graph_id::GraphId,
};

mod debug;
mod ids;

pub use ids::{EdgeId, NodeId};

#[derive(Clone)]
struct NodeRecord<N> {
    id: NodeId,
    data: N,
    edges_out: Vec<EdgeId>,
    edges_in: Vec<EdgeId>,
}

#[derive(Clone)]
struct EdgeRecord<E> {
    id: EdgeId,
    data: E,
    source: NodeId,
    target: NodeId,
    weight: f64,
}

/// A directed multigraph stored in dense, index-addressable arrays.
///
/// Nodes and edges are kept in insertion order until something is removed;
/// a removal moves the last record into the vacated slot, so indices stay
/// dense but are not stable.  [`NodeId`] and [`EdgeId`] handles stay valid
/// until their own node or edge is removed.
///
/// The store never holds traversal state.  Algorithms take a
/// [`Topology`](crate::topology::Topology) snapshot and keep their scratch
/// data in arrays of their own.
///
/// # Type Parameters
/// * `N` - The type of data stored in nodes
/// * `E` - The type of data stored in edges
#[derive(Clone)]
pub struct GraphStore<N, E> {
    nodes: Vec<NodeRecord<N>>,
    edges: Vec<EdgeRecord<E>>,
    node_slots: HashMap<usize, usize>,
    edge_slots: HashMap<usize, usize>,
    next_node_key: usize,
    next_edge_key: usize,
    node_version: u64,
    edge_version: u64,
    id: GraphId,
}

impl<N, E> GraphStore<N, E> {
    /// Creates an empty store with room for the given number of nodes and
    /// edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            node_slots: HashMap::with_capacity(nodes),
            edge_slots: HashMap::with_capacity(edges),
            next_node_key: 0,
            next_edge_key: 0,
            node_version: 0,
            edge_version: 0,
            id: GraphId::new(),
        }
    }

    fn node(&self, id: NodeId) -> &NodeRecord<N> {
        self.assert_valid_node_id(&id);
        &self.nodes[self.node_slots[&id.key]]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeRecord<N> {
        self.assert_valid_node_id(&id);
        let slot = self.node_slots[&id.key];
        &mut self.nodes[slot]
    }

    fn edge(&self, id: EdgeId) -> &EdgeRecord<E> {
        self.assert_valid_edge_id(&id);
        &self.edges[self.edge_slots[&id.key]]
    }

    fn edge_mut(&mut self, id: EdgeId) -> &mut EdgeRecord<E> {
        self.assert_valid_edge_id(&id);
        let slot = self.edge_slots[&id.key];
        &mut self.edges[slot]
    }

    /// Removes the edge record without touching the version counter.
    fn detach_edge(&mut self, id: EdgeId) -> EdgeRecord<E> {
        let slot = self
            .edge_slots
            .remove(&id.key)
            .expect("edge slot missing for a valid EdgeId");
        let record = self.edges.swap_remove(slot);
        if let Some(moved) = self.edges.get(slot) {
            self.edge_slots.insert(moved.id.key, slot);
        }
        let (source, target) = (record.source, record.target);
        self.node_mut(source).edges_out.retain(|&eid| eid != id);
        self.node_mut(target).edges_in.retain(|&eid| eid != id);
        record
    }
}

impl<N, E> Default for GraphStore<N, E> {
    fn default() -> Self {
        Self::with_capacity(0, 0)
    }
}

impl<N, E> Graph for GraphStore<N, E> {
    type NodeData = N;
    type EdgeData = E;

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn node_at(&self, index: usize) -> NodeId {
        self.nodes[index].id
    }

    fn index_of_node(&self, id: NodeId) -> usize {
        self.assert_valid_node_id(&id);
        self.node_slots[&id.key]
    }

    fn node_data(&self, id: NodeId) -> &N {
        &self.node(id).data
    }

    fn check_valid_node_id(&self, id: &NodeId) -> Result<(), &'static str> {
        #[cfg(not(feature = "unchecked"))]
        if id.graph_id != self.id {
            return Err("NodeId graph_id does not match graph");
        }
        if !self.node_slots.contains_key(&id.key) {
            return Err("NodeId is dangling");
        }
        Ok(())
    }

    fn num_edges(&self) -> usize {
        self.edges.len()
    }

    fn edge_at(&self, index: usize) -> EdgeId {
        self.edges[index].id
    }

    fn index_of_edge(&self, id: EdgeId) -> usize {
        self.assert_valid_edge_id(&id);
        self.edge_slots[&id.key]
    }

    fn edge_data(&self, id: EdgeId) -> &E {
        &self.edge(id).data
    }

    fn edge_source(&self, id: EdgeId) -> NodeId {
        self.edge(id).source
    }

    fn edge_target(&self, id: EdgeId) -> NodeId {
        self.edge(id).target
    }

    fn edge_weight(&self, id: EdgeId) -> f64 {
        self.edge(id).weight
    }

    fn check_valid_edge_id(&self, id: &EdgeId) -> Result<(), &'static str> {
        #[cfg(not(feature = "unchecked"))]
        if id.graph_id != self.id {
            return Err("EdgeId graph_id does not match graph");
        }
        if !self.edge_slots.contains_key(&id.key) {
            return Err("EdgeId is dangling");
        }
        Ok(())
    }

    fn edges_from(&self, from: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.node(from).edges_out.iter().copied()
    }

    fn edges_into(&self, into: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.node(into).edges_in.iter().copied()
    }

    fn num_edges_from(&self, from: NodeId) -> usize {
        self.node(from).edges_out.len()
    }

    fn num_edges_into(&self, into: NodeId) -> usize {
        self.node(into).edges_in.len()
    }

    fn node_version(&self) -> u64 {
        self.node_version
    }

    fn edge_version(&self) -> u64 {
        self.edge_version
    }
}

impl<N, E> GraphMut for GraphStore<N, E> {
    fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.next_node_key, self.id);
        self.next_node_key += 1;
        self.node_slots.insert(id.key, self.nodes.len());
        self.nodes.push(NodeRecord {
            id,
            data,
            edges_out: Vec::new(),
            edges_in: Vec::new(),
        });
        self.node_version += 1;
        id
    }

    fn remove_node(&mut self, id: NodeId) -> N {
        self.assert_valid_node_id(&id);
        let record = self.node(id);
        let mut incident: Vec<EdgeId> = record
            .edges_out
            .iter()
            .chain(record.edges_in.iter())
            .copied()
            .collect();
        // Self-loops appear in both lists.
        incident.sort_unstable();
        incident.dedup();
        if !incident.is_empty() {
            for eid in incident {
                self.detach_edge(eid);
            }
            self.edge_version += 1;
        }

        let slot = self
            .node_slots
            .remove(&id.key)
            .expect("node slot missing for a valid NodeId");
        let record = self.nodes.swap_remove(slot);
        if let Some(moved) = self.nodes.get(slot) {
            self.node_slots.insert(moved.id.key, slot);
        }
        self.node_version += 1;
        record.data
    }

    fn add_weighted_edge(&mut self, from: NodeId, into: NodeId, data: E, weight: f64) -> EdgeId {
        self.assert_valid_node_id(&from);
        self.assert_valid_node_id(&into);
        let id = EdgeId::new(self.next_edge_key, self.id);
        self.next_edge_key += 1;
        self.edge_slots.insert(id.key, self.edges.len());
        self.edges.push(EdgeRecord {
            id,
            data,
            source: from,
            target: into,
            weight,
        });
        self.node_mut(from).edges_out.push(id);
        self.node_mut(into).edges_in.push(id);
        self.edge_version += 1;
        id
    }

    fn remove_edge(&mut self, id: EdgeId) -> E {
        self.assert_valid_edge_id(&id);
        let record = self.detach_edge(id);
        self.edge_version += 1;
        record.data
    }

    fn set_edge_weight(&mut self, id: EdgeId, weight: f64) -> f64 {
        let old = std::mem::replace(&mut self.edge_mut(id).weight, weight);
        self.edge_version += 1;
        old
    }

    fn node_data_mut(&mut self, id: NodeId) -> &mut N {
        &mut self.node_mut(id).data
    }

    fn edge_data_mut(&mut self, id: EdgeId) -> &mut E {
        &mut self.edge_mut(id).data
    }

    fn clear(&mut self) {
        if !self.edges.is_empty() {
            self.edges.clear();
            self.edge_slots.clear();
            self.edge_version += 1;
        }
        if !self.nodes.is_empty() {
            self.nodes.clear();
            self.node_slots.clear();
            self.node_version += 1;
        }
    }

    fn reserve(&mut self, additional_nodes: usize, additional_edges: usize) {
        self.nodes.reserve(additional_nodes);
        self.node_slots.reserve(additional_nodes);
        self.edges.reserve(additional_edges);
        self.edge_slots.reserve(additional_edges);
    }
}

impl<N, E> Debug for GraphStore<N, E>
where
    N: Debug,
    E: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        debug::format_debug(self, f, "GraphStore")
    }
}
