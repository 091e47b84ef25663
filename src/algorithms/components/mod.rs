//! Component decompositions.

use std::collections::HashMap;

use crate::{graph_store::NodeId, topology::Topology};

mod biconnected;
mod connected;
mod strong;
mod weak;

pub use biconnected::{BiconnectedComponent, BiconnectedComponents, BiconnectedResult};
pub use connected::ConnectedComponents;
pub use strong::{StrongComponents, StrongComponentsResult};
pub use weak::WeakComponents;

/// A partition of (some of) a graph's nodes into numbered groups.
///
/// Groups are numbered in the order they were found.  Nodes the run never
/// reached, such as excluded ones, belong to no group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Components {
    groups: Vec<Vec<NodeId>>,
    membership: Vec<Option<usize>>,
    lookup: HashMap<NodeId, usize>,
}

impl Components {
    /// Builds the partition from explicit groups of node indices.
    pub(crate) fn from_groups(topology: &Topology, groups: Vec<Vec<usize>>) -> Self {
        let mut membership = vec![None; topology.num_nodes()];
        let mut lookup = HashMap::new();
        let groups = groups
            .into_iter()
            .enumerate()
            .map(|(group, members)| {
                members
                    .into_iter()
                    .map(|node| {
                        membership[node] = Some(group);
                        let nid = topology.node_id(node);
                        lookup.insert(nid, group);
                        nid
                    })
                    .collect()
            })
            .collect();
        Self {
            groups,
            membership,
            lookup,
        }
    }

    /// Builds the partition from a group number per node index.  Members of
    /// each group are listed in index order.
    pub(crate) fn from_membership(topology: &Topology, membership: Vec<Option<usize>>) -> Self {
        let count = membership.iter().flatten().max().map_or(0, |&m| m + 1);
        let mut groups = vec![Vec::new(); count];
        for (node, group) in membership.iter().enumerate() {
            if let Some(group) = group {
                groups[*group].push(node);
            }
        }
        Self::from_groups(topology, groups)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Vec<NodeId>] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&[NodeId]> {
        self.groups.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[NodeId]> + '_ {
        self.groups.iter().map(Vec::as_slice)
    }

    /// Group number of a node, or `None` if the node was not reached.
    pub fn component_of(&self, node: NodeId) -> Option<usize> {
        self.lookup.get(&node).copied()
    }

    /// Group number per node index of the snapshot the run used.
    pub fn membership(&self) -> &[Option<usize>] {
        &self.membership
    }

    pub fn same_component(&self, a: NodeId, b: NodeId) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// The group with the most nodes; the first one found wins ties.
    pub fn largest(&self) -> Option<&[NodeId]> {
        self.groups
            .iter()
            .rev()
            .max_by_key(|group| group.len())
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::GraphMut, graph_store::GraphStore};

    #[test]
    fn test_from_membership() {
        let mut graph = GraphStore::<(), ()>::new();
        let ids: Vec<_> = (0..4).map(|_| graph.add_node(())).collect();
        let topology = Topology::new(&graph);
        let components = Components::from_membership(&topology, vec![Some(1), Some(0), None, Some(1)]);
        assert_eq!(components.len(), 2);
        assert_eq!(components.group(0), Some(&[ids[1]][..]));
        assert_eq!(components.group(1), Some(&[ids[0], ids[3]][..]));
        assert_eq!(components.component_of(ids[2]), None);
        assert!(components.same_component(ids[0], ids[3]));
        assert!(!components.same_component(ids[0], ids[2]));
        assert_eq!(components.largest(), Some(&[ids[0], ids[3]][..]));
    }

    #[test]
    fn test_largest_prefers_first_on_ties() {
        let mut graph = GraphStore::<(), ()>::new();
        let ids: Vec<_> = (0..4).map(|_| graph.add_node(())).collect();
        let topology = Topology::new(&graph);
        let components = Components::from_groups(&topology, vec![vec![2, 3], vec![0, 1]]);
        assert_eq!(components.largest(), Some(&[ids[2], ids[3]][..]));
        assert_eq!(components.membership(), &[Some(1), Some(1), Some(0), Some(0)]);
    }
}
