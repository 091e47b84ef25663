#![allow(dead_code)]

use graphwalk::prelude::*;
use quickcheck::{Arbitrary, Gen};

pub type NamedStore = GraphStore<&'static str, ()>;

/// Builds a store with one node per name and weighted edges between name
/// indices.
pub fn named(names: &[&'static str], edges: &[(usize, usize, f64)]) -> (NamedStore, Vec<NodeId>) {
    let mut graph = NamedStore::new();
    let nodes: Vec<_> = names.iter().map(|&name| graph.add_node(name)).collect();
    for &(a, b, weight) in edges {
        graph.add_weighted_edge(nodes[a], nodes[b], (), weight);
    }
    (graph, nodes)
}

/// A random multigraph with integral weights in `0..20`, some of whose
/// nodes may have been removed again so indices and keys diverge.
#[derive(Clone, Debug)]
pub struct RandomGraph {
    pub graph: GraphStore<u32, ()>,
}

impl Arbitrary for RandomGraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut graph = GraphStore::new();
        let num_nodes = usize::arbitrary(g) % 20;
        let nodes: Vec<_> = (0..num_nodes as u32).map(|i| graph.add_node(i)).collect();
        if !nodes.is_empty() {
            for _ in 0..usize::arbitrary(g) % 40 {
                let source = nodes[usize::arbitrary(g) % nodes.len()];
                let target = nodes[usize::arbitrary(g) % nodes.len()];
                graph.add_weighted_edge(source, target, (), f64::from(u8::arbitrary(g) % 20));
            }
            if bool::arbitrary(g) {
                graph.remove_node(nodes[usize::arbitrary(g) % nodes.len()]);
            }
        }
        RandomGraph { graph }
    }
}

/// Integral edge weight, for oracles that need `Ord` costs.
pub fn integral_weight<G: Graph>(graph: &G, edge: EdgeId) -> u64 {
    graph.edge_weight(edge) as u64
}
