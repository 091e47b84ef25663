use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use quickcheck::{Arbitrary, Gen};

use crate::{
    graph::{Graph, GraphMut},
    graph_store::{EdgeId, GraphStore, NodeId},
    tracing_support::{info_span, init_tracing},
};

pub type TestStore = GraphStore<u32, u32>;

/// A small random multigraph with self-loops, parallel edges and
/// non-negative integral weights.
#[derive(Debug, Clone)]
pub struct ArbGraph {
    pub graph: TestStore,
}

/// A small random DAG: every edge runs from an earlier node to a later one.
/// Weights may be negative.
#[derive(Debug, Clone)]
pub struct ArbDag {
    pub graph: TestStore,
}

/// A small random tree: every node after the first hangs off an earlier
/// one, with the edge pointing either way and a non-negative integral
/// weight.
#[derive(Debug, Clone)]
pub struct ArbTree {
    pub graph: TestStore,
}

fn arbitrary_nodes(g: &mut Gen, graph: &mut TestStore) -> Vec<NodeId> {
    let num_nodes = usize::arbitrary(g) % 16;
    (0..num_nodes as u32).map(|i| graph.add_node(i)).collect()
}

impl Arbitrary for ArbGraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut graph = TestStore::new();
        let nodes = arbitrary_nodes(g, &mut graph);
        if nodes.is_empty() {
            return ArbGraph { graph };
        }
        let num_edges = usize::arbitrary(g) % 32;
        for i in 0..num_edges {
            let source = nodes[usize::arbitrary(g) % nodes.len()];
            let target = nodes[usize::arbitrary(g) % nodes.len()];
            let weight = f64::from(u8::arbitrary(g) % 10);
            graph.add_weighted_edge(source, target, i as u32, weight);
        }
        ArbGraph { graph }
    }
}

impl Arbitrary for ArbDag {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut graph = TestStore::new();
        let nodes = arbitrary_nodes(g, &mut graph);
        if nodes.len() < 2 {
            return ArbDag { graph };
        }
        let num_edges = usize::arbitrary(g) % 32;
        for i in 0..num_edges {
            let a = usize::arbitrary(g) % nodes.len();
            let b = usize::arbitrary(g) % nodes.len();
            if a == b {
                continue;
            }
            let weight = f64::from(i8::arbitrary(g) % 6) + 2.0;
            graph.add_weighted_edge(nodes[a.min(b)], nodes[a.max(b)], i as u32, weight);
        }
        ArbDag { graph }
    }
}

impl Arbitrary for ArbTree {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut graph = TestStore::new();
        let nodes = arbitrary_nodes(g, &mut graph);
        for child in 1..nodes.len() {
            let parent = usize::arbitrary(g) % child;
            let weight = f64::from(u8::arbitrary(g) % 10);
            let (source, target) = if bool::arbitrary(g) {
                (nodes[parent], nodes[child])
            } else {
                (nodes[child], nodes[parent])
            };
            graph.add_weighted_edge(source, target, child as u32, weight);
        }
        ArbTree { graph }
    }
}

pub fn has_duplicates<T: Eq + Hash>(items: impl IntoIterator<Item = T>) -> bool {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            return true;
        }
    }
    false
}

/// Checks the internal consistency of a graph.
pub fn check_graph_consistency<G: Graph>(graph: &G) {
    init_tracing();
    let _span = info_span!("check_graph_consistency").entered();

    for (index, node_id) in graph.node_ids().enumerate() {
        assert_eq!(graph.check_valid_node_id(&node_id), Ok(()));
        assert_eq!(graph.index_of_node(node_id), index);
        assert_eq!(
            graph.num_edges_from(node_id),
            graph.edges_from(node_id).count()
        );
        assert_eq!(
            graph.num_edges_into(node_id),
            graph.edges_into(node_id).count()
        );
        assert!(!has_duplicates(graph.edges_from(node_id)));
        assert!(!has_duplicates(graph.edges_into(node_id)));
        assert!(graph.edges_from(node_id).all(|e| graph.edge_source(e) == node_id));
        assert!(graph.edges_into(node_id).all(|e| graph.edge_target(e) == node_id));
    }

    for (index, edge_id) in graph.edge_ids().enumerate() {
        assert_eq!(graph.check_valid_edge_id(&edge_id), Ok(()));
        assert_eq!(graph.index_of_edge(edge_id), index);
        let (source, target) = (graph.edge_source(edge_id), graph.edge_target(edge_id));
        assert!(graph.edges_from(source).any(|e| e == edge_id));
        assert!(graph.edges_into(target).any(|e| e == edge_id));
        assert!(graph.edges_between(source, target).any(|e| e == edge_id));
    }

    assert!(!has_duplicates(graph.node_ids()));
    assert!(!has_duplicates(graph.edge_ids()));
    assert_eq!(graph.node_ids().count(), graph.num_nodes());
    assert_eq!(graph.edge_ids().count(), graph.num_edges());
    assert_eq!(graph.is_empty(), graph.num_nodes() == 0);
    assert!(graph.num_nodes() > 0 || graph.num_edges() == 0);
}

/// Nodes reachable from `start` by plain breadth-first search, skipping
/// `removed_node` and `removed_edge`.
pub fn reachable_from<G: Graph>(
    graph: &G,
    start: NodeId,
    directed: bool,
    removed_node: Option<NodeId>,
    removed_edge: Option<EdgeId>,
) -> HashSet<NodeId> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let forward = graph.edges_from(node).map(|e| (e, graph.edge_target(e)));
        let backward = graph
            .edges_into(node)
            .filter(|_| !directed)
            .map(|e| (e, graph.edge_source(e)));
        for (edge, next) in forward.chain(backward) {
            if Some(edge) == removed_edge || Some(next) == removed_node {
                continue;
            }
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Number of undirected connected components, ignoring `removed_node` and
/// `removed_edge`.
pub fn count_undirected_components<G: Graph>(
    graph: &G,
    removed_node: Option<NodeId>,
    removed_edge: Option<EdgeId>,
) -> usize {
    let mut seen = HashSet::new();
    let mut count = 0;
    for node in graph.node_ids() {
        if Some(node) == removed_node || seen.contains(&node) {
            continue;
        }
        count += 1;
        seen.extend(reachable_from(graph, node, false, removed_node, removed_edge));
    }
    count
}

/// Single-source distances by exhaustive relaxation; `f64::MAX` for nodes
/// that cannot be reached.
pub fn relaxed_distances<G: Graph>(graph: &G, source: NodeId, directed: bool) -> Vec<f64> {
    let mut dist = vec![f64::MAX; graph.num_nodes()];
    dist[graph.index_of_node(source)] = 0.0;
    for _ in 0..graph.num_nodes() {
        let mut changed = false;
        for edge in graph.edge_ids() {
            let u = graph.index_of_node(graph.edge_source(edge));
            let v = graph.index_of_node(graph.edge_target(edge));
            let w = graph.edge_weight(edge);
            let mut relax = |from: usize, to: usize| {
                if dist[from] != f64::MAX && dist[from] + w < dist[to] {
                    dist[to] = dist[from] + w;
                    changed = true;
                }
            };
            relax(u, v);
            if !directed {
                relax(v, u);
            }
        }
        if !changed {
            break;
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn prop_arbitrary_graphs_are_consistent(ArbGraph { graph }: ArbGraph) {
        check_graph_consistency(&graph);
    }

    #[quickcheck]
    fn prop_dag_edges_run_forwards(ArbDag { graph }: ArbDag) -> bool {
        graph
            .edge_ids()
            .all(|e| graph.index_of_node(graph.edge_source(e)) < graph.index_of_node(graph.edge_target(e)))
    }
}
