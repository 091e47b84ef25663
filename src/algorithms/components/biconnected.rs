use std::collections::HashMap;

use bitvec::vec::BitVec;

use crate::{
    algorithms::{GraphAlgorithm, RunRecord},
    error::Result,
    graph_store::{EdgeId, NodeId},
    run_state::RunState,
    topology::{EdgeStep, Topology},
    tracing_support::info_span,
    traversal::{Dfs, DfsMode, TraversalConfig, TraversalVisitor},
};

/// Biconnected components, articulation points and bridges of the
/// undirected view.
///
/// Every edge belongs to exactly one component.  A self-loop joins the
/// first component of its node, or forms a component of its own when the
/// node has no other edges.  A node without any edges forms a component
/// with no edges.
#[derive(Clone, Debug, Default)]
pub struct BiconnectedComponents {
    config: TraversalConfig,
    mode: DfsMode,
    compact_groups: bool,
    record: RunRecord<BiconnectedResult>,
}

impl BiconnectedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the roots, exclusions and abort flag of `config`.  Edge
    /// direction and any depth limit are ignored.
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

    /// Makes each cut vertex's home group its largest adjacent component
    /// instead of the first one found.
    pub fn compact_groups(mut self, compact: bool) -> Self {
        self.compact_groups = compact;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiconnectedComponent {
    /// Member nodes in index order.
    pub nodes: Vec<NodeId>,
    /// Member edges in index order.
    pub edges: Vec<EdgeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiconnectedResult {
    components: Vec<BiconnectedComponent>,
    articulation_points: Vec<NodeId>,
    bridges: Vec<EdgeId>,
    memberships: HashMap<NodeId, Vec<usize>>,
    home: HashMap<NodeId, usize>,
}

impl BiconnectedResult {
    pub fn components(&self) -> &[BiconnectedComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Nodes whose removal disconnects their component, in index order.
    pub fn articulation_points(&self) -> &[NodeId] {
        &self.articulation_points
    }

    /// Edges whose removal disconnects their component, in index order.
    pub fn bridges(&self) -> &[EdgeId] {
        &self.bridges
    }

    /// Components containing the node, in order.
    pub fn components_of(&self, node: NodeId) -> &[usize] {
        self.memberships.get(&node).map_or(&[], Vec::as_slice)
    }

    /// True if the node touches two or more components.
    pub fn is_cut_vertex(&self, node: NodeId) -> bool {
        self.components_of(node).len() >= 2
    }

    /// The single component a node is assigned to.
    pub fn home_group(&self, node: NodeId) -> Option<usize> {
        self.home.get(&node).copied()
    }
}

const UNVISITED: usize = usize::MAX;

struct Hopcroft {
    dfn: Vec<usize>,
    low: Vec<usize>,
    counter: usize,
    tree_children: Vec<usize>,
    root: usize,
    edge_stack: Vec<usize>,
    articulation: BitVec,
    groups: Vec<Vec<usize>>,
    self_loops: Vec<usize>,
}

impl Hopcroft {
    fn new(num_nodes: usize) -> Self {
        Self {
            dfn: vec![UNVISITED; num_nodes],
            low: vec![UNVISITED; num_nodes],
            counter: 0,
            tree_children: vec![0; num_nodes],
            root: 0,
            edge_stack: Vec::new(),
            articulation: BitVec::repeat(false, num_nodes),
            groups: Vec::new(),
            self_loops: Vec::new(),
        }
    }

    fn non_tree_edge(&mut self, step: EdgeStep) {
        if step.from == step.to {
            self.self_loops.push(step.edge);
            return;
        }
        self.low[step.from] = self.low[step.from].min(self.dfn[step.to]);
        self.edge_stack.push(step.edge);
    }
}

impl TraversalVisitor for Hopcroft {
    fn on_new_tree(&mut self, root: usize) {
        self.root = root;
    }

    fn on_discover_node(&mut self, node: usize, _depth: usize) {
        self.dfn[node] = self.counter;
        self.low[node] = self.counter;
        self.counter += 1;
    }

    fn on_tree_edge(&mut self, step: EdgeStep) {
        self.tree_children[step.from] += 1;
        self.edge_stack.push(step.edge);
    }

    fn on_back_edge(&mut self, step: EdgeStep) {
        self.non_tree_edge(step);
    }

    fn on_forward_or_cross_edge(&mut self, step: EdgeStep) {
        self.non_tree_edge(step);
    }

    fn on_finish_edge(&mut self, step: EdgeStep) {
        let (parent, child) = (step.from, step.to);
        self.low[parent] = self.low[parent].min(self.low[child]);
        if self.low[child] < self.dfn[parent] {
            return;
        }
        let mut group = Vec::new();
        while let Some(edge) = self.edge_stack.pop() {
            group.push(edge);
            if edge == step.edge {
                break;
            }
        }
        self.groups.push(group);
        if parent != self.root {
            self.articulation.set(parent, true);
        }
    }

    fn on_finish_node(&mut self, node: usize, _depth: usize) {
        if node == self.root && self.tree_children[node] >= 2 {
            self.articulation.set(node, true);
        }
    }
}

impl BiconnectedComponents {
    fn assemble(&self, topology: &Topology, hopcroft: Hopcroft) -> BiconnectedResult {
        let n = topology.num_nodes();
        let mut groups = hopcroft.groups;
        let mut member_of: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (index, group) in groups.iter().enumerate() {
            for &edge in group {
                for node in [topology.source(edge), topology.target(edge)] {
                    if member_of[node].last() != Some(&index) {
                        member_of[node].push(index);
                    }
                }
            }
        }

        let mut bridges: Vec<usize> = groups
            .iter()
            .filter(|group| group.len() == 1)
            .map(|group| group[0])
            .collect();
        bridges.sort_unstable();

        // Self-loops only make new components at nodes without other edges;
        // every self-loop of such a node goes into the same one.
        for &edge in &hopcroft.self_loops {
            let node = topology.source(edge);
            match member_of[node].first() {
                Some(&group) => groups[group].push(edge),
                None => {
                    member_of[node].push(groups.len());
                    groups.push(vec![edge]);
                }
            }
        }

        let mut nodes_of: Vec<Vec<usize>> = vec![Vec::new(); groups.len()];
        for (node, groups_of_node) in member_of.iter_mut().enumerate() {
            if hopcroft.dfn[node] == UNVISITED {
                continue;
            }
            if groups_of_node.is_empty() {
                groups_of_node.push(nodes_of.len());
                nodes_of.push(Vec::new());
                groups.push(Vec::new());
            }
            for &group in groups_of_node.iter() {
                nodes_of[group].push(node);
            }
        }

        let mut home = HashMap::new();
        let mut memberships = HashMap::new();
        for (node, groups_of_node) in member_of.into_iter().enumerate() {
            let Some(&first) = groups_of_node.first() else {
                continue;
            };
            let chosen = if self.compact_groups && groups_of_node.len() >= 2 {
                groups_of_node
                    .iter()
                    .copied()
                    .rev()
                    .max_by_key(|&group| nodes_of[group].len())
                    .unwrap_or(first)
            } else {
                first
            };
            let nid = topology.node_id(node);
            home.insert(nid, chosen);
            memberships.insert(nid, groups_of_node);
        }

        let components = groups
            .into_iter()
            .zip(nodes_of)
            .map(|(mut edges, nodes)| {
                edges.sort_unstable();
                BiconnectedComponent {
                    nodes: nodes.into_iter().map(|n| topology.node_id(n)).collect(),
                    edges: edges.into_iter().map(|e| topology.edge_id(e)).collect(),
                }
            })
            .collect();

        BiconnectedResult {
            components,
            articulation_points: hopcroft
                .articulation
                .iter_ones()
                .map(|n| topology.node_id(n))
                .collect(),
            bridges: bridges.into_iter().map(|e| topology.edge_id(e)).collect(),
            memberships,
            home,
        }
    }
}

impl GraphAlgorithm for BiconnectedComponents {
    type Output = BiconnectedResult;

    fn name(&self) -> &'static str {
        "biconnected_components"
    }

    fn compute_on(&mut self, topology: &Topology) -> Result<RunState> {
        let _span = info_span!(
            "biconnected_components",
            nodes = topology.num_nodes(),
            edges = topology.num_edges()
        )
        .entered();
        self.record.clear();
        let mut hopcroft = Hopcroft::new(topology.num_nodes());
        let state = Dfs::new(self.config.clone().directed(false).unlimited_depth())
            .mode(self.mode)
            .run(topology, &mut hopcroft)?;
        let output = self.assemble(topology, hopcroft);
        Ok(self.record.finish(topology, state, output))
    }

    fn record(&self) -> &RunRecord<BiconnectedResult> {
        &self.record
    }

    fn record_mut(&mut self) -> &mut RunRecord<BiconnectedResult> {
        &mut self.record
    }
}
