use std::fmt::{self, Debug, Formatter};

use crate::graph::Graph;

/// Formats its argument with `Display` inside a `Debug` context, so map keys
/// such as `0 -> 1` are printed without quotes.
struct FormatDebugAs(String);

impl Debug for FormatDebugAs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct FormatDebugWith<F>(F)
where
    F: Fn(&mut Formatter<'_>) -> fmt::Result;

impl<F> Debug for FormatDebugWith<F>
where
    F: Fn(&mut Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

/// Formats a graph for debug output.  Nodes are labelled by their current
/// dense index and edges by the indices of their endpoints; data is omitted
/// when its type is zero-sized.
pub(super) fn format_debug<G>(graph: &G, fmt: &mut Formatter<'_>, name: &str) -> fmt::Result
where
    G: Graph,
    G::NodeData: Debug,
    G::EdgeData: Debug,
{
    fmt.debug_struct(name)
        .field(
            "nodes",
            &FormatDebugWith(|f: &mut Formatter<'_>| {
                if size_of::<G::NodeData>() == 0 {
                    f.debug_list()
                        .entries((0..graph.num_nodes()).map(|i| FormatDebugAs(i.to_string())))
                        .finish()
                } else {
                    f.debug_map()
                        .entries(graph.node_ids().enumerate().map(|(i, nid)| {
                            (FormatDebugAs(i.to_string()), graph.node_data(nid))
                        }))
                        .finish()
                }
            }),
        )
        .field(
            "edges",
            &FormatDebugWith(|f: &mut Formatter<'_>| {
                let make_edge_tag = |eid| {
                    FormatDebugAs(format!(
                        "{} -> {}",
                        graph.index_of_node(graph.edge_source(eid)),
                        graph.index_of_node(graph.edge_target(eid))
                    ))
                };
                if size_of::<G::EdgeData>() == 0 {
                    f.debug_list()
                        .entries(graph.edge_ids().map(make_edge_tag))
                        .finish()
                } else {
                    f.debug_map()
                        .entries(
                            graph
                                .edge_ids()
                                .map(|eid| (make_edge_tag(eid), graph.edge_data(eid))),
                        )
                        .finish()
                }
            }),
        )
        .finish()
}
