/// The annotated test/gold multigraph produced by a diff.
///
/// Wraps a `petgraph` [`StableDiGraph`] whose node and edge weights carry a
/// display label and a [`Mark`], plus a `HashMap<String, NodeIndex>` for
/// O(1) lookup by node id. Parallel edges between the same pair of nodes are
/// allowed and are distinguished only by their label.
///
/// Node ids follow three shapes:
/// - a test variable (`"a"`) for every test node,
/// - `"GOLD <index>"` for gold nodes no test node matched,
/// - `"<parent id> <constant>"` for constant (attribute value) nodes.
use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef as _;
use serde::{Deserialize, Serialize};

/// How an element of the diff graph relates to the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// Present in test and agreeing with gold.
    Agree,
    /// Present in test but wrong or absent in gold.
    Test,
    /// Present in gold but absent from test.
    Gold,
}

impl Mark {
    /// Conventional stroke/font color for renderers.
    pub fn color(self) -> &'static str {
        match self {
            Mark::Agree => "black",
            Mark::Test => "red",
            Mark::Gold => "blue",
        }
    }
}

/// Weight stored on each node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffNode {
    /// Node id, unique within the graph.
    pub id: String,
    /// Display label: a concept, a constant, or `"test (gold)"` on mismatch.
    pub label: String,
    /// Agreement classification.
    pub mark: Mark,
}

/// Weight stored on each edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEdge {
    /// Relation label.
    pub label: String,
    /// Agreement classification.
    pub mark: Mark,
}

/// A borrowed view of one edge with its endpoint ids resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeView<'a> {
    /// Id of the source node.
    pub source: &'a str,
    /// Id of the target node.
    pub target: &'a str,
    /// Relation label.
    pub label: &'a str,
    /// Agreement classification.
    pub mark: Mark,
}

/// Element counts per [`Mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MarkCounts {
    /// Elements marked [`Mark::Agree`].
    pub agree: usize,
    /// Elements marked [`Mark::Test`].
    pub test: usize,
    /// Elements marked [`Mark::Gold`].
    pub gold: usize,
}

impl MarkCounts {
    fn bump(&mut self, mark: Mark) {
        match mark {
            Mark::Agree => self.agree += 1,
            Mark::Test => self.test += 1,
            Mark::Gold => self.gold += 1,
        }
    }

    /// Total number of counted elements.
    pub fn total(&self) -> usize {
        self.agree + self.test + self.gold
    }
}

/// Node and edge counts per mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiffSummary {
    /// Node counts.
    pub nodes: MarkCounts,
    /// Edge counts.
    pub edges: MarkCounts,
}

impl DiffSummary {
    /// Returns `true` when nothing is marked [`Mark::Test`] or [`Mark::Gold`].
    pub fn is_clean(&self) -> bool {
        self.nodes.test + self.nodes.gold + self.edges.test + self.edges.gold == 0
    }
}

/// The annotated diff multigraph.
///
/// Construct with [`crate::diff_graph`] or [`crate::DiffBuilder`].
#[derive(Debug, Clone, Default)]
pub struct DiffGraph {
    graph: StableDiGraph<DiffNode, DiffEdge>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl DiffGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts node `id`, or overwrites the label and mark of an existing
    /// node with that id.
    pub(crate) fn set_node(&mut self, id: &str, label: String, mark: Mark) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(id) {
            if let Some(weight) = self.graph.node_weight_mut(idx) {
                weight.label = label;
                weight.mark = mark;
            }
            return idx;
        }
        self.insert_node(id, label, mark)
    }

    /// Inserts node `id` unless it already exists; an existing node keeps its
    /// label and mark.
    pub(crate) fn ensure_node(&mut self, id: &str, label: String, mark: Mark) -> NodeIndex {
        match self.id_to_index.get(id) {
            Some(&idx) => idx,
            None => self.insert_node(id, label, mark),
        }
    }

    fn insert_node(&mut self, id: &str, label: String, mark: Mark) -> NodeIndex {
        let idx = self.graph.add_node(DiffNode {
            id: id.to_owned(),
            label,
            mark,
        });
        self.id_to_index.insert(id.to_owned(), idx);
        idx
    }

    /// Adds a parallel edge; existing edges between the pair are kept.
    pub(crate) fn add_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        label: &str,
        mark: Mark,
    ) -> EdgeIndex {
        self.graph.add_edge(
            source,
            target,
            DiffEdge {
                label: label.to_owned(),
                mark,
            },
        )
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges, counting parallel edges separately.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up the [`NodeIndex`] for a node id.
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: &str) -> Option<&DiffNode> {
        self.node_index(id)
            .and_then(|idx| self.graph.node_weight(idx))
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DiffNode> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
    }

    /// Iterates over edges in insertion order with endpoint ids resolved.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_indices().filter_map(|e| {
            let (s, t) = self.graph.edge_endpoints(e)?;
            let weight = self.graph.edge_weight(e)?;
            Some(EdgeView {
                source: self.graph.node_weight(s)?.id.as_str(),
                target: self.graph.node_weight(t)?.id.as_str(),
                label: weight.label.as_str(),
                mark: weight.mark,
            })
        })
    }

    /// All edges from `source` to `target`, in insertion order.
    ///
    /// Returns an empty vector if either id is unknown.
    pub fn edges_between(&self, source: &str, target: &str) -> Vec<&DiffEdge> {
        let (Some(s), Some(t)) = (self.node_index(source), self.node_index(target)) else {
            return Vec::new();
        };
        let mut found: Vec<(EdgeIndex, &DiffEdge)> = self
            .graph
            .edges_directed(s, Direction::Outgoing)
            .filter(|e| e.target() == t)
            .map(|e| (e.id(), e.weight()))
            .collect();
        found.sort_by_key(|(idx, _)| *idx);
        found.into_iter().map(|(_, w)| w).collect()
    }

    /// Returns the underlying [`StableDiGraph`] for traversal by renderers.
    pub fn graph(&self) -> &StableDiGraph<DiffNode, DiffEdge> {
        &self.graph
    }

    /// Counts nodes and edges per mark.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for node in self.nodes() {
            summary.nodes.bump(node.mark);
        }
        for edge in self.graph.edge_indices().filter_map(|e| self.graph.edge_weight(e)) {
            summary.edges.bump(edge.mark);
        }
        summary
    }
}

#[derive(Serialize)]
struct SerializedGraph<'a> {
    nodes: Vec<&'a DiffNode>,
    edges: Vec<EdgeView<'a>>,
}

impl Serialize for DiffGraph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SerializedGraph {
            nodes: self.nodes().collect(),
            edges: self.edges().collect(),
        }
        .serialize(serializer)
    }
}
