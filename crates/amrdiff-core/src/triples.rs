//! Triple representation of an AMR-style semantic graph.
//!
//! A graph is three flat lists: instance triples declare nodes, attribute
//! triples hang literal constants off nodes, and relation triples connect two
//! nodes. The order of `instances` is significant: it defines the positional
//! node index used by [`crate::tables`] and by the correspondence.
use serde::{Deserialize, Serialize};

/// Declares node `variable` with semantic concept `concept`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceTriple {
    /// Graph-level tag carried over from the triple extractor. Unused by the
    /// diff beyond enumeration order.
    #[serde(default = "default_graph_id")]
    pub graph_id: String,
    /// Node variable, e.g. `"a"` or `"b2"`.
    pub variable: String,
    /// Concept label, e.g. `"dog"` or `"want-01"`.
    pub concept: String,
}

fn default_graph_id() -> String {
    "instance".to_owned()
}

/// A labeled edge from a node to a literal constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeTriple {
    /// Relation label, e.g. `"polarity"` or `"TOP"`.
    pub relation: String,
    /// Variable of the owning node.
    pub variable: String,
    /// Literal value, e.g. `"-"` or `"Bob"`.
    pub constant: String,
}

/// A labeled edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationTriple {
    /// Relation label, e.g. `"ARG0"`.
    pub relation: String,
    /// Source variable.
    pub source: String,
    /// Target variable.
    pub target: String,
}

/// The full triple set of one graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmrTriples {
    /// Node declarations, in node-index order.
    #[serde(default)]
    pub instances: Vec<InstanceTriple>,
    /// Node → constant edges.
    #[serde(default)]
    pub attributes: Vec<AttributeTriple>,
    /// Node → node edges.
    #[serde(default)]
    pub relations: Vec<RelationTriple>,
}

impl InstanceTriple {
    /// Builds an instance triple with the default graph tag.
    pub fn new(variable: impl Into<String>, concept: impl Into<String>) -> Self {
        Self {
            graph_id: default_graph_id(),
            variable: variable.into(),
            concept: concept.into(),
        }
    }
}

impl AttributeTriple {
    /// Builds an attribute triple.
    pub fn new(
        relation: impl Into<String>,
        variable: impl Into<String>,
        constant: impl Into<String>,
    ) -> Self {
        Self {
            relation: relation.into(),
            variable: variable.into(),
            constant: constant.into(),
        }
    }
}

impl RelationTriple {
    /// Builds a relation triple.
    pub fn new(
        relation: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            relation: relation.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

impl AmrTriples {
    /// Returns `true` if the graph declares no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.attributes.is_empty() && self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn deserializes_without_graph_id() {
        let json = r#"{
            "instances": [{"variable": "a", "concept": "dog"}],
            "attributes": [{"relation": "TOP", "variable": "a", "constant": "dog"}],
            "relations": []
        }"#;
        let triples: AmrTriples = serde_json::from_str(json).expect("parse");
        assert_eq!(triples.instances, vec![InstanceTriple::new("a", "dog")]);
        assert_eq!(triples.instances[0].graph_id, "instance");
        assert_eq!(triples.attributes.len(), 1);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let triples: AmrTriples = serde_json::from_str("{}").expect("parse");
        assert!(triples.is_empty());
    }
}
