//! Positional lookup tables for the gold graph.
//!
//! [`build_tables`] re-keys a gold graph's triples by node position instead of
//! variable name, so gold structure can be addressed through the integer
//! indices that a [`crate::Correspondence`] carries.
//!
//! # Construction
//!
//! 1. Each instance triple gets a 0-based index in encounter order; the
//!    variable → index mapping is kept only for the duration of the build.
//! 2. Attribute triples are grouped by `(index, constant)`.
//! 3. Relation triples are grouped by `(source index, target index)`.
//!
//! Parallel labels on the same key collapse into one [`LabelSet`].
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::DiffError;
use crate::triples::AmrTriples;

/// Relation labels that share a key.
pub type LabelSet = BTreeSet<String>;

/// Gold graph content keyed by node position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GoldTables {
    /// Gold node index → concept label.
    #[serde(with = "crate::serde_helpers::entries")]
    pub instances: BTreeMap<usize, String>,
    /// `(gold node index, constant)` → attribute relation labels.
    #[serde(with = "crate::serde_helpers::entries")]
    pub attributes: BTreeMap<(usize, String), LabelSet>,
    /// `(source index, target index)` → relation labels.
    #[serde(with = "crate::serde_helpers::entries")]
    pub relations: BTreeMap<(usize, usize), LabelSet>,
}

impl GoldTables {
    /// Number of gold nodes.
    pub fn node_count(&self) -> usize {
        self.instances.len()
    }

    /// Concept label of gold node `index`.
    pub fn concept(&self, index: usize) -> Option<&str> {
        self.instances.get(&index).map(String::as_str)
    }

    /// Attribute labels recorded for `(index, constant)`, if the pair exists.
    pub fn attribute_labels(&self, index: usize, constant: &str) -> Option<&LabelSet> {
        self.attributes.get(&(index, constant.to_owned()))
    }

    /// Relation labels recorded between two gold nodes, if the pair exists.
    pub fn relation_labels(&self, source: usize, target: usize) -> Option<&LabelSet> {
        self.relations.get(&(source, target))
    }
}

/// Builds [`GoldTables`] from a gold graph's triples.
///
/// # Errors
///
/// Returns [`DiffError::UnknownVariable`] if an attribute or relation triple
/// references a variable that no instance triple declared.
pub fn build_tables(gold: &AmrTriples) -> Result<GoldTables, DiffError> {
    let mut node_index: HashMap<&str, usize> = HashMap::with_capacity(gold.instances.len());
    let mut tables = GoldTables::default();

    for (index, inst) in gold.instances.iter().enumerate() {
        node_index.insert(inst.variable.as_str(), index);
        tables.instances.insert(index, inst.concept.clone());
    }

    let resolve = |variable: &str| -> Result<usize, DiffError> {
        node_index
            .get(variable)
            .copied()
            .ok_or_else(|| DiffError::UnknownVariable {
                side: "gold",
                variable: variable.to_owned(),
            })
    };

    for attr in &gold.attributes {
        let index = resolve(&attr.variable)?;
        tables
            .attributes
            .entry((index, attr.constant.clone()))
            .or_default()
            .insert(attr.relation.clone());
    }

    for rel in &gold.relations {
        let key = (resolve(&rel.source)?, resolve(&rel.target)?);
        tables
            .relations
            .entry(key)
            .or_default()
            .insert(rel.relation.clone());
    }

    tracing::debug!(
        nodes = tables.instances.len(),
        attribute_keys = tables.attributes.len(),
        relation_keys = tables.relations.len(),
        "built gold tables"
    );

    Ok(tables)
}
