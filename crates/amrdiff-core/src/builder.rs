/// Diff-graph construction: merges a test graph and a gold graph into one
/// annotated [`DiffGraph`] given a node [`Correspondence`].
///
/// # Phases
///
/// 1. **Nodes** ([`DiffBuilder::resolve_nodes`]): one node per test
///    instance; matched gold instances are claimed. Produces the
///    [`GoldIndexMap`] the edge phases need.
/// 2. **Attributes**: test attribute edges are compared against the gold
///    attribute table after constant relabeling; matched labels are claimed.
/// 3. **Relations**: test relation edges are compared against the gold
///    relation table; matched labels are claimed.
/// 4. **Gold overlay**: every gold label still pending is added as a
///    [`Mark::Gold`] element.
///
/// Phases 2-4 run in [`EdgePass::resolve_edges`], which can only be reached
/// through the value returned by phase 1.
///
/// # Root marker
///
/// The root-marker relation (`TOP` by default) is drawn as a self-loop on its
/// node instead of an edge to a constant node. Gold often records the root
/// with a different constant than test does, so when the exact
/// `(node, constant)` pair is missing from gold, any pending root marker on
/// the same gold node is accepted instead.
use std::collections::{BTreeMap, HashMap};

use petgraph::stable_graph::NodeIndex;

use crate::correspondence::Correspondence;
use crate::error::DiffError;
use crate::graph::{DiffGraph, Mark};
use crate::pending::PendingLabels;
use crate::relabel::ConstantRelabel;
use crate::tables::{GoldTables, build_tables};
use crate::triples::AmrTriples;

/// Relation label that marks the root of a graph.
pub const DEFAULT_ROOT_MARKER: &str = "TOP";

/// Tunables for a diff run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    /// Attribute relation label treated as the root marker.
    ///
    /// Default: [`DEFAULT_ROOT_MARKER`].
    pub root_marker: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            root_marker: DEFAULT_ROOT_MARKER.to_owned(),
        }
    }
}

/// Target of a pending gold relation.
///
/// Gold relations always point at a node. An attribute whose constant turns
/// out to exist in test under a different relation label is promoted to a
/// relation whose target is that constant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoldEndpoint {
    /// A gold node index.
    Node(usize),
    /// A gold constant promoted to node status.
    Constant(String),
}

/// Test identifier → gold counterpart, as established by the node phase.
///
/// Only [`DiffBuilder::resolve_nodes`] creates one; the edge phases extend it
/// with promoted constants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoldIndexMap {
    variables: HashMap<String, Option<usize>>,
    constants: HashMap<String, String>,
}

impl GoldIndexMap {
    /// Gold index of test variable `variable`.
    ///
    /// Returns `None` if the variable is unknown and `Some(None)` if it is
    /// known but has no gold counterpart.
    pub fn get(&self, variable: &str) -> Option<Option<usize>> {
        self.variables.get(variable).copied()
    }

    /// Gold constant a promoted test constant corresponds to.
    pub fn constant(&self, constant: &str) -> Option<&str> {
        self.constants.get(constant).map(String::as_str)
    }

    /// Number of known test variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if no variables are known.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn resolve(&self, variable: &str) -> Result<Option<usize>, DiffError> {
        self.get(variable).ok_or_else(|| DiffError::UnknownVariable {
            side: "test",
            variable: variable.to_owned(),
        })
    }
}

/// Gold content not yet claimed by a test element.
#[derive(Debug, Clone)]
struct Pending {
    instances: PendingLabels<usize>,
    attributes: PendingLabels<(usize, String)>,
    relations: PendingLabels<(usize, GoldEndpoint)>,
}

impl Pending {
    fn from_tables(gold: &GoldTables) -> Self {
        let mut instances = PendingLabels::new();
        for (&index, concept) in &gold.instances {
            instances.insert(index, concept.clone());
        }
        let mut relations = PendingLabels::new();
        for ((source, target), labels) in &gold.relations {
            for label in labels {
                relations.insert((*source, GoldEndpoint::Node(*target)), label.clone());
            }
        }
        Self {
            instances,
            attributes: PendingLabels::from_sets(&gold.attributes),
            relations,
        }
    }
}

/// Single-use builder for one diff run.
///
/// Owns a private copy of the gold tables as pending state, which the phases
/// consume.
#[derive(Debug)]
pub struct DiffBuilder<'a, R> {
    test: &'a AmrTriples,
    gold: GoldTables,
    correspondence: &'a Correspondence,
    relabel: R,
    config: DiffConfig,
    pending: Pending,
    graph: DiffGraph,
}

impl<'a, R: ConstantRelabel> DiffBuilder<'a, R> {
    /// Creates a builder from raw gold triples.
    ///
    /// # Errors
    ///
    /// - [`DiffError::UnknownVariable`] if the gold triples are malformed.
    /// - [`DiffError::CorrespondenceLength`] / [`DiffError::GoldIndexOutOfRange`]
    ///   if the correspondence does not fit the two graphs.
    pub fn new(
        test: &'a AmrTriples,
        gold: &AmrTriples,
        correspondence: &'a Correspondence,
        relabel: R,
    ) -> Result<Self, DiffError> {
        Self::from_tables(test, build_tables(gold)?, correspondence, relabel)
    }

    /// Creates a builder from precomputed gold tables.
    ///
    /// # Errors
    ///
    /// [`DiffError::CorrespondenceLength`] or [`DiffError::GoldIndexOutOfRange`]
    /// if the correspondence does not fit the two graphs.
    pub fn from_tables(
        test: &'a AmrTriples,
        gold: GoldTables,
        correspondence: &'a Correspondence,
        relabel: R,
    ) -> Result<Self, DiffError> {
        if correspondence.len() != test.instances.len() {
            return Err(DiffError::CorrespondenceLength {
                expected: test.instances.len(),
                actual: correspondence.len(),
            });
        }
        for (inst, entry) in test.instances.iter().zip(correspondence.iter()) {
            if let Some(index) = entry {
                if !gold.instances.contains_key(&index) {
                    return Err(DiffError::GoldIndexOutOfRange {
                        variable: inst.variable.clone(),
                        index,
                        gold_len: gold.node_count(),
                    });
                }
            }
        }

        let pending = Pending::from_tables(&gold);
        Ok(Self {
            test,
            gold,
            correspondence,
            relabel,
            config: DiffConfig::default(),
            pending,
            graph: DiffGraph::new(),
        })
    }

    /// Replaces the default [`DiffConfig`].
    #[must_use]
    pub fn with_config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs every phase and returns the finished graph.
    ///
    /// # Errors
    ///
    /// See [`EdgePass::resolve_edges`].
    pub fn build(self) -> Result<DiffGraph, DiffError> {
        let (edges, mut index_map) = self.resolve_nodes();
        edges.resolve_edges(&mut index_map)
    }

    /// Phase 1: adds one node per test instance and claims matched gold
    /// instances.
    pub fn resolve_nodes(mut self) -> (EdgePass<'a, R>, GoldIndexMap) {
        let mut index_map = GoldIndexMap::default();
        let test = self.test;
        let correspondence = self.correspondence;

        for (inst, entry) in test.instances.iter().zip(correspondence.iter()) {
            index_map.variables.insert(inst.variable.clone(), entry);

            let Some(index) = entry else {
                self.graph
                    .set_node(&inst.variable, inst.concept.clone(), Mark::Test);
                continue;
            };

            let (label, mark) = match self.gold.concept(index) {
                Some(gold_concept) if gold_concept != inst.concept => {
                    (format!("{} ({gold_concept})", inst.concept), Mark::Test)
                }
                Some(_) | None => (inst.concept.clone(), Mark::Agree),
            };
            self.graph.set_node(&inst.variable, label, mark);
            if self.pending.instances.claim_all(&index) {
                tracing::trace!(variable = %inst.variable, index, "claimed gold node");
            }
        }

        tracing::debug!(
            nodes = self.graph.node_count(),
            unclaimed = self.pending.instances.pending_len(),
            "resolved nodes"
        );

        (EdgePass { builder: self }, index_map)
    }
}

/// The edge phases of a diff run, reachable only after
/// [`DiffBuilder::resolve_nodes`].
#[derive(Debug)]
pub struct EdgePass<'a, R> {
    builder: DiffBuilder<'a, R>,
}

impl<R: ConstantRelabel> EdgePass<'_, R> {
    /// Phases 2-4: attribute edges, relation edges, then the gold overlay.
    ///
    /// `index_map` gains an entry for every test constant whose gold
    /// attribute was promoted to a relation.
    ///
    /// # Errors
    ///
    /// - [`DiffError::UnknownVariable`] if a test attribute or relation names
    ///   a variable no test instance declared.
    /// - [`DiffError::UnknownGoldIndex`] if precomputed gold tables reference
    ///   a node index that has no instance entry.
    pub fn resolve_edges(self, index_map: &mut GoldIndexMap) -> Result<DiffGraph, DiffError> {
        let mut b = self.builder;
        let mut promoted: HashMap<(usize, String), NodeIndex> = HashMap::new();

        b.resolve_attributes(index_map, &mut promoted)?;
        b.resolve_relations(index_map)?;
        b.overlay_gold(index_map, &promoted)?;

        let summary = b.graph.summary();
        tracing::debug!(
            nodes = b.graph.node_count(),
            edges = b.graph.edge_count(),
            test_nodes = summary.nodes.test,
            gold_nodes = summary.nodes.gold,
            test_edges = summary.edges.test,
            gold_edges = summary.edges.gold,
            "built diff graph"
        );
        Ok(b.graph)
    }
}

impl<R: ConstantRelabel> DiffBuilder<'_, R> {
    /// Resolves a test variable to its gold index and its node in the graph.
    fn endpoint(
        &self,
        index_map: &GoldIndexMap,
        variable: &str,
    ) -> Result<(Option<usize>, NodeIndex), DiffError> {
        let gold = index_map.resolve(variable)?;
        let node = self
            .graph
            .node_index(variable)
            .ok_or_else(|| DiffError::UnknownVariable {
                side: "test",
                variable: variable.to_owned(),
            })?;
        Ok((gold, node))
    }

    /// Phase 2.
    fn resolve_attributes(
        &mut self,
        index_map: &mut GoldIndexMap,
        promoted: &mut HashMap<(usize, String), NodeIndex>,
    ) -> Result<(), DiffError> {
        let test = self.test;

        for attr in &test.attributes {
            let (owner, owner_node) = self.endpoint(index_map, &attr.variable)?;
            let gold_constant = self.relabel.relabel(&attr.constant);
            let gold_labels =
                owner.and_then(|index| self.gold.attribute_labels(index, &gold_constant));
            let pair_found = gold_labels.is_some();
            let relation_known =
                gold_labels.is_some_and(|labels| labels.contains(&attr.relation));

            let mut label = attr.constant.clone();
            let mut promote_from = None;
            let mut mark = match owner.filter(|_| pair_found) {
                Some(index) => {
                    if attr.constant != gold_constant {
                        label = format!("{} ({gold_constant})", attr.constant);
                    }
                    let key = (index, gold_constant.clone());
                    if relation_known {
                        self.claim_attribute(key, &attr.relation);
                        Mark::Agree
                    } else {
                        self.promote(key, index_map, &attr.constant);
                        promote_from = Some(index);
                        Mark::Test
                    }
                }
                None => Mark::Test,
            };

            if attr.relation == self.config.root_marker {
                if !pair_found {
                    if let Some(index) = owner {
                        mark = self.repair_root(index, mark);
                    }
                }
                self.graph
                    .add_edge(owner_node, owner_node, &attr.relation, mark);
                continue;
            }

            let constant_id = format!("{} {}", attr.variable, attr.constant);
            let constant_node = self.graph.set_node(&constant_id, label, mark);
            self.graph
                .add_edge(owner_node, constant_node, &attr.relation, mark);
            if let Some(index) = promote_from {
                promoted.insert((index, gold_constant), constant_node);
            }
        }

        tracing::debug!(
            attributes = test.attributes.len(),
            unclaimed = self.pending.attributes.pending_len(),
            "resolved attribute edges"
        );
        Ok(())
    }

    /// Claims `relation` on the gold attribute `key`, following it into the
    /// relation table if an earlier test attribute promoted it there.
    fn claim_attribute(&mut self, key: (usize, String), relation: &str) {
        if self.pending.attributes.claim(&key, relation) {
            return;
        }
        let (index, gold_constant) = key;
        let promoted = (index, GoldEndpoint::Constant(gold_constant));
        if !self.pending.relations.claim(&promoted, relation) {
            tracing::trace!(key = ?promoted, relation, "attribute already claimed");
        }
    }

    /// Moves the pending attribute entry `key` into the relation table: the
    /// constant matched a test constant, only the relation label disagreed.
    fn promote(
        &mut self,
        key: (usize, String),
        index_map: &mut GoldIndexMap,
        test_constant: &str,
    ) {
        let (index, gold_constant) = key;
        let taken = self
            .pending
            .attributes
            .take_pending(&(index, gold_constant.clone()))
            .unwrap_or_default();
        for label in taken {
            self.pending
                .relations
                .insert((index, GoldEndpoint::Constant(gold_constant.clone())), label);
        }
        if !index_map.variables.contains_key(test_constant) {
            index_map
                .constants
                .insert(test_constant.to_owned(), gold_constant);
        }
    }

    /// Accepts a pending root marker anywhere on gold node `index` in place
    /// of an exact `(node, constant)` match.
    fn repair_root(&mut self, index: usize, mark: Mark) -> Mark {
        let root = self.config.root_marker.as_str();
        let found = self
            .pending
            .attributes
            .find_pending(root, |(node, _)| *node == index)
            .cloned();
        match found {
            Some(key) => {
                if self.pending.attributes.claim(&key, root) {
                    tracing::trace!(index, constant = %key.1, "matched root marker on gold node");
                } else {
                    tracing::trace!(?key, relation = root, "root marker already claimed");
                }
                Mark::Agree
            }
            None => mark,
        }
    }

    /// Phase 3.
    fn resolve_relations(&mut self, index_map: &GoldIndexMap) -> Result<(), DiffError> {
        let test = self.test;

        for rel in &test.relations {
            let (source, source_node) = self.endpoint(index_map, &rel.source)?;
            let (target, target_node) = self.endpoint(index_map, &rel.target)?;

            let mark = match (source, target) {
                (Some(s), Some(t)) => match self.gold.relation_labels(s, t) {
                    Some(labels) if labels.contains(&rel.relation) => {
                        let key = (s, GoldEndpoint::Node(t));
                        if !self.pending.relations.claim(&key, &rel.relation) {
                            tracing::trace!(?key, relation = %rel.relation, "relation already claimed");
                        }
                        Mark::Agree
                    }
                    Some(_) | None => Mark::Test,
                },
                (Some(_), None) | (None, Some(_)) | (None, None) => Mark::Test,
            };
            self.graph
                .add_edge(source_node, target_node, &rel.relation, mark);
        }

        tracing::debug!(
            relations = test.relations.len(),
            unclaimed = self.pending.relations.pending_len(),
            "resolved relation edges"
        );
        Ok(())
    }

    /// Phase 4.
    fn overlay_gold(
        &mut self,
        index_map: &GoldIndexMap,
        promoted: &HashMap<(usize, String), NodeIndex>,
    ) -> Result<(), DiffError> {
        // Gold index -> graph node and its id. When several test variables
        // share a gold index the last one declared wins.
        let mut display_nodes: BTreeMap<usize, (NodeIndex, String)> = BTreeMap::new();
        for inst in &self.test.instances {
            if let Some(Some(index)) = index_map.get(&inst.variable) {
                if let Some(node) = self.graph.node_index(&inst.variable) {
                    display_nodes.insert(index, (node, inst.variable.clone()));
                }
            }
        }

        let nodes: Vec<(usize, String)> = self
            .pending
            .instances
            .pending()
            .map(|(&index, concept)| (index, concept.to_owned()))
            .collect();
        for (index, concept) in nodes {
            let id = format!("GOLD {index}");
            let node = self.graph.ensure_node(&id, concept, Mark::Gold);
            display_nodes.insert(index, (node, id));
        }

        let lookup = |index: usize| {
            display_nodes
                .get(&index)
                .cloned()
                .ok_or(DiffError::UnknownGoldIndex { index })
        };

        let attributes: Vec<((usize, String), String)> = self
            .pending
            .attributes
            .pending()
            .map(|(key, label)| (key.clone(), label.to_owned()))
            .collect();
        for ((index, constant), label) in attributes {
            let (owner, owner_id) = lookup(index)?;
            if label == self.config.root_marker {
                self.graph.add_edge(owner, owner, &label, Mark::Gold);
                continue;
            }
            let constant_node = self.constant_node(&owner_id, &constant);
            self.graph
                .add_edge(owner, constant_node, &label, Mark::Gold);
        }

        let relations: Vec<((usize, GoldEndpoint), String)> = self
            .pending
            .relations
            .pending()
            .map(|(key, label)| (key.clone(), label.to_owned()))
            .collect();
        for ((index, endpoint), label) in relations {
            let (source, source_id) = lookup(index)?;
            let target = match endpoint {
                GoldEndpoint::Node(target) => lookup(target)?.0,
                GoldEndpoint::Constant(constant) => match promoted.get(&(index, constant.clone())) {
                    Some(&node) => node,
                    None => self.constant_node(&source_id, &constant),
                },
            };
            self.graph.add_edge(source, target, &label, Mark::Gold);
        }

        tracing::debug!(
            nodes = display_nodes.len(),
            "overlaid unclaimed gold content"
        );
        Ok(())
    }

    /// Gold constant node hanging off the node `owner_id`, created if the
    /// graph does not already have it.
    fn constant_node(&mut self, owner_id: &str, constant: &str) -> NodeIndex {
        self.graph.ensure_node(
            &format!("{owner_id} {constant}"),
            constant.to_owned(),
            Mark::Gold,
        )
    }
}

/// Builds the diff graph for `test` against raw `gold` triples.
///
/// # Errors
///
/// See [`DiffBuilder::new`] and [`EdgePass::resolve_edges`].
pub fn diff_graph<R: ConstantRelabel>(
    test: &AmrTriples,
    gold: &AmrTriples,
    correspondence: &Correspondence,
    relabel: R,
) -> Result<DiffGraph, DiffError> {
    DiffBuilder::new(test, gold, correspondence, relabel)?.build()
}

/// Builds the diff graph for `test` against precomputed gold tables.
///
/// # Errors
///
/// See [`DiffBuilder::from_tables`] and [`EdgePass::resolve_edges`].
pub fn diff_graph_with_tables<R: ConstantRelabel>(
    test: &AmrTriples,
    gold: GoldTables,
    correspondence: &Correspondence,
    relabel: R,
) -> Result<DiffGraph, DiffError> {
    DiffBuilder::from_tables(test, gold, correspondence, relabel)?.build()
}
