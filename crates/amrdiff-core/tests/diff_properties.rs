//! Property-based tests for diff-graph construction.
//!
//! Generates small test/gold graph pairs (1-6 nodes each) from shared concept,
//! label and constant pools together with an arbitrary correspondence, and
//! checks the structural guarantees every diff graph must satisfy.
#![allow(clippy::expect_used)]

use std::collections::HashSet;

use amrdiff_core::{
    AmrTriples, AttributeTriple, Correspondence, DEFAULT_ROOT_MARKER, DiffGraph, IdentityRelabel,
    InstanceTriple, Mark, RelationTriple, build_tables, diff_graph,
};
use proptest::prelude::*;

const CONCEPTS: &[&str] = &["dog", "cat", "want-01", "go-01"];
const RELATIONS: &[&str] = &["ARG0", "ARG1", "mod"];
const ATTRIBUTES: &[&str] = &["polarity", "quant", "mode"];
const CONSTANTS: &[&str] = &["-", "1", "2"];
/// Root-marker constants never collide with ordinary attribute constants, so
/// a node id mentioning one can only come from a root marker.
const ROOT_CONSTANTS: &[&str] = &["ROOTA", "ROOTB"];

/// A raw attribute: owner position, label position (`None` for the root
/// marker), constant position.
type RawAttribute = (usize, Option<usize>, usize);

fn build_amr(
    prefix: &str,
    concepts: &[usize],
    attributes: &[RawAttribute],
    relations: &[(usize, usize, usize)],
) -> AmrTriples {
    let var = |i: usize| format!("{prefix}{i}");
    AmrTriples {
        instances: concepts
            .iter()
            .enumerate()
            .map(|(i, &c)| InstanceTriple::new(var(i), CONCEPTS[c]))
            .collect(),
        attributes: attributes
            .iter()
            .map(|&(owner, label, constant)| match label {
                Some(l) => AttributeTriple::new(ATTRIBUTES[l], var(owner), CONSTANTS[constant]),
                None => AttributeTriple::new(
                    DEFAULT_ROOT_MARKER,
                    var(owner),
                    ROOT_CONSTANTS[constant % ROOT_CONSTANTS.len()],
                ),
            })
            .collect(),
        relations: relations
            .iter()
            .map(|&(s, t, l)| RelationTriple::new(RELATIONS[l], var(s), var(t)))
            .collect(),
    }
}

/// Strategy: one graph with `prefix`-named variables.
fn arb_amr(prefix: &'static str) -> impl Strategy<Value = AmrTriples> {
    (1usize..=6)
        .prop_flat_map(|n| {
            let concepts = prop::collection::vec(0..CONCEPTS.len(), n);
            let attributes = prop::collection::vec(
                (
                    0..n,
                    prop::option::of(0..ATTRIBUTES.len()),
                    0..CONSTANTS.len(),
                ),
                0..=6,
            );
            let relations =
                prop::collection::vec((0..n, 0..n, 0..RELATIONS.len()), 0..=8);
            (concepts, attributes, relations)
        })
        .prop_map(move |(concepts, attributes, relations)| {
            build_amr(prefix, &concepts, &attributes, &relations)
        })
}

/// Strategy: a test graph, a gold graph and a correspondence between them.
fn arb_case() -> impl Strategy<Value = (AmrTriples, AmrTriples, Correspondence)> {
    (arb_amr("a"), arb_amr("g")).prop_flat_map(|(test, gold)| {
        let gold_len = i64::try_from(gold.instances.len()).expect("small graph");
        let entries = prop::collection::vec(-1..gold_len, test.instances.len());
        (Just(test), Just(gold), entries.prop_map(Correspondence::from))
    })
}

fn run(test: &AmrTriples, gold: &AmrTriples, m: &Correspondence) -> DiffGraph {
    diff_graph(test, gold, m, IdentityRelabel).expect("diff must succeed")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every test instance becomes exactly one node, never marked gold.
    #[test]
    fn one_node_per_test_instance((test, gold, m) in arb_case()) {
        let g = run(&test, &gold, &m);
        for (inst, entry) in test.instances.iter().zip(m.iter()) {
            let node = g.node(&inst.variable).expect("test node present");
            prop_assert_ne!(node.mark, Mark::Gold);
            let agrees = entry
                .and_then(|i| gold.instances.get(i))
                .is_some_and(|gi| gi.concept == inst.concept);
            prop_assert_eq!(node.mark == Mark::Agree, agrees);
        }
    }

    /// A gold node is overlaid exactly when no test instance claimed it.
    #[test]
    fn unclaimed_gold_nodes_are_overlaid((test, gold, m) in arb_case()) {
        let g = run(&test, &gold, &m);
        let claimed: HashSet<usize> = m.iter().flatten().collect();
        for (index, inst) in gold.instances.iter().enumerate() {
            let id = format!("GOLD {index}");
            match g.node(&id) {
                Some(node) => {
                    prop_assert!(!claimed.contains(&index));
                    prop_assert_eq!(node.mark, Mark::Gold);
                    prop_assert_eq!(&node.label, &inst.concept);
                }
                None => prop_assert!(claimed.contains(&index)),
            }
        }
    }

    /// Root markers are self-loops and never create constant nodes.
    #[test]
    fn root_marker_creates_no_constant_node((test, gold, m) in arb_case()) {
        let g = run(&test, &gold, &m);
        prop_assert!(g.nodes().all(|n| !n.id.contains("ROOT")));
        for edge in g.edges().filter(|e| e.label == DEFAULT_ROOT_MARKER) {
            prop_assert_eq!(edge.source, edge.target);
        }
    }

    /// Every test triple contributes exactly one non-gold edge; the overlay
    /// only adds gold edges.
    #[test]
    fn test_edges_are_preserved((test, gold, m) in arb_case()) {
        let g = run(&test, &gold, &m);
        let non_gold = g.edges().filter(|e| e.mark != Mark::Gold).count();
        prop_assert_eq!(non_gold, test.attributes.len() + test.relations.len());
    }

    /// Running the same diff twice yields the same serialized graph.
    #[test]
    fn diff_is_deterministic((test, gold, m) in arb_case()) {
        let first = serde_json::to_string(&run(&test, &gold, &m)).expect("serialize");
        let second = serde_json::to_string(&run(&test, &gold, &m)).expect("serialize");
        prop_assert_eq!(first, second);
    }

    /// Diffing a graph against itself under the identity correspondence
    /// marks nothing as disagreeing.
    #[test]
    fn self_diff_is_clean(amr in arb_amr("a")) {
        let identity: Vec<i64> = (0..amr.instances.len())
            .map(|i| i64::try_from(i).expect("small graph"))
            .collect();
        let g = run(&amr, &amr, &Correspondence::from(identity));
        prop_assert!(g.summary().is_clean(), "summary: {:?}", g.summary());
    }

    /// Table building is a pure function of the gold triples.
    #[test]
    fn build_tables_is_idempotent(gold in arb_amr("g")) {
        let first = build_tables(&gold).expect("tables");
        let second = build_tables(&gold).expect("tables");
        prop_assert_eq!(first, second);
    }
}
