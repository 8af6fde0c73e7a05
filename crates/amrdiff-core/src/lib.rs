#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod builder;
pub mod correspondence;
pub mod error;
pub mod graph;
pub mod pending;
pub mod relabel;
pub mod serde_helpers;
pub mod tables;
pub mod triples;

pub use builder::{
    DEFAULT_ROOT_MARKER, DiffBuilder, DiffConfig, EdgePass, GoldEndpoint, GoldIndexMap,
    diff_graph, diff_graph_with_tables,
};
pub use correspondence::Correspondence;
pub use error::DiffError;
pub use graph::{DiffEdge, DiffGraph, DiffNode, DiffSummary, EdgeView, Mark, MarkCounts};
pub use pending::PendingLabels;
pub use relabel::{ConstantRelabel, IdentityRelabel, TableRelabel};
pub use tables::{GoldTables, LabelSet, build_tables};
pub use triples::{AmrTriples, AttributeTriple, InstanceTriple, RelationTriple};

/// Returns the current version of the amrdiff-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }
}
