//! Errors raised while building gold tables or a diff graph.
//!
//! Every variant describes malformed input: the algorithm itself has no
//! recoverable failure modes, so a diff either completes or returns one of
//! these without a partial graph.
use thiserror::Error;

/// All error conditions produced by `amrdiff-core`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// An attribute or relation triple names a variable that no instance
    /// triple declared.
    #[error("{side} triple references undeclared variable {variable:?}")]
    UnknownVariable {
        /// Which graph the triple came from (`"test"` or `"gold"`).
        side: &'static str,
        /// The unresolved variable name.
        variable: String,
    },

    /// The correspondence does not have exactly one entry per test instance.
    #[error("correspondence has {actual} entries but the test graph has {expected} instances")]
    CorrespondenceLength {
        /// Number of test instance triples.
        expected: usize,
        /// Number of correspondence entries supplied.
        actual: usize,
    },

    /// A correspondence entry points past the end of the gold instance table.
    #[error("test variable {variable:?} maps to gold index {index}, but gold has {gold_len} nodes")]
    GoldIndexOutOfRange {
        /// The test variable whose entry is out of range.
        variable: String,
        /// The offending gold index.
        index: usize,
        /// Number of gold instances.
        gold_len: usize,
    },

    /// A pending gold entry names a node index with no instance entry.
    ///
    /// Only reachable when precomputed gold tables are internally
    /// inconsistent.
    #[error("gold table entry references unknown gold node index {index}")]
    UnknownGoldIndex {
        /// The gold index that could not be resolved to a display id.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variable_message_names_side_and_variable() {
        let e = DiffError::UnknownVariable {
            side: "test",
            variable: "x9".to_owned(),
        };
        let msg = e.to_string();
        assert!(msg.contains("test"), "message: {msg}");
        assert!(msg.contains("\"x9\""), "message: {msg}");
    }

    #[test]
    fn correspondence_length_mentions_both_counts() {
        let e = DiffError::CorrespondenceLength {
            expected: 4,
            actual: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains('4') && msg.contains('3'), "message: {msg}");
    }

    #[test]
    fn out_of_range_mentions_gold_size() {
        let e = DiffError::GoldIndexOutOfRange {
            variable: "b".to_owned(),
            index: 7,
            gold_len: 2,
        };
        let msg = e.to_string();
        assert!(msg.contains("7"), "message: {msg}");
        assert!(msg.contains("2 nodes"), "message: {msg}");
    }

    #[test]
    fn error_trait_is_implemented() {
        let e: Box<dyn std::error::Error> = Box::new(DiffError::UnknownGoldIndex { index: 3 });
        assert!(!e.to_string().is_empty());
    }
}
