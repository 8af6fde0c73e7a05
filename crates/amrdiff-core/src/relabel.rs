//! Constant relabeling: which gold constant a test constant should be
//! compared against.
//!
//! The heuristic that picks the best gold counterpart lives outside this
//! crate. The diff only needs a deterministic `constant -> constant` map,
//! expressed as the [`ConstantRelabel`] trait.
use std::collections::HashMap;

/// Maps a test-side constant to the gold constant used for lookup.
///
/// Implementations must be deterministic for the duration of one diff.
pub trait ConstantRelabel {
    /// Returns the gold-equivalent spelling of `constant`.
    fn relabel(&self, constant: &str) -> String;
}

impl<F> ConstantRelabel for F
where
    F: Fn(&str) -> String,
{
    fn relabel(&self, constant: &str) -> String {
        self(constant)
    }
}

/// Compares every constant as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityRelabel;

impl ConstantRelabel for IdentityRelabel {
    fn relabel(&self, constant: &str) -> String {
        constant.to_owned()
    }
}

/// Relabels through a fixed lookup table, falling back to the constant
/// itself when it has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRelabel {
    map: HashMap<String, String>,
}

impl TableRelabel {
    /// Creates a relabeler from `test constant -> gold constant` pairs.
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    /// Number of explicit mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no mappings are configured.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, String)> for TableRelabel {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ConstantRelabel for TableRelabel {
    fn relabel(&self, constant: &str) -> String {
        self.map
            .get(constant)
            .cloned()
            .unwrap_or_else(|| constant.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input() {
        assert_eq!(IdentityRelabel.relabel("Bob"), "Bob");
    }

    #[test]
    fn table_maps_known_and_passes_through_unknown() {
        let r: TableRelabel = [("Bob".to_owned(), "Robert".to_owned())]
            .into_iter()
            .collect();
        assert_eq!(r.relabel("Bob"), "Robert");
        assert_eq!(r.relabel("Alice"), "Alice");
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn closures_are_relabelers() {
        let upper = |c: &str| c.to_uppercase();
        assert_eq!(upper.relabel("bob"), "BOB");
    }
}
