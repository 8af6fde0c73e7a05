//! Test-to-gold node correspondence produced by an external matcher.
//!
//! On the wire the correspondence is a list of signed integers, one per test
//! instance triple, where any negative value means "no gold counterpart".
//! Internally each entry is an `Option<usize>`.
use serde::{Deserialize, Serialize};

/// One gold node index (or `None`) per test instance, in test order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct Correspondence(Vec<Option<usize>>);

impl Correspondence {
    /// Wraps already-decoded entries.
    pub fn new(entries: Vec<Option<usize>>) -> Self {
        Self(entries)
    }

    /// Decodes a signed match array; negative entries become `None`.
    pub fn from_signed(entries: &[i64]) -> Self {
        Self(entries.iter().map(|&e| usize::try_from(e).ok()).collect())
    }

    /// Gold index for the test instance at `position`, if matched.
    pub fn get(&self, position: usize) -> Option<usize> {
        self.0.get(position).copied().flatten()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in test-instance order.
    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<i64>> for Correspondence {
    fn from(entries: Vec<i64>) -> Self {
        Self::from_signed(&entries)
    }
}

impl From<Correspondence> for Vec<i64> {
    fn from(c: Correspondence) -> Self {
        c.0.into_iter()
            .map(|e| e.map_or(-1, |i| i64::try_from(i).unwrap_or(i64::MAX)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn negative_entries_are_unmatched() {
        let c = Correspondence::from_signed(&[0, -1, 2, -7]);
        assert_eq!(c.get(0), Some(0));
        assert_eq!(c.get(1), None);
        assert_eq!(c.get(2), Some(2));
        assert_eq!(c.get(3), None);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn out_of_bounds_position_is_none() {
        let c = Correspondence::from_signed(&[1]);
        assert_eq!(c.get(5), None);
    }

    #[test]
    fn json_uses_minus_one_sentinel() {
        let c: Correspondence = serde_json::from_str("[1, -3, 0]").expect("parse");
        assert_eq!(c, Correspondence::new(vec![Some(1), None, Some(0)]));
        let back = serde_json::to_string(&c).expect("serialize");
        assert_eq!(back, "[1,-1,0]");
    }
}
