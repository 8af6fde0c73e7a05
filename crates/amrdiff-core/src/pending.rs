//! Claim-tracking tables for gold content not yet matched by the test graph.
//!
//! A [`PendingLabels`] table holds, for every key, the labels gold recorded
//! under it together with a claimed flag. Claiming never deletes: a claimed
//! label simply stops being reported by [`PendingLabels::pending`], so the
//! table can be inspected at any point of a diff run.
use std::collections::BTreeMap;

use crate::tables::LabelSet;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    label: String,
    claimed: bool,
}

/// Labels per key, each either pending or claimed.
///
/// Keys iterate in `Ord` order; labels within a key keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLabels<K: Ord> {
    entries: BTreeMap<K, Vec<Slot>>,
}

impl<K: Ord> Default for PendingLabels<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> PendingLabels<K> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table with every label pending.
    pub fn from_sets<'a, I>(sets: I) -> Self
    where
        I: IntoIterator<Item = (&'a K, &'a LabelSet)>,
        K: 'a,
    {
        let mut table = Self::new();
        for (key, labels) in sets {
            for label in labels {
                table.insert(key.clone(), label.clone());
            }
        }
        table
    }

    /// Adds `label` under `key` as pending.
    ///
    /// A label already present under the key (pending or claimed) is left
    /// untouched.
    pub fn insert(&mut self, key: K, label: String) {
        let slots = self.entries.entry(key).or_default();
        if !slots.iter().any(|s| s.label == label) {
            slots.push(Slot {
                label,
                claimed: false,
            });
        }
    }

    /// Claims `label` under `key`.
    ///
    /// Returns `true` if the label was pending and is now claimed, `false` if
    /// it was absent or already claimed.
    pub fn claim(&mut self, key: &K, label: &str) -> bool {
        let Some(slots) = self.entries.get_mut(key) else {
            return false;
        };
        match slots.iter_mut().find(|s| s.label == label && !s.claimed) {
            Some(slot) => {
                slot.claimed = true;
                true
            }
            None => false,
        }
    }

    /// Claims every pending label under `key`.
    ///
    /// Returns `true` if at least one label was claimed.
    pub fn claim_all(&mut self, key: &K) -> bool {
        !self.take_pending(key).unwrap_or_default().is_empty()
    }

    /// Claims every pending label under `key` and returns them.
    ///
    /// Returns `None` if the key was never present.
    pub fn take_pending(&mut self, key: &K) -> Option<Vec<String>> {
        let slots = self.entries.get_mut(key)?;
        let mut taken = Vec::new();
        for slot in slots.iter_mut().filter(|s| !s.claimed) {
            slot.claimed = true;
            taken.push(slot.label.clone());
        }
        Some(taken)
    }

    /// Returns `true` if `label` under `key` is still pending.
    pub fn is_pending(&self, key: &K, label: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|slots| slots.iter().any(|s| s.label == label && !s.claimed))
    }

    /// First key (in key order) accepted by `accept` that still has `label`
    /// pending.
    pub fn find_pending<F>(&self, label: &str, mut accept: F) -> Option<&K>
    where
        F: FnMut(&K) -> bool,
    {
        self.entries
            .iter()
            .find(|&(key, slots)| {
                accept(key) && slots.iter().any(|s| s.label == label && !s.claimed)
            })
            .map(|(key, _)| key)
    }

    /// Iterates over every pending `(key, label)` pair.
    pub fn pending(&self) -> impl Iterator<Item = (&K, &str)> {
        self.entries.iter().flat_map(|(key, slots)| {
            slots
                .iter()
                .filter(|s| !s.claimed)
                .map(move |s| (key, s.label.as_str()))
        })
    }

    /// Number of pending `(key, label)` pairs.
    pub fn pending_len(&self) -> usize {
        self.pending().count()
    }
}
