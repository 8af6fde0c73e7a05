/// Serde helpers for maps whose keys are not strings.
///
/// The gold tables are keyed by tuples such as `(usize, String)`, which JSON
/// cannot use as object keys. [`entries`] (de)serializes a `BTreeMap<K, V>`
/// as a sequence of `[key, value]` pairs instead:
///
/// | Rust                                   | JSON                          |
/// |----------------------------------------|-------------------------------|
/// | `{(0, "-"): {"polarity"}}`             | `[[[0, "-"], ["polarity"]]]`  |
///
/// Use with `#[serde(with = "crate::serde_helpers::entries")]`.
pub mod entries {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serializes the map as an ordered sequence of `(key, value)` pairs.
    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    /// Rebuilds the map from a sequence of `(key, value)` pairs. Later
    /// duplicates overwrite earlier ones.
    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let pairs: Vec<(K, V)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
