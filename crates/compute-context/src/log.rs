// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Values logged per compute context.
//!
//! Evaluators record values under the identity of the context that produced
//! them; inspectors later rebuild (or derive) the same identity and look the
//! values up. Parallel evaluation keeps one log per worker and merges them
//! afterwards, so the log itself needs no locking.
//!
//! # Determinism
//!
//! Lookups are by identity only. The one iteration API,
//! [`ContextValueLog::iter_sorted`], orders entries by identity so output never
//! depends on hash-map layout.
use crate::{ComputeContext, ComputeContextHash, ContextHashMap, ContextPayload};

/// Storage port for values keyed by compute-context identity.
///
/// Identity collisions are not detected: values of colliding contexts end up
/// in the same entry.
pub trait ContextRegistry<V> {
    /// Appends `value` to the entry of `hash`.
    fn record(&mut self, hash: ComputeContextHash, value: V);

    /// Values recorded for `hash`, oldest first. Empty when nothing was logged.
    fn lookup(&self, hash: &ComputeContextHash) -> &[V];

    /// Returns `true` if at least one value was recorded for `hash`.
    fn contains(&self, hash: &ComputeContextHash) -> bool {
        !self.lookup(hash).is_empty()
    }
}

/// In-memory [`ContextRegistry`] bucketed by the `v1` half of the identity.
#[derive(Debug, Clone)]
pub struct ContextValueLog<V> {
    entries: ContextHashMap<Vec<V>>,
    len: usize,
}

impl<V> Default for ContextValueLog<V> {
    fn default() -> Self {
        Self {
            entries: ContextHashMap::default(),
            len: 0,
        }
    }
}

impl<V> ContextValueLog<V> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under `hash`.
    pub fn log(&mut self, hash: ComputeContextHash, value: V) {
        self.entries.entry(hash).or_default().push(value);
        self.len += 1;
    }

    /// Records `value` under the identity of `context`.
    pub fn log_in<P>(&mut self, context: &ComputeContext<'_, P>, value: V)
    where
        P: ContextPayload + ?Sized,
    {
        self.log(context.hash(), value);
    }

    /// Values recorded for `hash`, oldest first.
    pub fn values(&self, hash: &ComputeContextHash) -> &[V] {
        self.entries
            .get(hash)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Values recorded for `context`, oldest first.
    pub fn values_in<P>(&self, context: &ComputeContext<'_, P>) -> &[V]
    where
        P: ContextPayload + ?Sized,
    {
        self.values(&context.hash())
    }

    /// Number of distinct identities with at least one value.
    pub fn context_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of recorded values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries ordered by identity.
    pub fn iter_sorted(&self) -> Vec<(ComputeContextHash, &[V])> {
        let mut out: Vec<(ComputeContextHash, &[V])> = self
            .entries
            .iter()
            .map(|(hash, values)| (*hash, values.as_slice()))
            .collect();
        out.sort_unstable_by_key(|(hash, _)| *hash);
        out
    }

    /// Moves every value of `other` into `self`.
    ///
    /// Per identity, values of `self` stay ahead of those of `other`. Merging
    /// worker logs in a fixed worker order therefore gives a deterministic
    /// result.
    pub fn merge(&mut self, other: Self) {
        self.len += other.len;
        for (hash, mut values) in other.entries {
            self.entries.entry(hash).or_default().append(&mut values);
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
    }
}

impl<V> ContextRegistry<V> for ContextValueLog<V> {
    fn record(&mut self, hash: ComputeContextHash, value: V) {
        self.log(hash, value);
    }

    fn lookup(&self, hash: &ComputeContextHash) -> &[V] {
        self.values(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupNodeContext, NamedContext};

    #[test]
    fn values_are_found_by_rebuilt_context() {
        let mut log = ContextValueLog::new();
        {
            let root = ComputeContext::root(NamedContext::new("scene"));
            let group = ComputeContext::child(&root, GroupNodeContext::new(1, 0));
            log.log_in(&group, 1.5_f32);
            log.log_in(&group, 2.5_f32);
            log.log_in(&root, 0.0_f32);
        }
        // Evaluation frames are gone; rebuild the same path to inspect.
        let root = ComputeContext::root(NamedContext::new("scene"));
        let group = ComputeContext::child(&root, GroupNodeContext::new(1, 0));
        assert_eq!(log.values_in(&group), &[1.5, 2.5]);
        assert_eq!(log.values_in(&root), &[0.0]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.context_count(), 2);

        let other = ComputeContext::child(&root, GroupNodeContext::new(1, 1));
        assert!(log.values_in(&other).is_empty());
        assert!(!log.contains(&other.hash()));
    }

    #[test]
    fn colliding_bucket_keys_keep_separate_entries() {
        let a = ComputeContextHash::from_parts(99, 1);
        let b = ComputeContextHash::from_parts(99, 2);
        let mut log = ContextValueLog::new();
        log.record(a, "a");
        log.record(b, "b");
        assert_eq!(log.lookup(&a), &["a"]);
        assert_eq!(log.lookup(&b), &["b"]);
    }

    #[test]
    fn merge_appends_in_order() {
        let h = ComputeContextHash::default().mixed(b"x");
        let g = ComputeContextHash::default().mixed(b"y");
        let mut first = ContextValueLog::new();
        first.log(h, 1);
        let mut second = ContextValueLog::new();
        second.log(h, 2);
        second.log(g, 3);

        first.merge(second);
        assert_eq!(first.values(&h), &[1, 2]);
        assert_eq!(first.values(&g), &[3]);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn iter_sorted_orders_by_identity() {
        let mut log = ContextValueLog::new();
        for i in 0..16u32 {
            log.log(ComputeContextHash::default().mixed(&i.to_le_bytes()), i);
        }
        let sorted = log.iter_sorted();
        assert_eq!(sorted.len(), 16);
        assert!(sorted.windows(2).all(|w| w[0].0 < w[1].0));
        log.clear();
        assert!(log.is_empty());
        assert!(log.iter_sorted().is_empty());
    }
}
