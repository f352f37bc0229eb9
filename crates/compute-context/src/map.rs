// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hash maps keyed by [`ComputeContextHash`].
//!
//! The identity's `Hash` impl feeds only `v1` to the hasher, so bucket
//! placement depends on `v1` alone; `Eq` on both halves resolves buckets
//! shared by colliding `v1` values.
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::ComputeContextHash;

/// `BuildHasher` used by [`ContextHashMap`] and [`ContextHashSet`].
pub type BuildContextHasher = FxBuildHasher;

/// `HashMap` bucketed by the `v1` half of the identity.
pub type ContextHashMap<V> = FxHashMap<ComputeContextHash, V>;

/// `HashSet` bucketed by the `v1` half of the identity.
pub type ContextHashSet = FxHashSet<ComputeContextHash>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::BuildHasher;

    #[test]
    fn bucket_key_depends_only_on_v1() {
        let build = BuildContextHasher::default();
        let a = ComputeContextHash::from_parts(0xdead_beef, 42);
        let b = ComputeContextHash::from_parts(0xdead_beef, 43);
        assert_eq!(build.hash_one(a), build.hash_one(b));
        assert_eq!(build.hash_one(a), build.hash_one(a.hash()));
        assert_ne!(
            build.hash_one(a),
            build.hash_one(ComputeContextHash::from_parts(0xdead_bef0, 42))
        );
    }

    #[test]
    fn colliding_v1_entries_stay_distinct() {
        let a = ComputeContextHash::from_parts(7, 1);
        let b = ComputeContextHash::from_parts(7, 2);
        assert_eq!(a.hash(), b.hash());
        assert_ne!(a, b);

        let mut map: ContextHashMap<&str> = ContextHashMap::default();
        map.insert(a, "a");
        map.insert(b, "b");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&a), Some(&"a"));
        assert_eq!(map.get(&b), Some(&"b"));
        assert_eq!(map.get(&ComputeContextHash::from_parts(7, 3)), None);
    }

    #[test]
    fn set_deduplicates_equal_identities() {
        let mut set = ContextHashSet::default();
        let h = ComputeContextHash::default().mixed(b"x");
        assert!(set.insert(h));
        assert!(!set.insert(h));
        assert_eq!(set.len(), 1);
    }
}
