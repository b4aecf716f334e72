//! HashSymTable: bucket array of collision chains with prime-tiered growth.

use crate::alloc;
use crate::chain::{BindingKey, Bindings, Chain};
use crate::error::{AllocError, InsertError};
use crate::growth::GrowthSizes;
use crate::hash::hash_key;
use crate::symbol_table::SymbolTable;
use core::fmt;
use core::mem;
use log::{debug, trace, warn};

/// String-keyed symbol table backed by a growable bucket array.
///
/// The table starts at the first tier of its `GrowthSizes` and moves to the
/// next tier whenever an insert leaves more bindings than buckets. It never
/// shrinks.
pub struct HashSymTable<V> {
    buckets: Vec<Option<BindingKey>>,
    bindings: Bindings<V>,
    tier: usize,
    growth: GrowthSizes,
}

impl<V> HashSymTable<V> {
    /// Empty table on the default prime ladder.
    pub fn new() -> Self {
        Self::with_growth(GrowthSizes::default())
    }

    /// Like `new`, but reports a failed bucket-array allocation.
    pub fn try_new() -> Result<Self, AllocError> {
        Self::try_with_growth(GrowthSizes::default())
    }

    pub fn with_growth(growth: GrowthSizes) -> Self {
        Self {
            buckets: vec![None; growth.first()],
            bindings: Bindings::new(),
            tier: 0,
            growth,
        }
    }

    pub fn try_with_growth(growth: GrowthSizes) -> Result<Self, AllocError> {
        let buckets = alloc::bucket_array(growth.first())?;
        Ok(Self {
            buckets,
            bindings: Bindings::new(),
            tier: 0,
            growth,
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Index of the current tier in `growth_sizes()`.
    pub fn tier(&self) -> usize {
        self.tier
    }

    pub fn growth_sizes(&self) -> &GrowthSizes {
        &self.growth
    }

    #[inline]
    fn bucket_of(&self, key: &str) -> usize {
        hash_key(key, self.buckets.len())
    }

    fn find(&self, key: &str) -> Option<BindingKey> {
        self.bindings.find(self.buckets[self.bucket_of(key)], key)
    }

    pub fn try_put(&mut self, key: &str, value: V) -> Result<(), InsertError> {
        let idx = self.bucket_of(key);
        if self.bindings.find(self.buckets[idx], key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let owned = alloc::copy_key(key)?;
        self.bindings.push_front(&mut self.buckets[idx], owned, value);
        self.maybe_grow();
        Ok(())
    }

    pub fn put(&mut self, key: &str, value: V) -> bool {
        self.try_put(key, value).is_ok()
    }

    pub fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let k = self.find(key)?;
        let b = self.bindings.get_mut(k)?;
        Some(mem::replace(&mut b.value, value))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let k = self.find(key)?;
        self.bindings.get(k).map(|b| &b.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find(key)?;
        self.bindings.get_mut(k).map(|b| &mut b.value)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.bucket_of(key);
        self.bindings
            .unlink(&mut self.buckets[idx], key)
            .map(|b| b.value)
    }

    /// Visit bindings by ascending bucket, newest first within a bucket.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &V),
    {
        for &head in &self.buckets {
            for b in self.bindings.chain(head) {
                visit(&*b.key, &b.value);
            }
        }
    }

    pub fn for_each_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&str, &mut V),
    {
        for &head in &self.buckets {
            self.bindings.visit_mut(head, &mut visit);
        }
    }

    /// Bindings in `for_each` order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            bindings: &self.bindings,
            chain: self.bindings.chain(None),
            remaining: self.len(),
        }
    }

    /// Move to the next tier if the load factor exceeds one.
    ///
    /// A failed bucket-array allocation leaves the table at its current
    /// tier; the next insert tries again since the load is still too high.
    fn maybe_grow(&mut self) {
        if self.growth.is_last(self.tier) || self.len() <= self.buckets.len() {
            return;
        }
        let Some(new_count) = self.growth.get(self.tier + 1) else {
            return;
        };
        let fresh = match alloc::bucket_array(new_count) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "symtable: staying at {} buckets with {} bindings: {}",
                    self.buckets.len(),
                    self.len(),
                    e
                );
                return;
            }
        };
        let old = mem::replace(&mut self.buckets, fresh);
        for head in old.iter().copied() {
            let mut cur = head;
            while let Some(k) = cur {
                let Some(b) = self.bindings.get(k) else {
                    break;
                };
                cur = b.next;
                let idx = hash_key(&b.key, new_count);
                self.bindings.relink(k, &mut self.buckets[idx]);
            }
        }
        self.tier += 1;
        debug!(
            "symtable: grew {} -> {} buckets at {} bindings",
            old.len(),
            new_count,
            self.len()
        );
        if self.growth.is_last(self.tier) {
            trace!("symtable: largest tier reached ({} buckets)", new_count);
        }
    }

    /// Walk every bucket and check placement, uniqueness and the count.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut seen = std::collections::HashSet::new();
        for (i, &head) in self.buckets.iter().enumerate() {
            for b in self.bindings.chain(head) {
                assert_eq!(hash_key(&b.key, self.buckets.len()), i, "misplaced {:?}", b.key);
                assert!(seen.insert(b.key.to_string()), "duplicate {:?}", b.key);
            }
        }
        assert_eq!(seen.len(), self.len());
        assert_eq!(self.growth.get(self.tier), Some(self.buckets.len()));
    }
}

impl<V> Default for HashSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for HashSymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> SymbolTable<V> for HashSymTable<V> {
    fn len(&self) -> usize {
        HashSymTable::len(self)
    }
    fn try_put(&mut self, key: &str, value: V) -> Result<(), InsertError> {
        HashSymTable::try_put(self, key, value)
    }
    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        HashSymTable::replace(self, key, value)
    }
    fn contains(&self, key: &str) -> bool {
        HashSymTable::contains(self, key)
    }
    fn get(&self, key: &str) -> Option<&V> {
        HashSymTable::get(self, key)
    }
    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        HashSymTable::get_mut(self, key)
    }
    fn remove(&mut self, key: &str) -> Option<V> {
        HashSymTable::remove(self, key)
    }
    fn for_each<F>(&self, visit: F)
    where
        F: FnMut(&str, &V),
    {
        HashSymTable::for_each(self, visit)
    }
    fn for_each_mut<F>(&mut self, visit: F)
    where
        F: FnMut(&str, &mut V),
    {
        HashSymTable::for_each_mut(self, visit)
    }
}

/// Iterator over `(key, value)` pairs of a `HashSymTable`.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Option<BindingKey>>,
    bindings: &'a Bindings<V>,
    chain: Chain<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(b) = self.chain.next() {
                self.remaining -= 1;
                return Some((&*b.key, &b.value));
            }
            let &head = self.buckets.next()?;
            self.chain = self.bindings.chain(head);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a HashSymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::failpoint::{Armed, Site};

    fn sizes(v: &[usize]) -> GrowthSizes {
        GrowthSizes::new(v.to_vec()).unwrap()
    }

    fn key(i: usize) -> String {
        format!("key{i}")
    }

    /// Invariant: a new table is empty at the first tier.
    #[test]
    fn new_table_is_empty_at_first_tier() {
        let t: HashSymTable<i32> = HashSymTable::new();
        assert_eq!(t.len(), 0);
        assert!(t.is_empty());
        assert_eq!(t.bucket_count(), 509);
        assert_eq!(t.tier(), 0);
        assert!(t.get("x").is_none());
        t.assert_consistent();

        let t: HashSymTable<i32> = HashSymTable::try_new().unwrap();
        assert_eq!(t.bucket_count(), 509);
    }

    /// Invariant: duplicate keys are rejected and the stored value is kept.
    #[test]
    fn duplicate_put_rejected() {
        let mut t = HashSymTable::new();
        assert!(t.put("dup", 1));
        assert_eq!(t.try_put("dup", 2), Err(InsertError::DuplicateKey));
        assert!(!t.put("dup", 3));
        assert_eq!(t.get("dup"), Some(&1));
        assert_eq!(t.len(), 1);
    }

    /// Invariant: replace swaps present values and ignores absent keys.
    #[test]
    fn replace_present_and_absent() {
        let mut t = HashSymTable::new();
        t.put("k", "v1");
        assert_eq!(t.replace("k", "v2"), Some("v1"));
        assert_eq!(t.get("k"), Some(&"v2"));
        assert_eq!(t.replace("missing", "v3"), None);
        assert!(!t.contains("missing"));
        assert_eq!(t.len(), 1);
    }

    /// Invariant: with a single bucket every key collides; removal from the
    /// head, middle and tail of the chain keeps the others reachable.
    #[test]
    fn removal_within_one_collision_chain() {
        let mut t = HashSymTable::with_growth(sizes(&[1]));
        for (i, k) in ["a", "b", "c", "d"].into_iter().enumerate() {
            assert!(t.put(k, i));
        }
        assert_eq!(t.bucket_count(), 1, "single tier never grows");
        assert_eq!(t.remove("b"), Some(1));
        assert_eq!(t.remove("d"), Some(3));
        assert_eq!(t.remove("a"), Some(0));
        assert_eq!(t.remove("a"), None);
        assert_eq!(t.get("c"), Some(&2));
        assert_eq!(t.len(), 1);
        t.assert_consistent();
    }

    /// Invariant: growth happens exactly when len exceeds the bucket count,
    /// advances one tier at a time, and stops at the last tier.
    #[test]
    fn growth_follows_tiers() {
        let mut t = HashSymTable::with_growth(sizes(&[2, 5, 11]));
        t.put(&key(0), 0);
        t.put(&key(1), 1);
        assert_eq!((t.tier(), t.bucket_count()), (0, 2));
        t.put(&key(2), 2);
        assert_eq!((t.tier(), t.bucket_count()), (1, 5));
        for i in 3..5 {
            t.put(&key(i), i);
        }
        assert_eq!(t.bucket_count(), 5);
        t.put(&key(5), 5);
        assert_eq!((t.tier(), t.bucket_count()), (2, 11));
        for i in 6..40 {
            t.put(&key(i), i);
        }
        assert_eq!((t.tier(), t.bucket_count()), (2, 11));
        for i in 0..40 {
            assert_eq!(t.get(&key(i)), Some(&i));
        }
        t.assert_consistent();
    }

    /// Invariant: removals never shrink the table.
    #[test]
    fn removal_never_shrinks() {
        let mut t = HashSymTable::with_growth(sizes(&[2, 5]));
        for i in 0..4 {
            t.put(&key(i), i);
        }
        assert_eq!(t.bucket_count(), 5);
        for i in 0..4 {
            assert_eq!(t.remove(&key(i)), Some(i));
        }
        assert!(t.is_empty());
        assert_eq!((t.tier(), t.bucket_count()), (1, 5));
    }

    /// Invariant: 600 keys cross the first tier and all stay retrievable.
    #[test]
    fn growth_past_first_prime_keeps_every_key() {
        let mut t = HashSymTable::new();
        for i in 0..600 {
            assert!(t.put(&key(i), i));
        }
        assert_eq!(t.bucket_count(), 1021);
        assert_eq!(t.len(), 600);
        for i in 0..600 {
            assert_eq!(t.get(&key(i)), Some(&i));
        }
        t.assert_consistent();
    }

    /// Invariant: a failed key copy leaves length and contents untouched.
    #[test]
    fn key_copy_failure_is_isolated() {
        let mut t = HashSymTable::new();
        t.put("a", 1);
        t.put("b", 2);
        {
            let _g = Armed::new(Site::KeyCopy);
            assert_eq!(
                t.try_put("new", 3),
                Err(InsertError::AllocFailed(AllocError::KeyCopy { len: 3 }))
            );
            assert!(!t.put("other", 4));
            // Duplicates are detected before any allocation.
            assert_eq!(t.try_put("a", 5), Err(InsertError::DuplicateKey));
        }
        assert_eq!(t.len(), 2);
        assert!(!t.contains("new"));
        assert_eq!(t.get("a"), Some(&1));
        assert_eq!(t.get("b"), Some(&2));
        t.assert_consistent();
    }

    /// Invariant: a failed growth allocation is swallowed, the insert still
    /// succeeds, and the next insert retries the growth.
    #[test]
    fn growth_failure_is_swallowed_and_retried() {
        let mut t = HashSymTable::with_growth(sizes(&[2, 5]));
        t.put("a", 1);
        t.put("b", 2);
        {
            let _g = Armed::new(Site::BucketArray);
            assert!(t.put("c", 3));
            assert_eq!((t.tier(), t.bucket_count()), (0, 2));
            t.assert_consistent();
        }
        assert!(t.put("d", 4));
        assert_eq!((t.tier(), t.bucket_count()), (1, 5));
        for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            assert_eq!(t.get(k), Some(&v));
        }
        t.assert_consistent();
    }

    #[test]
    fn try_new_reports_bucket_array_failure() {
        let _g = Armed::new(Site::BucketArray);
        let r: Result<HashSymTable<()>, _> = HashSymTable::try_new();
        assert_eq!(r.err(), Some(AllocError::BucketArray { buckets: 509 }));
    }

    /// Invariant: traversal goes by ascending bucket, newest first in a chain.
    #[test]
    fn traversal_order() {
        let mut t = HashSymTable::new();
        // "a" hashes to 97, "b" to 98.
        t.put("b", 2);
        t.put("a", 1);
        let mut seen = Vec::new();
        t.for_each(|k, v| seen.push((k.to_string(), *v)));
        assert_eq!(seen, [("a".to_string(), 1), ("b".to_string(), 2)]);

        let mut t = HashSymTable::with_growth(sizes(&[1]));
        for k in ["x", "y", "z"] {
            t.put(k, ());
        }
        let order: Vec<&str> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["z", "y", "x"]);
    }

    /// Invariant: for_each_mut edits are visible to later lookups.
    #[test]
    fn for_each_mut_updates_values() {
        let mut t = HashSymTable::new();
        for i in 0..10 {
            t.put(&key(i), i);
        }
        t.for_each_mut(|_, v| *v *= 2);
        for i in 0..10 {
            assert_eq!(t.get(&key(i)), Some(&(i * 2)));
        }
        if let Some(v) = t.get_mut(&key(3)) {
            *v = 100;
        }
        assert_eq!(t.get(&key(3)), Some(&100));
    }

    /// Invariant: iter is exact-sized, restartable and agrees with for_each.
    #[test]
    fn iter_matches_for_each() {
        let mut t = HashSymTable::with_growth(sizes(&[3, 7]));
        for i in 0..12 {
            t.put(&key(i), i);
        }
        let it = t.iter();
        assert_eq!(it.len(), 12);
        let a: Vec<(String, usize)> = it.map(|(k, v)| (k.to_string(), *v)).collect();
        let mut b = Vec::new();
        t.for_each(|k, v| b.push((k.to_string(), *v)));
        assert_eq!(a, b);
        assert_eq!((&t).into_iter().count(), 12);
    }

    #[test]
    fn debug_renders_as_map() {
        let mut t = HashSymTable::with_growth(sizes(&[1]));
        t.put("k", 1);
        assert_eq!(format!("{t:?}"), r#"{"k": 1}"#);
    }

    /// Invariant: dropping the table drops every stored value exactly once.
    #[test]
    fn drop_releases_values() {
        use std::rc::Rc;
        let shared = Rc::new(());
        {
            let mut t = HashSymTable::with_growth(sizes(&[2, 5]));
            for i in 0..8 {
                t.put(&key(i), Rc::clone(&shared));
            }
            assert_eq!(Rc::strong_count(&shared), 9);
            drop(t.remove(&key(0)));
            assert_eq!(Rc::strong_count(&shared), 8);
        }
        assert_eq!(Rc::strong_count(&shared), 1);
    }
}
