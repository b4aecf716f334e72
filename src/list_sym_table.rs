//! ListSymTable: every binding on one chain. Linear time throughout; kept as
//! the reference backend the hash table is checked against.

use crate::alloc;
use crate::chain::{BindingKey, Bindings, Chain};
use crate::error::InsertError;
use crate::symbol_table::SymbolTable;
use core::fmt;
use core::mem;

pub struct ListSymTable<V> {
    head: Option<BindingKey>,
    bindings: Bindings<V>,
}

impl<V> ListSymTable<V> {
    pub fn new() -> Self {
        Self {
            head: None,
            bindings: Bindings::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn try_put(&mut self, key: &str, value: V) -> Result<(), InsertError> {
        if self.bindings.find(self.head, key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let owned = alloc::copy_key(key)?;
        self.bindings.push_front(&mut self.head, owned, value);
        Ok(())
    }

    pub fn put(&mut self, key: &str, value: V) -> bool {
        self.try_put(key, value).is_ok()
    }

    pub fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let k = self.bindings.find(self.head, key)?;
        let b = self.bindings.get_mut(k)?;
        Some(mem::replace(&mut b.value, value))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bindings.find(self.head, key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let k = self.bindings.find(self.head, key)?;
        self.bindings.get(k).map(|b| &b.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.bindings.find(self.head, key)?;
        self.bindings.get_mut(k).map(|b| &mut b.value)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.bindings.unlink(&mut self.head, key).map(|b| b.value)
    }

    /// Visit bindings newest first.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &V),
    {
        for b in self.bindings.chain(self.head) {
            visit(&*b.key, &b.value);
        }
    }

    pub fn for_each_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&str, &mut V),
    {
        self.bindings.visit_mut(self.head, &mut visit);
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            chain: self.bindings.chain(self.head),
            remaining: self.len(),
        }
    }
}

impl<V> Default for ListSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for ListSymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> SymbolTable<V> for ListSymTable<V> {
    fn len(&self) -> usize {
        ListSymTable::len(self)
    }
    fn try_put(&mut self, key: &str, value: V) -> Result<(), InsertError> {
        ListSymTable::try_put(self, key, value)
    }
    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        ListSymTable::replace(self, key, value)
    }
    fn contains(&self, key: &str) -> bool {
        ListSymTable::contains(self, key)
    }
    fn get(&self, key: &str) -> Option<&V> {
        ListSymTable::get(self, key)
    }
    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        ListSymTable::get_mut(self, key)
    }
    fn remove(&mut self, key: &str) -> Option<V> {
        ListSymTable::remove(self, key)
    }
    fn for_each<F>(&self, visit: F)
    where
        F: FnMut(&str, &V),
    {
        ListSymTable::for_each(self, visit)
    }
    fn for_each_mut<F>(&mut self, visit: F)
    where
        F: FnMut(&str, &mut V),
    {
        ListSymTable::for_each_mut(self, visit)
    }
}

/// Iterator over `(key, value)` pairs of a `ListSymTable`, newest first.
pub struct Iter<'a, V> {
    chain: Chain<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let b = self.chain.next()?;
        self.remaining -= 1;
        Some((&*b.key, &b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a ListSymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
