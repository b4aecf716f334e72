//! The operations every symbol-table backend provides.

use crate::error::InsertError;

/// A mapping from owned string keys to caller-supplied values.
///
/// Keys are unique: inserting a present key fails and never overwrites.
/// Values are stored and handed back verbatim; the table never inspects
/// them. Traversal order is unspecified but exhaustive.
pub trait SymbolTable<V> {
    /// Number of bindings.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `key -> value` if `key` is absent.
    ///
    /// On error the table is unchanged and `value` is dropped.
    fn try_put(&mut self, key: &str, value: V) -> Result<(), InsertError>;

    /// `try_put` collapsed to "inserted or not".
    fn put(&mut self, key: &str, value: V) -> bool {
        self.try_put(key, value).is_ok()
    }

    /// Swap the value bound to `key`, returning the previous one. Absent
    /// keys leave the table unchanged and yield `None`.
    fn replace(&mut self, key: &str, value: V) -> Option<V>;

    fn contains(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<&V>;

    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Remove the binding for `key` and return its value.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Visit every binding exactly once.
    fn for_each<F>(&self, visit: F)
    where
        F: FnMut(&str, &V);

    /// Visit every binding exactly once with mutable access to its value.
    fn for_each_mut<F>(&mut self, visit: F)
    where
        F: FnMut(&str, &mut V);
}
