//! Binding arena and the singly-linked chains threaded through it.
//!
//! Every binding of a table lives in one `SlotMap`. A chain is just an
//! `Option<BindingKey>` head plus the `next` links stored in the bindings,
//! so relinking a binding into another chain rewrites a key and never
//! moves the key string or the value.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena index of one binding.
    pub(crate) struct BindingKey;
}

#[derive(Debug)]
pub(crate) struct Binding<V> {
    pub(crate) key: Box<str>,
    pub(crate) value: V,
    pub(crate) next: Option<BindingKey>,
}

pub(crate) struct Bindings<V> {
    slots: SlotMap<BindingKey, Binding<V>>,
}

impl<V> Bindings<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, k: BindingKey) -> Option<&Binding<V>> {
        self.slots.get(k)
    }

    pub(crate) fn get_mut(&mut self, k: BindingKey) -> Option<&mut Binding<V>> {
        self.slots.get_mut(k)
    }

    /// First binding in the chain starting at `head` whose key equals `key`.
    pub(crate) fn find(&self, head: Option<BindingKey>, key: &str) -> Option<BindingKey> {
        let mut cur = head;
        while let Some(k) = cur {
            let b = self.slots.get(k)?;
            if &*b.key == key {
                return Some(k);
            }
            cur = b.next;
        }
        None
    }

    /// Store a new binding at the front of the chain at `head`.
    pub(crate) fn push_front(
        &mut self,
        head: &mut Option<BindingKey>,
        key: Box<str>,
        value: V,
    ) -> BindingKey {
        let k = self.slots.insert(Binding {
            key,
            value,
            next: *head,
        });
        *head = Some(k);
        k
    }

    /// Move an existing binding to the front of the chain at `head`.
    ///
    /// The caller must already have detached `k` from its old chain (or be
    /// discarding that chain wholesale, as a rehash does).
    pub(crate) fn relink(&mut self, k: BindingKey, head: &mut Option<BindingKey>) {
        if let Some(b) = self.slots.get_mut(k) {
            b.next = *head;
            *head = Some(k);
        }
    }

    /// Detach the binding for `key` from the chain at `head` and free it.
    pub(crate) fn unlink(&mut self, head: &mut Option<BindingKey>, key: &str) -> Option<Binding<V>> {
        let mut prev: Option<BindingKey> = None;
        let mut cur = *head;
        while let Some(k) = cur {
            let b = self.slots.get(k)?;
            if &*b.key == key {
                let next = b.next;
                match prev {
                    Some(p) => self.slots.get_mut(p)?.next = next,
                    None => *head = next,
                }
                return self.slots.remove(k);
            }
            prev = cur;
            cur = b.next;
        }
        None
    }

    pub(crate) fn chain(&self, head: Option<BindingKey>) -> Chain<'_, V> {
        Chain {
            slots: &self.slots,
            cur: head,
        }
    }

    /// Call `f` on every binding of the chain at `head`, head first.
    pub(crate) fn visit_mut<F>(&mut self, head: Option<BindingKey>, f: &mut F)
    where
        F: FnMut(&str, &mut V),
    {
        let mut cur = head;
        while let Some(k) = cur {
            let Some(b) = self.slots.get_mut(k) else {
                return;
            };
            f(&*b.key, &mut b.value);
            cur = b.next;
        }
    }
}

/// Iterator over the bindings of one chain, head first.
pub(crate) struct Chain<'a, V> {
    slots: &'a SlotMap<BindingKey, Binding<V>>,
    cur: Option<BindingKey>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = &'a Binding<V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let b = self.slots.get(self.cur?)?;
        self.cur = b.next;
        Some(b)
    }
}
