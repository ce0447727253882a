//! Stored entries and the ascending chain threading them.

use compare::Compare;
use slab::Slab;
use std::cmp::Ordering::*;
use std::fmt::{self, Debug};

/// A key-value pair together with its neighbours in ascending key order.
#[derive(Clone)]
pub struct Item<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// The entries of one container, linked into a doubly-linked chain in ascending key order.
///
/// Trees refer to entries by id. The chain is only ever patched at the two points of change:
/// `link` when an entry is created and `unlink` when it is removed.
#[derive(Clone)]
pub struct Chain<K, V> {
    items: Slab<Item<K, V>>,
}

impl<K, V> Chain<K, V> {
    pub fn new() -> Self { Chain { items: Slab::new() } }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn clear(&mut self) { self.items.clear(); }

    pub fn key(&self, id: usize) -> &K { &self.items[id].key }

    pub fn value_mut(&mut self, id: usize) -> &mut V { &mut self.items[id].value }

    pub fn prev(&self, id: usize) -> Option<usize> { self.items[id].prev }

    pub fn entry(&self, id: usize) -> Entry<'_, K, V> { Entry { chain: self, id: id } }

    /// Creates an entry and links it between `prev` and `next`, which must be adjacent.
    pub fn link(&mut self, key: K, value: V, prev: Option<usize>, next: Option<usize>) -> usize {
        debug_assert!(prev.map_or(true, |prev| self.items[prev].next == next));
        debug_assert!(next.map_or(true, |next| self.items[next].prev == prev));

        let id = self.items.insert(Item { key: key, value: value, prev: prev, next: next });
        if let Some(prev) = prev { self.items[prev].next = Some(id); }
        if let Some(next) = next { self.items[next].prev = Some(id); }
        id
    }

    /// Splices an entry out of the chain and releases it.
    pub fn unlink(&mut self, id: usize) -> (K, V) {
        let item = self.items.remove(id);
        if let Some(prev) = item.prev { self.items[prev].next = item.next; }
        if let Some(next) = item.next { self.items[next].prev = item.prev; }
        (item.key, item.value)
    }

    /// Checks that `order`, the entries as a tree lays them out, is strictly ascending under
    /// `cmp` and is exactly the sequence the chain threads, in both directions.
    pub fn threads<C>(&self, order: &[usize], cmp: &C) -> bool where C: Compare<K> {
        if order.len() != self.len() { return false; }

        let ascending = order.windows(2).all(|pair|
            cmp.compare(self.key(pair[0]), self.key(pair[1])) == Less &&
            self.items[pair[0]].next == Some(pair[1]) &&
            self.items[pair[1]].prev == Some(pair[0]));

        ascending &&
            order.first().map_or(true, |&first| self.items[first].prev.is_none()) &&
            order.last().map_or(true, |&last| self.items[last].next.is_none())
    }
}

/// A read-only cursor on an entry of a container.
///
/// Following `successor` from a container's minimum visits every key in ascending order;
/// following `predecessor` from its maximum visits them in descending order.
///
/// # Examples
///
/// ```
/// use baltree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(2, "b");
/// tree.insert(1, "a");
/// tree.insert(3, "c");
///
/// let entry = tree.find(&2).unwrap();
/// assert_eq!(entry.value(), &"b");
/// assert_eq!(entry.predecessor().map(|e| *e.key()), Some(1));
/// assert_eq!(entry.successor().map(|e| *e.key()), Some(3));
/// ```
pub struct Entry<'a, K: 'a, V: 'a> {
    chain: &'a Chain<K, V>,
    id: usize,
}

impl<'a, K, V> Clone for Entry<'a, K, V> {
    fn clone(&self) -> Self { *self }
}

impl<'a, K, V> Copy for Entry<'a, K, V> {}

impl<'a, K, V> Entry<'a, K, V> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &'a K { &self.chain.items[self.id].key }

    /// Returns a reference to the entry's value.
    pub fn value(&self) -> &'a V { &self.chain.items[self.id].value }

    /// Returns references to the entry's key and value.
    pub fn key_value(&self) -> (&'a K, &'a V) {
        let item = &self.chain.items[self.id];
        (&item.key, &item.value)
    }

    /// Returns the entry with the next smaller key, if any.
    pub fn predecessor(&self) -> Option<Entry<'a, K, V>> {
        self.chain.items[self.id].prev.map(|id| self.chain.entry(id))
    }

    /// Returns the entry with the next greater key, if any.
    pub fn successor(&self) -> Option<Entry<'a, K, V>> {
        self.chain.items[self.id].next.map(|id| self.chain.entry(id))
    }
}

impl<'a, K, V> PartialEq for Entry<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.chain as *const _ == other.chain as *const _ && self.id == other.id
    }
}

impl<'a, K, V> Eq for Entry<'a, K, V> {}

impl<'a, K, V> Debug for Entry<'a, K, V> where K: Debug, V: Debug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Entry").field("key", self.key()).field("value", self.value()).finish()
    }
}

/// An iterator over a container's entries in ascending key order, walking the order chain.
///
/// Acquire through `iter` on any container.
///
/// # Examples
///
/// ```
/// use baltree::RbTree;
///
/// let mut tree = RbTree::new();
/// tree.insert(2, "b");
/// tree.insert(1, "a");
/// tree.insert(3, "c");
///
/// assert_eq!(tree.iter().map(|e| *e.0).collect::<Vec<_>>(), [1, 2, 3]);
/// assert_eq!(tree.iter().rev().map(|e| *e.0).collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub struct Iter<'a, K: 'a, V: 'a> {
    front: Option<Entry<'a, K, V>>,
    back: Option<Entry<'a, K, V>>,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Creates an iterator over the `len` entries chained from `first` to `last`.
    pub fn new(first: Option<Entry<'a, K, V>>, last: Option<Entry<'a, K, V>>, len: usize) -> Self {
        Iter { front: first, back: last, len: len }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self { Iter { front: self.front, back: self.back, len: self.len } }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if self.len == 0 { return None; }
        let entry = self.front?;
        self.len -= 1;
        self.front = entry.successor();
        Some(entry.key_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.len == 0 { return None; }
        let entry = self.back?;
        self.len -= 1;
        self.back = entry.predecessor();
        Some(entry.key_value())
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

#[cfg(test)]
mod test {
    use compare::natural;
    use super::Chain;

    fn keys(chain: &Chain<u32, ()>, first: usize) -> Vec<u32> {
        let mut keys = vec![];
        let mut entry = Some(chain.entry(first));
        while let Some(e) = entry {
            keys.push(*e.key());
            entry = e.successor();
        }
        keys
    }

    #[test]
    fn link_between_neighbors() {
        let mut chain = Chain::new();
        let one = chain.link(1, (), None, None);
        let three = chain.link(3, (), Some(one), None);
        let two = chain.link(2, (), Some(one), Some(three));

        assert_eq!(keys(&chain, one), [1, 2, 3]);
        assert_eq!(chain.prev(three), Some(two));
        assert!(chain.threads(&[one, two, three], &natural()));
        assert!(!chain.threads(&[one, three, two], &natural()));
    }

    #[test]
    fn unlink_patches_neighbors() {
        let mut chain = Chain::new();
        let one = chain.link(1, (), None, None);
        let two = chain.link(2, (), Some(one), None);
        let three = chain.link(3, (), Some(two), None);

        assert_eq!(chain.unlink(two), (2, ()));
        assert_eq!(keys(&chain, one), [1, 3]);
        assert_eq!(chain.prev(three), Some(one));

        assert_eq!(chain.unlink(one), (1, ()));
        assert_eq!(chain.prev(three), None);
        assert!(chain.threads(&[three], &natural()));
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let mut chain = Chain::new();
        let one = chain.link(1, 'a', None, None);
        let two = chain.link(2, 'b', Some(one), None);
        let three = chain.link(3, 'c', Some(two), None);

        let mut it = super::Iter::new(Some(chain.entry(one)), Some(chain.entry(three)), 3);
        assert_eq!(it.len(), 3);
        assert_eq!(it.next(), Some((&1, &'a')));
        assert_eq!(it.next_back(), Some((&3, &'c')));
        assert_eq!(it.next(), Some((&2, &'b')));
        assert_eq!(it.next_back(), None);
        assert_eq!(it.next(), None);
    }
}
