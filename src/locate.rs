use compare::Compare;
use std::cmp::Ordering::{self, *};

/// Steers a descent through a search tree towards one entry.
pub trait Locate<K> {
    /// Orders the sought entry against a stored `key`.
    ///
    /// `greater_below` tells whether the subtree being searched still holds keys greater than
    /// `key`.
    fn locate(&self, key: &K, greater_below: bool) -> Ordering;
}

/// Seeks the entry whose key compares equal to a probe.
pub struct Key<'a, C: 'a, Q: ?Sized + 'a> {
    cmp: &'a C,
    key: &'a Q,
}

impl<'a, C, Q: ?Sized> Key<'a, C, Q> {
    pub fn new(cmp: &'a C, key: &'a Q) -> Self { Key { cmp: cmp, key: key } }
}

impl<'a, K, C, Q: ?Sized> Locate<K> for Key<'a, C, Q> where C: Compare<Q, K> {
    fn locate(&self, key: &K, _: bool) -> Ordering { self.cmp.compare(self.key, key) }
}

/// Seeks the greatest entry of a subtree.
pub struct Greatest;

impl<K> Locate<K> for Greatest {
    fn locate(&self, _: &K, greater_below: bool) -> Ordering {
        if greater_below { Greater } else { Equal }
    }
}
