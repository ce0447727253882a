//! An ordered map based on an (a,b)-tree.

mod vertex;

use compare::{Compare, Natural};
use crate::entry::{Chain, Entry, Iter};
use crate::error::{Error, Result};
use crate::locate::Key;
use crate::SearchTree;
use self::vertex::Vertex;
use std::fmt::{self, Debug};
use std::iter::FromIterator;
use std::mem::replace;

/// An ordered map based on an (a,b)-tree: a multiway search tree whose leaves all lie at the same
/// depth and whose vertices other than the root hold between `a - 1` and `b - 1` keys.
///
/// Vertices that overflow on insertion split around their median; vertices that underflow on
/// deletion borrow from a sibling or merge with one. As with the binary trees, entries are
/// threaded into an ascending chain.
///
/// # Examples
///
/// ```
/// use baltree::AbTree;
///
/// let mut tree = AbTree::with_params(3, 5).unwrap();
///
/// for key in 0..100 {
///     tree.insert(key, key * key);
/// }
///
/// assert_eq!(tree.get(&9), Some(&81));
/// assert_eq!(tree.delete(&9), Some((9, 81)));
/// assert_eq!(tree.find(&10).and_then(|e| e.predecessor()).map(|e| *e.key()), Some(8));
/// assert!(tree.validate());
/// ```
#[derive(Clone)]
pub struct AbTree<K, V, C = Natural<K>> where C: Compare<K> {
    root: Vertex,
    chain: Chain<K, V>,
    a: usize,
    b: usize,
    cmp: C,
}

impl<K, V> AbTree<K, V> where K: Ord {
    /// Creates an empty (2,4)-tree ordered according to the natural order of its keys.
    pub fn new() -> Self { AbTree::with_cmp(compare::natural()) }

    /// Creates an empty (a,b)-tree ordered according to the natural order of its keys.
    ///
    /// Fails with `Error::InvalidParams` unless `2 <= a <= ceil(b / 2)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::AbTree;
    ///
    /// assert!(AbTree::<u32, ()>::with_params(2, 3).is_ok());
    /// assert!(AbTree::<u32, ()>::with_params(3, 4).is_err());
    /// assert!(AbTree::<u32, ()>::with_params(1, 4).is_err());
    /// ```
    pub fn with_params(a: usize, b: usize) -> Result<Self> {
        AbTree::with_params_and_cmp(a, b, compare::natural())
    }
}

impl<K, V, C> AbTree<K, V, C> where C: Compare<K> {
    /// Creates an empty (2,4)-tree ordered according to the given comparator.
    pub fn with_cmp(cmp: C) -> Self {
        AbTree { root: Vertex::leaf(), chain: Chain::new(), a: 2, b: 4, cmp: cmp }
    }

    /// Creates an empty (a,b)-tree ordered according to the given comparator.
    pub fn with_params_and_cmp(a: usize, b: usize, cmp: C) -> Result<Self> {
        if a < 2 || a > (b + 1) / 2 { return Err(Error::InvalidParams { a: a, b: b }); }
        Ok(AbTree { a: a, b: b, ..AbTree::with_cmp(cmp) })
    }

    /// Returns the tree's `(a, b)` parameters.
    pub fn params(&self) -> (usize, usize) { (self.a, self.b) }

    /// Checks if the map is empty.
    pub fn is_empty(&self) -> bool { self.root.entries.is_empty() }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize { self.chain.len() }

    /// Returns a reference to the map's comparator.
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Removes all entries from the map.
    pub fn clear(&mut self) {
        self.root = Vertex::leaf();
        self.chain.clear();
    }

    /// Inserts an entry into the map, returning `true` if the key was not present.
    ///
    /// An existing entry is left untouched: its value is not replaced.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let (prev, next) = {
            let at = Key::new(&self.cmp, &key);
            if self.root.find(&self.chain, &at).is_some() { return false; }
            (self.root.lower(&self.chain, &at), self.root.higher(&self.chain, &at))
        };

        let entry = self.chain.link(key, value, prev, next);
        let at = Key::new(&self.cmp, self.chain.key(entry));

        if let Some((median, right)) = self.root.insert(&self.chain, &at, entry, self.b) {
            let left = replace(&mut self.root, Vertex::leaf());
            self.root = Vertex { entries: vec![median], children: vec![left, right] };
            tracing::trace!(len = self.chain.len(), "split the root");
        }

        true
    }

    /// Removes and returns the entry whose key is equal to the given key, returning `None` if the
    /// map does not contain the key.
    pub fn delete<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        let removed = self.root.remove(&self.chain, &Key::new(&self.cmp, key), self.a)?;
        let removed = self.chain.unlink(removed);

        if self.root.entries.is_empty() {
            if let Some(child) = self.root.children.pop() {
                self.root = child;
                tracing::trace!(len = self.chain.len(), "dropped the root");
            }
        }

        Some(removed)
    }

    /// Returns the entry whose key is equal to the given key, or `None` if the map does not
    /// contain the key.
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Option<Entry<'_, K, V>> where C: Compare<Q, K> {
        self.root.find(&self.chain, &Key::new(&self.cmp, key)).map(|id| self.chain.entry(id))
    }

    /// Checks if the map contains the given key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.find(key).is_some()
    }

    /// Returns a reference to the value associated with the given key, or `None` if the map does
    /// not contain the key.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.find(key).map(|e| e.value())
    }

    /// Returns a mutable reference to the value associated with the given key, or `None` if the
    /// map does not contain the key.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let id = self.root.find(&self.chain, &Key::new(&self.cmp, key))?;
        Some(self.chain.value_mut(id))
    }

    /// Returns the entry with the minimum key, or `None` if the map is empty.
    pub fn find_min(&self) -> Option<Entry<'_, K, V>> {
        self.root.first().map(|id| self.chain.entry(id))
    }

    /// Returns the entry with the maximum key, or `None` if the map is empty.
    pub fn find_max(&self) -> Option<Entry<'_, K, V>> {
        self.root.last().map(|id| self.chain.entry(id))
    }

    /// Returns the entry with the least key strictly greater than the given key, or `None` if no
    /// such key is present in the map.
    pub fn find_next_higher<Q: ?Sized>(&self, key: &Q) -> Option<Entry<'_, K, V>>
        where C: Compare<Q, K> {

        self.root.higher(&self.chain, &Key::new(&self.cmp, key)).map(|id| self.chain.entry(id))
    }

    /// Returns the entry with the greatest key strictly less than the given key, or `None` if no
    /// such key is present in the map.
    pub fn find_next_lower<Q: ?Sized>(&self, key: &Q) -> Option<Entry<'_, K, V>>
        where C: Compare<Q, K> {

        self.root.lower(&self.chain, &Key::new(&self.cmp, key)).map(|id| self.chain.entry(id))
    }

    /// Returns an iterator over the map's entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> { Iter::new(self.find_min(), self.find_max(), self.len()) }

    /// Checks every structural invariant of the map: equal leaf depth, vertex occupancy, child
    /// counts, key order, and that the chain threads the entries in that order.
    ///
    /// Walks the whole tree; intended for tests.
    pub fn validate(&self) -> bool {
        let mut order = Vec::with_capacity(self.len());
        self.root.in_order(&mut order);
        self.root.check(self.a, self.b, true).is_some() && self.chain.threads(&order, &self.cmp)
    }
}

#[cfg(test)]
impl<K, V, C> AbTree<K, V, C> where K: Debug, C: Compare<K> {
    /// Renders the tree's shape: a leaf as `[k ...]`, any other vertex as
    /// `([k ...] child ...)`.
    fn sketch(&self) -> String {
        fn walk<K: Debug, V>(vertex: &Vertex, chain: &Chain<K, V>, out: &mut String) {
            let keys: Vec<_> = vertex.entries.iter().map(|&e| format!("{:?}", chain.key(e))).collect();
            let keys = format!("[{}]", keys.join(" "));

            if vertex.is_leaf() { return out.push_str(&keys); }

            out.push('(');
            out.push_str(&keys);
            for child in &vertex.children {
                out.push(' ');
                walk(child, chain, out);
            }
            out.push(')');
        }

        let mut out = String::new();
        walk(&self.root, &self.chain, &mut out);
        out
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut vertex = &self.root;
        while let Some(child) = vertex.children.first() {
            vertex = child;
            depth += 1;
        }
        depth
    }
}

impl<K, V, C> SearchTree<K, V> for AbTree<K, V, C> where C: Compare<K> {
    fn insert(&mut self, key: K, value: V) -> bool { AbTree::insert(self, key, value) }

    fn find(&self, key: &K) -> Option<Entry<'_, K, V>> { AbTree::find(self, key) }

    fn delete(&mut self, key: &K) -> Option<(K, V)> { AbTree::delete(self, key) }

    fn find_min(&self) -> Option<Entry<'_, K, V>> { AbTree::find_min(self) }

    fn find_max(&self) -> Option<Entry<'_, K, V>> { AbTree::find_max(self) }

    fn len(&self) -> usize { AbTree::len(self) }
}

impl<K, V, C> Debug for AbTree<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Default for AbTree<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { AbTree::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for AbTree<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, C> FromIterator<(K, V)> for AbTree<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(it: I) -> Self {
        let mut tree = AbTree::default();
        tree.extend(it);
        tree
    }
}

impl<'a, K, V, C> IntoIterator for &'a AbTree<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

#[cfg(test)]
mod test {
    use crate::Error;
    use super::AbTree;

    fn tree(keys: &[u32]) -> AbTree<u32, ()> {
        let mut tree = AbTree::new();
        for &key in keys {
            assert!(tree.insert(key, ()));
            assert!(tree.validate());
        }
        tree
    }

    fn keys(tree: &AbTree<u32, ()>) -> Vec<u32> { tree.iter().map(|e| *e.0).collect() }

    #[test]
    fn leaf_splits_around_median() {
        let full = tree(&[1, 2, 3]);
        assert_eq!(full.sketch(), "[1 2 3]");

        let split = tree(&[1, 2, 3, 4]);
        assert_eq!(split.sketch(), "([3] [1 2] [4])");
        assert_eq!(split.depth(), 1);

        let wide = tree(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(wide.sketch(), "([3 6] [1 2] [4 5] [7])");
    }

    #[test]
    fn underflow_borrows_from_sibling() {
        let mut tree = tree(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.delete(&7), Some((7, ())));
        assert!(tree.validate());
        assert_eq!(tree.sketch(), "([3 5] [1 2] [4] [6])");
    }

    #[test]
    fn underflow_borrows_from_right_sibling() {
        let mut tree = tree(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.delete(&1), Some((1, ())));
        assert_eq!(tree.delete(&2), Some((2, ())));
        assert!(tree.validate());
        assert_eq!(tree.sketch(), "([4 6] [3] [5] [7])");
    }

    #[test]
    fn underflow_merges_with_sibling() {
        let mut tree = tree(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.delete(&5), Some((5, ())));
        assert!(tree.validate());
        assert_eq!(tree.delete(&7), Some((7, ())));
        assert!(tree.validate());
        assert_eq!(tree.sketch(), "([3] [1 2] [4 6])");
        assert_eq!(keys(&tree), [1, 2, 3, 4, 6]);
    }

    #[test]
    fn internal_delete_takes_predecessor() {
        let mut tree = tree(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.delete(&6), Some((6, ())));
        assert!(tree.validate());
        assert_eq!(tree.sketch(), "([3 5] [1 2] [4] [7])");
    }

    #[test]
    fn root_drops_when_emptied() {
        let mut tree = tree(&[1, 2, 3, 4]);
        assert_eq!(tree.delete(&1), Some((1, ())));
        assert_eq!(tree.sketch(), "([3] [2] [4])");
        assert_eq!(tree.delete(&4), Some((4, ())));
        assert!(tree.validate());
        assert_eq!(tree.sketch(), "[2 3]");
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn delete_down_to_one_key() {
        for &(a, b) in &[(2, 3), (2, 4), (3, 5), (3, 6), (4, 8)] {
            let mut tree = AbTree::with_params(a, b).unwrap();
            for key in 0..200u32 { tree.insert((key * 37) % 200, ()); }
            assert!(tree.validate());

            for key in (1..200u32).rev().filter(|k| k % 2 == 0).chain((1..200).filter(|k| k % 2 == 1)) {
                assert_eq!(tree.delete(&key), Some((key, ())));
                assert!(tree.validate(), "({}, {}) invalid after deleting {}", a, b, key);
            }

            assert_eq!(keys(&tree), [0]);
            assert_eq!(tree.depth(), 0);
        }
    }

    #[test]
    fn absent_keys_are_noops() {
        let mut tree = tree(&[10, 20, 30]);
        assert!(!tree.insert(20, ()));
        assert_eq!(tree.delete(&25), None);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.sketch(), "[10 20 30]");
    }

    #[test]
    fn neighbours_span_levels() {
        let tree = tree(&(0..50).map(|k| k * 2).collect::<Vec<_>>());
        for probe in 1..98 {
            let below = if probe % 2 == 0 { probe - 2 } else { probe - 1 };
            let above = if probe % 2 == 0 { probe + 2 } else { probe + 1 };
            assert_eq!(tree.find_next_lower(&probe).map(|e| *e.key()), Some(below));
            assert_eq!(tree.find_next_higher(&probe).map(|e| *e.key()), Some(above));
        }
        assert_eq!(tree.find_next_lower(&0).map(|e| *e.key()), None);
        assert_eq!(tree.find_next_higher(&98).map(|e| *e.key()), None);
    }

    #[test]
    fn rejects_bad_params() {
        match AbTree::<u32, ()>::with_params(3, 4) {
            Err(Error::InvalidParams { a: 3, b: 4 }) => {}
            other => panic!("unexpected {:?}", other.map(|t| t.params())),
        }
        assert!(AbTree::<u32, ()>::with_params(1, 2).is_err());
        assert_eq!(AbTree::<u32, ()>::with_params(3, 5).map(|t| t.params()).ok(), Some((3, 5)));
    }
}
