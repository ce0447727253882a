//! Ordered maps based on a balanced binary search tree.

use compare::{Compare, Natural};
use crate::balance::{Avl, Balance, Llrb};
use crate::entry::{Chain, Entry, Iter};
use crate::locate::Key;
use crate::node::{self, Dir, Left, Nodes, Right, EXTERNAL};
use crate::SearchTree;
use std::fmt::{self, Debug};
use std::iter::FromIterator;

/// An ordered map based on a binary search tree kept balanced by the strategy `B`.
///
/// Besides the tree, the map threads its entries into a doubly-linked chain in ascending key
/// order, so stepping from an entry to its neighbours or iterating the whole map never walks the
/// tree.
///
/// The behavior of this map is undefined if a key's ordering relative to any other key changes
/// while the key is in the map.
#[derive(Clone)]
pub struct BinaryTree<K, V, B, C = Natural<K>> where B: Balance, C: Compare<K> {
    nodes: Nodes<B>,
    chain: Chain<K, V>,
    root: usize,
    cmp: C,
}

/// An ordered map based on an AVL tree.
pub type AvlTree<K, V, C = Natural<K>> = BinaryTree<K, V, Avl, C>;

/// An ordered map based on a left-leaning red-black tree.
pub type RbTree<K, V, C = Natural<K>> = BinaryTree<K, V, Llrb, C>;

impl<K, V, B> BinaryTree<K, V, B> where K: Ord, B: Balance {
    /// Creates an empty map ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    ///
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    ///
    /// let mut it = tree.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { BinaryTree::with_cmp(compare::natural()) }
}

impl<K, V, B, C> BinaryTree<K, V, B, C> where B: Balance, C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    /// use baltree::RbTree;
    ///
    /// let mut tree = RbTree::with_cmp(natural().rev());
    ///
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    ///
    /// assert_eq!(tree.find_min().map(|e| *e.key()), Some(3));
    /// assert_eq!(tree.find_max().map(|e| *e.key()), Some(1));
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        BinaryTree { nodes: Nodes::new(), chain: Chain::new(), root: EXTERNAL, cmp: cmp }
    }

    /// Checks if the map is empty.
    pub fn is_empty(&self) -> bool { self.root == EXTERNAL }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize { self.chain.len() }

    /// Returns a reference to the map's comparator.
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Removes all entries from the map.
    pub fn clear(&mut self) {
        self.nodes = Nodes::new();
        self.chain.clear();
        self.root = EXTERNAL;
    }

    /// Inserts an entry into the map, returning `true` if the key was not present.
    ///
    /// An existing entry is left untouched: its value is not replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(1, "a"));
    /// assert!(!tree.insert(1, "b"));
    /// assert_eq!(tree.get(&1), Some(&"a"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let (prev, next) = {
            let at = Key::new(&self.cmp, &key);
            if node::find(&self.nodes, &self.chain, &at, self.root).is_some() { return false; }
            (Left::closest(&self.nodes, &self.chain, &at, self.root),
             Right::closest(&self.nodes, &self.chain, &at, self.root))
        };

        let entry = self.chain.link(key, value, prev, next);
        let at = Key::new(&self.cmp, self.chain.key(entry));
        self.root = node::insert(&mut self.nodes, &self.chain, &at, self.root, entry);
        B::settle(&mut self.nodes, self.root);
        true
    }

    /// Removes and returns the entry whose key is equal to the given key, returning `None` if the
    /// map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    ///
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    ///
    /// assert_eq!(tree.delete(&1), Some((1, "a")));
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.get(&1), None);
    /// assert_eq!(tree.delete(&1), None);
    /// assert_eq!(tree.find(&2).and_then(|e| e.predecessor()), None);
    /// ```
    pub fn delete<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        let at = Key::new(&self.cmp, key);
        node::find(&self.nodes, &self.chain, &at, self.root)?;

        B::prepare_remove(&mut self.nodes, self.root);
        let (root, removed) = B::remove(&mut self.nodes, &self.chain, &at, self.root);
        self.root = root;
        B::settle(&mut self.nodes, root);

        removed.map(|entry| self.chain.unlink(entry))
    }

    /// Returns the entry whose key is equal to the given key, or `None` if the map does not
    /// contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1, "a");
    /// tree.insert(2, "b");
    ///
    /// let entry = tree.find(&1).unwrap();
    /// assert_eq!(entry.key_value(), (&1, &"a"));
    /// assert_eq!(entry.successor().map(|e| *e.key()), Some(2));
    /// assert!(tree.find(&3).is_none());
    /// ```
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Option<Entry<'_, K, V>> where C: Compare<Q, K> {
        node::find(&self.nodes, &self.chain, &Key::new(&self.cmp, key), self.root)
            .map(|id| self.chain.entry(id))
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
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(1, "a");
    ///
    /// if let Some(value) = tree.get_mut(&1) {
    ///     *value = "b";
    /// }
    ///
    /// assert_eq!(tree.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let id = node::find(&self.nodes, &self.chain, &Key::new(&self.cmp, key), self.root)?;
        Some(self.chain.value_mut(id))
    }

    /// Returns the entry with the minimum key, or `None` if the map is empty.
    pub fn find_min(&self) -> Option<Entry<'_, K, V>> {
        Left::extremum(&self.nodes, self.root).map(|id| self.chain.entry(id))
    }

    /// Returns the entry with the maximum key, or `None` if the map is empty.
    pub fn find_max(&self) -> Option<Entry<'_, K, V>> {
        Right::extremum(&self.nodes, self.root).map(|id| self.chain.entry(id))
    }

    /// Returns the entry with the least key strictly greater than the given key, or `None` if no
    /// such key is present in the map.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::AvlTree;
    ///
    /// let tree: AvlTree<_, _> = vec![(2, "b"), (4, "d"), (6, "f")].into_iter().collect();
    ///
    /// assert_eq!(tree.find_next_higher(&1).map(|e| *e.key()), Some(2));
    /// assert_eq!(tree.find_next_higher(&2).map(|e| *e.key()), Some(4));
    /// assert_eq!(tree.find_next_higher(&5).map(|e| *e.key()), Some(6));
    /// assert_eq!(tree.find_next_higher(&6).map(|e| *e.key()), None);
    /// ```
    pub fn find_next_higher<Q: ?Sized>(&self, key: &Q) -> Option<Entry<'_, K, V>>
        where C: Compare<Q, K> {

        Right::closest(&self.nodes, &self.chain, &Key::new(&self.cmp, key), self.root)
            .map(|id| self.chain.entry(id))
    }

    /// Returns the entry with the greatest key strictly less than the given key, or `None` if no
    /// such key is present in the map.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use baltree::RbTree;
    ///
    /// let tree: RbTree<_, _> = vec![(2, "b"), (4, "d"), (6, "f")].into_iter().collect();
    ///
    /// assert_eq!(tree.find_next_lower(&2).map(|e| *e.key()), None);
    /// assert_eq!(tree.find_next_lower(&3).map(|e| *e.key()), Some(2));
    /// assert_eq!(tree.find_next_lower(&6).map(|e| *e.key()), Some(4));
    /// assert_eq!(tree.find_next_lower(&9).map(|e| *e.key()), Some(6));
    /// ```
    pub fn find_next_lower<Q: ?Sized>(&self, key: &Q) -> Option<Entry<'_, K, V>>
        where C: Compare<Q, K> {

        Left::closest(&self.nodes, &self.chain, &Key::new(&self.cmp, key), self.root)
            .map(|id| self.chain.entry(id))
    }

    /// Returns an iterator over the map's entries in ascending key order.
    ///
    /// The iterator is double-ended: reversing it yields the entries in descending order.
    pub fn iter(&self) -> Iter<'_, K, V> { Iter::new(self.find_min(), self.find_max(), self.len()) }

    /// Checks every structural invariant of the map: the balance strategy's own invariants, the
    /// ordering of keys along an in-order walk, and that the chain threads exactly that walk.
    ///
    /// Walks the whole tree; intended for tests.
    pub fn validate(&self) -> bool {
        let mut order = Vec::with_capacity(self.len());
        node::in_order(&self.nodes, self.root, &mut order);
        B::check(&self.nodes, self.root) && self.chain.threads(&order, &self.cmp)
    }
}

#[cfg(test)]
impl<K, V, B, C> BinaryTree<K, V, B, C> where K: Debug, B: Balance, C: Compare<K> {
    /// Renders the tree's shape: a leaf as its key, any other node as `(key left right)` with `-`
    /// for an absent child.
    pub fn sketch(&self) -> String {
        fn walk<K: Debug, V, B: Balance>(tree: &Nodes<B>, chain: &Chain<K, V>, id: usize,
                                         out: &mut String) {
            if id == EXTERNAL { return out.push('-'); }

            let (left, right) = (tree.left(id), tree.right(id));
            let key = format!("{:?}", chain.key(tree.entry(id)));

            if left == EXTERNAL && right == EXTERNAL { return out.push_str(&key); }

            out.push('(');
            out.push_str(&key);
            out.push(' ');
            walk(tree, chain, left, out);
            out.push(' ');
            walk(tree, chain, right, out);
            out.push(')');
        }

        let mut out = String::new();
        if self.root != EXTERNAL { walk(&self.nodes, &self.chain, self.root, &mut out); }
        out
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn walk<B: Balance>(nodes: &Nodes<B>, id: usize) -> usize {
            if id == EXTERNAL { 0 } else { 1 + walk(nodes, nodes.left(id)).max(walk(nodes, nodes.right(id))) }
        }

        walk(&self.nodes, self.root)
    }
}

#[cfg(test)]
impl<K, V, C> BinaryTree<K, V, Llrb, C> where C: Compare<K> {
    pub fn root_color(&self) -> Option<crate::balance::Color> {
        if self.root == EXTERNAL { None } else { Some(self.nodes.balance(self.root).color()) }
    }
}

impl<K, V, B, C> SearchTree<K, V> for BinaryTree<K, V, B, C> where B: Balance, C: Compare<K> {
    fn insert(&mut self, key: K, value: V) -> bool { BinaryTree::insert(self, key, value) }

    fn find(&self, key: &K) -> Option<Entry<'_, K, V>> { BinaryTree::find(self, key) }

    fn delete(&mut self, key: &K) -> Option<(K, V)> { BinaryTree::delete(self, key) }

    fn find_min(&self) -> Option<Entry<'_, K, V>> { BinaryTree::find_min(self) }

    fn find_max(&self) -> Option<Entry<'_, K, V>> { BinaryTree::find_max(self) }

    fn len(&self) -> usize { BinaryTree::len(self) }
}

impl<K, V, B, C> Debug for BinaryTree<K, V, B, C>
    where K: Debug, V: Debug, B: Balance, C: Compare<K> {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, B, C> Default for BinaryTree<K, V, B, C> where B: Balance, C: Compare<K> + Default {
    fn default() -> Self { BinaryTree::with_cmp(Default::default()) }
}

impl<K, V, B, C> Extend<(K, V)> for BinaryTree<K, V, B, C> where B: Balance, C: Compare<K> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, B, C> FromIterator<(K, V)> for BinaryTree<K, V, B, C>
    where B: Balance, C: Compare<K> + Default {

    fn from_iter<I: IntoIterator<Item=(K, V)>>(it: I) -> Self {
        let mut tree = BinaryTree::default();
        tree.extend(it);
        tree
    }
}

impl<'a, K, V, B, C> IntoIterator for &'a BinaryTree<K, V, B, C> where B: Balance, C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}
