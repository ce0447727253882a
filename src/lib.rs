//! Ordered maps backed by self-balancing search trees.
//!
//! Three containers share one contract, [`SearchTree`]:
//!
//! - [`AvlTree`], a binary search tree kept height-balanced,
//! - [`RbTree`], a left-leaning red-black binary search tree,
//! - [`AbTree`], a multiway (a,b)-tree.
//!
//! Every container also threads its entries into a doubly-linked chain in ascending key order,
//! so that an [`Entry`] returned by a lookup can step to its neighbours in constant time and
//! [`Iter`] walks the chain rather than the tree.
//!
//! The [`script`] module replays operation scripts against any container and compares the
//! results with recorded expectations.
//!
//! # Examples
//!
//! ```
//! use baltree::{AbTree, AvlTree, RbTree, SearchTree};
//!
//! fn fill<T: SearchTree<u32, char>>(mut tree: T) -> Vec<u32> {
//!     for (i, c) in "baltree".chars().enumerate() {
//!         tree.insert(i as u32 * 7 % 5, c);
//!     }
//!     tree.delete(&3);
//!     tree.iter().map(|(k, _)| *k).collect()
//! }
//!
//! assert_eq!(fill(AvlTree::new()), [0, 1, 2, 4]);
//! assert_eq!(fill(RbTree::new()), [0, 1, 2, 4]);
//! assert_eq!(fill(AbTree::new()), [0, 1, 2, 4]);
//! ```

mod ab;
mod balance;
mod binary;
mod entry;
mod error;
mod locate;
mod node;
pub mod script;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;

#[cfg(feature = "quickcheck")]
mod quickcheck;

pub use crate::ab::AbTree;
pub use crate::balance::{Avl, Balance, Color, Llrb};
pub use crate::binary::{AvlTree, BinaryTree, RbTree};
pub use crate::entry::{Entry, Iter};
pub use crate::error::{Error, Result};

/// The operations every container supports.
///
/// # Examples
///
/// ```
/// use baltree::{AvlTree, SearchTree};
///
/// fn smallest<T: SearchTree<i32, &'static str>>(tree: &T) -> Option<i32> {
///     tree.find_min().map(|e| *e.key())
/// }
///
/// let mut tree = AvlTree::new();
/// tree.insert(3, "c");
/// tree.insert(1, "a");
/// assert_eq!(smallest(&tree), Some(1));
/// ```
pub trait SearchTree<K, V> {
    /// Inserts an entry, returning `true` if the key was not present. An existing entry is left
    /// untouched.
    fn insert(&mut self, key: K, value: V) -> bool;

    /// Returns the entry whose key is equal to the given key, if any.
    fn find(&self, key: &K) -> Option<Entry<'_, K, V>>;

    /// Removes and returns the entry whose key is equal to the given key, if any.
    fn delete(&mut self, key: &K) -> Option<(K, V)>;

    /// Returns the entry with the minimum key, if any.
    fn find_min(&self) -> Option<Entry<'_, K, V>>;

    /// Returns the entry with the maximum key, if any.
    fn find_max(&self) -> Option<Entry<'_, K, V>>;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Checks if there are no entries.
    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns an iterator over the entries in ascending key order.
    fn iter(&self) -> Iter<'_, K, V> { Iter::new(self.find_min(), self.find_max(), self.len()) }
}
