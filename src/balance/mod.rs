//! Balancing strategies for the binary search tree skeleton.

mod avl;
mod llrb;

pub use self::avl::Avl;
pub use self::llrb::{Color, Llrb};

use crate::entry::Chain;
use crate::locate::Locate;
use crate::node::{self, Nodes};
use std::fmt::Debug;

/// Balance metadata carried by every node of a binary search tree, and the rules that keep the
/// tree balanced.
///
/// The skeleton calls into the strategy at fixed points of its recursive insert and remove;
/// strategies whose removal does not fit the skeleton's shape replace `remove` wholesale.
#[forbid(missing_docs)]
pub trait Balance: Copy + Debug + Eq {
    /// The tag carried by the shared sentinel.
    const EXTERNAL: Self;

    /// The tag given to a newly attached leaf.
    const LEAF: Self;

    /// Prepares node `id` before an insertion descends below it.
    fn descend(_nodes: &mut Nodes<Self>, _id: usize) {}

    /// Rebalances node `id` after an insertion in one of its subtrees, returning the new subtree
    /// root.
    fn rebalance_insert(nodes: &mut Nodes<Self>, id: usize) -> usize;

    /// Rebalances node `id` after a removal in one of its subtrees, returning the new subtree
    /// root.
    fn rebalance_remove(nodes: &mut Nodes<Self>, id: usize) -> usize;

    /// Prepares the root before a removal.
    fn prepare_remove(_nodes: &mut Nodes<Self>, _root: usize) {}

    /// Removes the entry located by `at` from the subtree rooted at `id`, returning the new
    /// subtree root and the removed entry.
    fn remove<K, V, L>(nodes: &mut Nodes<Self>, chain: &Chain<K, V>, at: &L, id: usize)
        -> (usize, Option<usize>) where L: Locate<K> {

        node::remove(nodes, chain, at, id)
    }

    /// Restores any property of the root after an insertion or removal.
    fn settle(_nodes: &mut Nodes<Self>, _root: usize) {}

    /// Checks the strategy's invariants over the whole tree.
    fn check(nodes: &Nodes<Self>, root: usize) -> bool;
}
