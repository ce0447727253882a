//! The binary search tree skeleton shared by the AVL and left-leaning red-black strategies.
//!
//! Nodes live in an arena and refer to each other by id. Slot `EXTERNAL` holds the sentinel that
//! stands in for every absent child: its children are itself and its balance tag is the
//! strategy's external tag. The sentinel is never written after the arena is created.


use crate::balance::Balance;
use crate::entry::Chain;
use crate::locate::{Greatest, Locate};
use slab::Slab;
use std::cmp::Ordering::{self, *};
use std::mem::replace;

/// Id of the sentinel node.
pub const EXTERNAL: usize = 0;

// The sentinel carries no entry.
const NO_ENTRY: usize = !0;

#[derive(Clone, Debug)]
struct Node<B> {
    entry: usize,
    left: usize,
    right: usize,
    balance: B,
}

/// The node arena of one binary tree.
#[derive(Clone)]
pub struct Nodes<B> {
    slab: Slab<Node<B>>,
}

impl<B> Nodes<B> where B: Balance {
    pub fn new() -> Self {
        let mut slab = Slab::new();
        let sentinel =
            slab.insert(Node { entry: NO_ENTRY, left: EXTERNAL, right: EXTERNAL, balance: B::EXTERNAL });
        debug_assert_eq!(sentinel, EXTERNAL);
        Nodes { slab: slab }
    }

    pub fn entry(&self, id: usize) -> usize { self.slab[id].entry }

    pub fn left(&self, id: usize) -> usize { self.slab[id].left }

    pub fn right(&self, id: usize) -> usize { self.slab[id].right }

    pub fn balance(&self, id: usize) -> B { self.slab[id].balance }

    pub fn set_left(&mut self, id: usize, left: usize) { self.node_mut(id).left = left; }

    pub fn set_right(&mut self, id: usize, right: usize) { self.node_mut(id).right = right; }

    pub fn set_balance(&mut self, id: usize, balance: B) { self.node_mut(id).balance = balance; }

    /// Puts another entry in the node's slot, keeping the node's position in the tree, and
    /// returns the entry it held.
    pub fn replace_entry(&mut self, id: usize, entry: usize) -> usize {
        replace(&mut self.node_mut(id).entry, entry)
    }

    /// Creates a leaf holding `entry`.
    pub fn attach(&mut self, entry: usize) -> usize {
        self.slab.insert(Node { entry: entry, left: EXTERNAL, right: EXTERNAL, balance: B::LEAF })
    }

    /// Releases a node, returning its entry.
    pub fn detach(&mut self, id: usize) -> usize {
        debug_assert_ne!(id, EXTERNAL);
        self.slab.remove(id).entry
    }

    /// Moves the right child up into `id`'s place, returning the new subtree root.
    ///
    /// Balance tags are left for the strategy to fix.
    pub fn rotate_left(&mut self, id: usize) -> usize {
        let right = self.right(id);
        let middle = self.left(right);
        self.set_right(id, middle);
        self.set_left(right, id);
        right
    }

    /// Moves the left child up into `id`'s place, returning the new subtree root.
    ///
    /// Balance tags are left for the strategy to fix.
    pub fn rotate_right(&mut self, id: usize) -> usize {
        let left = self.left(id);
        let middle = self.right(left);
        self.set_left(id, middle);
        self.set_right(left, id);
        left
    }

    /// Orders the entry sought by `at` against node `id`'s entry.
    pub fn locate<K, V, L>(&self, chain: &Chain<K, V>, at: &L, id: usize) -> Ordering
        where L: Locate<K> {

        at.locate(chain.key(self.entry(id)), self.right(id) != EXTERNAL)
    }

    fn node_mut(&mut self, id: usize) -> &mut Node<B> {
        debug_assert_ne!(id, EXTERNAL, "the sentinel is immutable");
        &mut self.slab[id]
    }
}

/// Returns the entry located by `at` in the subtree rooted at `id`, if any.
pub fn find<K, V, B, L>(nodes: &Nodes<B>, chain: &Chain<K, V>, at: &L, mut id: usize)
    -> Option<usize> where B: Balance, L: Locate<K> {

    loop {
        if id == EXTERNAL { return None; }
        id = match nodes.locate(chain, at, id) {
            Equal => return Some(nodes.entry(id)),
            Less => nodes.left(id),
            Greater => nodes.right(id),
        };
    }
}

/// Inserts a node holding `entry` where `at` leads, rebalancing on the way back up, and returns
/// the new subtree root.
///
/// The entry's key must be absent from the subtree.
pub fn insert<K, V, B, L>(nodes: &mut Nodes<B>, chain: &Chain<K, V>, at: &L, id: usize, entry: usize)
    -> usize where B: Balance, L: Locate<K> {

    if id == EXTERNAL { return nodes.attach(entry); }

    B::descend(nodes, id);

    match nodes.locate(chain, at, id) {
        Less => {
            let left = nodes.left(id);
            let left = insert(nodes, chain, at, left, entry);
            nodes.set_left(id, left);
        }
        Greater => {
            let right = nodes.right(id);
            let right = insert(nodes, chain, at, right, entry);
            nodes.set_right(id, right);
        }
        Equal => return id,
    }

    B::rebalance_insert(nodes, id)
}

/// Removes the node located by `at` from the subtree rooted at `id`, rebalancing on the way back
/// up. Returns the new subtree root and the removed entry, which is no longer referenced by any
/// node but is still linked into the chain.
///
/// A node with two children is not unlinked from the tree: its predecessor, the greatest entry of
/// its left subtree, is removed from that subtree instead and takes over the node's slot.
pub fn remove<K, V, B, L>(nodes: &mut Nodes<B>, chain: &Chain<K, V>, at: &L, id: usize)
    -> (usize, Option<usize>) where B: Balance, L: Locate<K> {

    if id == EXTERNAL { return (id, None); }

    let removed = match nodes.locate(chain, at, id) {
        Less => {
            let left = nodes.left(id);
            let (left, removed) = remove(nodes, chain, at, left);
            nodes.set_left(id, left);
            removed
        }
        Greater => {
            let right = nodes.right(id);
            let (right, removed) = remove(nodes, chain, at, right);
            nodes.set_right(id, right);
            removed
        }
        Equal => {
            let (left, right) = (nodes.left(id), nodes.right(id));

            if left == EXTERNAL || right == EXTERNAL {
                let child = if left == EXTERNAL { right } else { left };
                return (child, Some(nodes.detach(id)));
            }

            let (left, pred) = remove(nodes, chain, &Greatest, left);
            nodes.set_left(id, left);
            debug_assert_eq!(pred, chain.prev(nodes.entry(id)));
            pred.map(|pred| nodes.replace_entry(id, pred))
        }
    };

    (B::rebalance_remove(nodes, id), removed)
}

/// Collects the entries of the subtree rooted at `id` in in-order.
pub fn in_order<B>(nodes: &Nodes<B>, id: usize, order: &mut Vec<usize>) where B: Balance {
    if id == EXTERNAL { return; }
    in_order(nodes, nodes.left(id), order);
    order.push(nodes.entry(id));
    in_order(nodes, nodes.right(id), order);
}

pub trait Dir {
    /// Returns the child on this side.
    fn forward<B>(nodes: &Nodes<B>, id: usize) -> usize where B: Balance;

    /// Returns the child on the opposite side.
    fn backward<B>(nodes: &Nodes<B>, id: usize) -> usize where B: Balance;

    /// The order a probe has against a node lying on this side of it.
    const BEYOND: Ordering;

    /// Returns the entry furthest in this direction, if any.
    fn extremum<B>(nodes: &Nodes<B>, mut id: usize) -> Option<usize> where B: Balance {
        if id == EXTERNAL { return None; }

        loop {
            let child = Self::forward(nodes, id);
            if child == EXTERNAL { return Some(nodes.entry(id)); }
            id = child;
        }
    }

    /// Returns the entry closest to the probe on this side of it, excluding any exact match.
    fn closest<K, V, B, L>(nodes: &Nodes<B>, chain: &Chain<K, V>, at: &L, mut id: usize)
        -> Option<usize> where B: Balance, L: Locate<K> {

        let mut closest = None;

        while id != EXTERNAL {
            id = if nodes.locate(chain, at, id) == Self::BEYOND {
                closest = Some(nodes.entry(id));
                Self::backward(nodes, id)
            } else {
                Self::forward(nodes, id)
            };
        }

        closest
    }
}

pub enum Left {}

impl Dir for Left {
    const BEYOND: Ordering = Greater;

    fn forward<B>(nodes: &Nodes<B>, id: usize) -> usize where B: Balance { nodes.left(id) }
    fn backward<B>(nodes: &Nodes<B>, id: usize) -> usize where B: Balance { nodes.right(id) }
}

pub enum Right {}

impl Dir for Right {
    const BEYOND: Ordering = Less;

    fn forward<B>(nodes: &Nodes<B>, id: usize) -> usize where B: Balance { nodes.right(id) }
    fn backward<B>(nodes: &Nodes<B>, id: usize) -> usize where B: Balance { nodes.left(id) }
}
