use crate::node::{Nodes, EXTERNAL};
use std::cmp::max;
use super::Balance;

/// Metadata for the AVL balance scheme: the height of the node's subtree.
///
/// The sentinel has height 0 and a new leaf height 1. Every node keeps
/// `|height(left) - height(right)| <= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Avl(usize);

impl Avl {
    /// Returns the height of the subtree rooted at the node.
    pub fn height(&self) -> usize { self.0 }
}

fn height(nodes: &Nodes<Avl>, id: usize) -> usize { nodes.balance(id).0 }

// height(left) - height(right)
fn skew(nodes: &Nodes<Avl>, id: usize) -> isize {
    height(nodes, nodes.left(id)) as isize - height(nodes, nodes.right(id)) as isize
}

fn update(nodes: &mut Nodes<Avl>, id: usize) {
    let height = 1 + max(height(nodes, nodes.left(id)), height(nodes, nodes.right(id)));
    nodes.set_balance(id, Avl(height));
}

fn rotate_left(nodes: &mut Nodes<Avl>, id: usize) -> usize {
    let root = nodes.rotate_left(id);
    update(nodes, id);
    update(nodes, root);
    root
}

fn rotate_right(nodes: &mut Nodes<Avl>, id: usize) -> usize {
    let root = nodes.rotate_right(id);
    update(nodes, id);
    update(nodes, root);
    root
}

// A heavy child leaning neither way only arises after a removal; a single rotation settles it.
fn rebalance(nodes: &mut Nodes<Avl>, id: usize) -> usize {
    let skew = skew(nodes, id);

    let root = if skew > 1 {
        let left = nodes.left(id);
        if self::skew(nodes, left) < 0 {
            let left = rotate_left(nodes, left);
            nodes.set_left(id, left);
        }
        rotate_right(nodes, id)
    } else if skew < -1 {
        let right = nodes.right(id);
        if self::skew(nodes, right) > 0 {
            let right = rotate_right(nodes, right);
            nodes.set_right(id, right);
        }
        rotate_left(nodes, id)
    } else {
        id
    };

    update(nodes, root);
    root
}

fn check(nodes: &Nodes<Avl>, id: usize) -> Option<usize> {
    if id == EXTERNAL { return Some(0); }

    let left = check(nodes, nodes.left(id))?;
    let right = check(nodes, nodes.right(id))?;
    let height = 1 + max(left, right);

    if (left as isize - right as isize).abs() > 1 || nodes.balance(id) != Avl(height) {
        None
    } else {
        Some(height)
    }
}

impl Balance for Avl {
    const EXTERNAL: Avl = Avl(0);
    const LEAF: Avl = Avl(1);

    fn rebalance_insert(nodes: &mut Nodes<Avl>, id: usize) -> usize { rebalance(nodes, id) }

    fn rebalance_remove(nodes: &mut Nodes<Avl>, id: usize) -> usize { rebalance(nodes, id) }

    fn check(nodes: &Nodes<Avl>, root: usize) -> bool {
        nodes.balance(EXTERNAL) == Avl::EXTERNAL && check(nodes, root).is_some()
    }
}
