use crate::entry::Chain;
use crate::locate::{Greatest, Locate};
use crate::node::{Nodes, EXTERNAL};
use std::cmp::Ordering::*;
use super::Balance;

/// The color of the link from a node's parent to the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// The node and its parent form one 3-node of the equivalent 2-3 tree.
    Red,
    /// An ordinary link between two vertices of the equivalent 2-3 tree.
    Black,
}

/// Metadata for the left-leaning red-black balance scheme: the color of the link from the node's
/// parent.
///
/// Every root-to-leaf path crosses the same number of black links, the sentinel is black, no red
/// link has a red link directly below it, and red links only ever point left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Llrb(Color);

impl Llrb {
    /// Returns the color of the link from the node's parent.
    pub fn color(&self) -> Color { self.0 }
}

fn is_red(nodes: &Nodes<Llrb>, id: usize) -> bool { nodes.balance(id).0 == Color::Red }

fn paint(nodes: &mut Nodes<Llrb>, id: usize, color: Color) { nodes.set_balance(id, Llrb(color)); }

fn toggle(nodes: &mut Nodes<Llrb>, id: usize) {
    let color = if is_red(nodes, id) { Color::Black } else { Color::Red };
    paint(nodes, id, color);
}

// Pushes a red link one level up, or pulls one down when applied the other way around.
fn flip(nodes: &mut Nodes<Llrb>, id: usize) {
    toggle(nodes, id);
    toggle(nodes, nodes.left(id));
    toggle(nodes, nodes.right(id));
}

// Turns a right-leaning red link into a left-leaning one.
fn rotate_left(nodes: &mut Nodes<Llrb>, id: usize) -> usize {
    let color = nodes.balance(id).0;
    let root = nodes.rotate_left(id);
    paint(nodes, root, color);
    paint(nodes, id, Color::Red);
    root
}

fn rotate_right(nodes: &mut Nodes<Llrb>, id: usize) -> usize {
    let color = nodes.balance(id).0;
    let root = nodes.rotate_right(id);
    paint(nodes, root, color);
    paint(nodes, id, Color::Red);
    root
}

fn fix_up(nodes: &mut Nodes<Llrb>, mut id: usize) -> usize {
    if is_red(nodes, nodes.right(id)) {
        id = rotate_left(nodes, id);
    }
    if is_red(nodes, nodes.left(id)) && is_red(nodes, nodes.left(nodes.left(id))) {
        id = rotate_right(nodes, id);
    }
    if is_red(nodes, nodes.left(id)) && is_red(nodes, nodes.right(id)) {
        flip(nodes, id);
    }
    id
}

// Requires `id` red, or both of its children real. Leaves `id.left` or one of its children red.
fn move_red_left(nodes: &mut Nodes<Llrb>, mut id: usize) -> usize {
    flip(nodes, id);
    let right = nodes.right(id);
    if is_red(nodes, nodes.left(right)) {
        let right = rotate_right(nodes, right);
        nodes.set_right(id, right);
        id = rotate_left(nodes, id);
        flip(nodes, id);
    }
    id
}

// Leaves `id.right` or one of its children red.
fn move_red_right(nodes: &mut Nodes<Llrb>, mut id: usize) -> usize {
    flip(nodes, id);
    if is_red(nodes, nodes.left(nodes.left(id))) {
        id = rotate_right(nodes, id);
        flip(nodes, id);
    }
    id
}

// Returns the number of black links on every path below the link into `id`, or `None` if paths
// disagree or a red link is misplaced.
fn black_height(nodes: &Nodes<Llrb>, id: usize) -> Option<usize> {
    if id == EXTERNAL { return Some(0); }

    let (left, right) = (nodes.left(id), nodes.right(id));
    if is_red(nodes, right) || (is_red(nodes, id) && is_red(nodes, left)) { return None; }

    let height = black_height(nodes, left)?;
    if black_height(nodes, right)? != height { return None; }

    Some(if is_red(nodes, id) { height } else { height + 1 })
}

impl Balance for Llrb {
    const EXTERNAL: Llrb = Llrb(Color::Black);
    const LEAF: Llrb = Llrb(Color::Red);

    fn descend(nodes: &mut Nodes<Llrb>, id: usize) {
        if is_red(nodes, nodes.left(id)) && is_red(nodes, nodes.right(id)) {
            flip(nodes, id);
        }
    }

    fn rebalance_insert(nodes: &mut Nodes<Llrb>, id: usize) -> usize { fix_up(nodes, id) }

    fn rebalance_remove(nodes: &mut Nodes<Llrb>, id: usize) -> usize { fix_up(nodes, id) }

    fn prepare_remove(nodes: &mut Nodes<Llrb>, root: usize) {
        if root != EXTERNAL && !is_red(nodes, nodes.left(root)) && !is_red(nodes, nodes.right(root)) {
            paint(nodes, root, Color::Red);
        }
    }

    // On the way down, every visited node is red or has a red left child, so that the node finally
    // removed never is the sole link of a 2-node.
    fn remove<K, V, L>(nodes: &mut Nodes<Llrb>, chain: &Chain<K, V>, at: &L, id: usize)
        -> (usize, Option<usize>) where L: Locate<K> {

        if id == EXTERNAL { return (id, None); }

        let mut id = id;
        let order = nodes.locate(chain, at, id);

        let removed = if order == Greater {
            if is_red(nodes, nodes.left(id)) {
                id = rotate_right(nodes, id);
            }

            let right = nodes.right(id);
            if right == EXTERNAL { return (fix_up(nodes, id), None); }

            if !is_red(nodes, right) && !is_red(nodes, nodes.left(right)) {
                id = move_red_right(nodes, id);
            }

            let right = nodes.right(id);
            let (right, removed) = Self::remove(nodes, chain, at, right);
            nodes.set_right(id, right);
            removed
        } else if order == Equal && (nodes.left(id) == EXTERNAL || nodes.right(id) == EXTERNAL) {
            // The other child is absent or a red leaf; it takes over the link into this node.
            let (left, right) = (nodes.left(id), nodes.right(id));
            let child = if left == EXTERNAL { right } else { left };
            if child != EXTERNAL {
                let color = nodes.balance(id).0;
                paint(nodes, child, color);
            }
            return (child, Some(nodes.detach(id)));
        } else {
            let left = nodes.left(id);
            if left == EXTERNAL { return (id, None); }

            if !is_red(nodes, left) && !is_red(nodes, nodes.left(left)) {
                id = move_red_left(nodes, id);
            }

            let left = nodes.left(id);
            if nodes.locate(chain, at, id) == Equal {
                let (left, pred) = Self::remove(nodes, chain, &Greatest, left);
                nodes.set_left(id, left);
                pred.map(|pred| nodes.replace_entry(id, pred))
            } else {
                let (left, removed) = Self::remove(nodes, chain, at, left);
                nodes.set_left(id, left);
                removed
            }
        };

        (fix_up(nodes, id), removed)
    }

    fn settle(nodes: &mut Nodes<Llrb>, root: usize) {
        if root != EXTERNAL { paint(nodes, root, Color::Black); }
    }

    fn check(nodes: &Nodes<Llrb>, root: usize) -> bool {
        nodes.balance(EXTERNAL) == Llrb::EXTERNAL && !is_red(nodes, root) &&
            black_height(nodes, root).is_some()
    }
}

#[cfg(test)]
mod test {
    use crate::RbTree;
    use super::Color;

    fn tree(keys: &[u32]) -> RbTree<u32, ()> {
        let mut tree = RbTree::new();
        for &key in keys {
            tree.insert(key, ());
            assert!(tree.validate());
        }
        tree
    }

    fn keys(tree: &RbTree<u32, ()>) -> Vec<u32> { tree.iter().map(|e| *e.0).collect() }

    #[test]
    fn right_leaning_red_rotates_left() {
        let tree = tree(&[1, 2]);
        assert_eq!(tree.sketch(), "(2 1 -)");
        assert_eq!(tree.root_color(), Some(Color::Black));
    }

    #[test]
    fn stacked_reds_split() {
        let tree = tree(&[3, 2, 1]);
        assert_eq!(tree.sketch(), "(2 1 3)");
        assert_eq!(keys(&tree), [1, 2, 3]);
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let tree = tree(&(0..255).collect::<Vec<_>>());
        assert!(tree.height() <= 2 * 8);
        assert_eq!(keys(&tree), (0..255).collect::<Vec<_>>());
    }

    #[test]
    fn delete_leaf_and_inner_nodes() {
        let mut tree = tree(&[5, 3, 8, 1, 4, 7, 9]);

        assert_eq!(tree.delete(&3), Some((3, ())));
        assert!(tree.validate());
        assert_eq!(tree.delete(&8), Some((8, ())));
        assert!(tree.validate());
        assert_eq!(keys(&tree), [1, 4, 5, 7, 9]);

        assert_eq!(tree.delete(&5), Some((5, ())));
        assert!(tree.validate());
        assert_eq!(keys(&tree), [1, 4, 7, 9]);
    }

    #[test]
    fn delete_absent_leaves_tree_untouched() {
        let mut tree = tree(&[5, 3, 8, 1, 4, 7, 9]);
        let before = tree.sketch();
        assert_eq!(tree.delete(&6), None);
        assert_eq!(tree.sketch(), before);
    }

    #[test]
    fn delete_down_to_empty() {
        let mut tree = tree(&(0..64).collect::<Vec<_>>());

        for key in (0..64).filter(|k| k % 3 == 0).chain((0..64).filter(|k| k % 3 != 0)) {
            assert_eq!(tree.delete(&key), Some((key, ())));
            assert!(tree.validate(), "invalid after deleting {}", key);
            assert_eq!(tree.find(&key).map(|e| *e.key()), None);
        }

        assert!(tree.is_empty());
        assert_eq!(tree.find_min().map(|e| *e.key()), None);
        assert_eq!(tree.find_max().map(|e| *e.key()), None);
    }

    #[test]
    fn delete_max_and_min_repeatedly() {
        let mut tree = tree(&(0..40).collect::<Vec<_>>());

        for i in 0..20 {
            assert_eq!(tree.delete(&(39 - i)), Some((39 - i, ())));
            assert!(tree.validate());
            assert_eq!(tree.delete(&i), Some((i, ())));
            assert!(tree.validate());
        }

        assert!(tree.is_empty());
    }
}
