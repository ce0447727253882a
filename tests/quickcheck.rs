use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use std::collections::BTreeMap;

/// An operation on a container, mirrored on a `BTreeMap`.
#[derive(Clone, Debug)]
pub enum Op {
    Insert(u8, u16),
    Delete(u8),
    Find(u8),
}

impl Arbitrary for Op {
    fn arbitrary(gen: &mut Gen) -> Self {
        match u8::arbitrary(gen) % 3 {
            0 => Op::Insert(u8::arbitrary(gen), u16::arbitrary(gen)),
            1 => Op::Delete(u8::arbitrary(gen)),
            _ => Op::Find(u8::arbitrary(gen)),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> {
        match *self {
            Op::Insert(k, v) => Box::new((k, v).shrink().map(|(k, v)| Op::Insert(k, v))),
            Op::Delete(k) => Box::new(k.shrink().map(Op::Delete)),
            Op::Find(k) => Box::new(k.shrink().map(Op::Find)),
        }
    }
}

macro_rules! search_tree_tests {
    ($name:ident, $Tree:ty, $new:expr) => {
        mod $name {
            use baltree::SearchTree;
            use ::quickcheck::TestResult;
            use quickcheck_macros::quickcheck;
            use std::collections::BTreeMap;
            use super::Op;

            type Tree = $Tree;

            fn new() -> Tree { $new }

            #[quickcheck]
            fn agrees_with_btree_map(ops: Vec<Op>) -> bool {
                let mut tree = new();
                let mut model = BTreeMap::new();

                ops.into_iter().all(|op| match op {
                    Op::Insert(k, v) => {
                        let fresh = !model.contains_key(&k);
                        if fresh { model.insert(k, v); }
                        tree.insert(k, v) == fresh && tree.validate()
                    }
                    Op::Delete(k) => tree.delete(&k) == model.remove(&k).map(|v| (k, v)) &&
                                     tree.validate(),
                    Op::Find(k) => tree.find(&k).map(|e| *e.value()) == model.get(&k).cloned(),
                }) && tree.len() == model.len() &&
                    tree.iter().map(|(k, v)| (*k, *v)).eq(model.into_iter())
            }

            #[quickcheck]
            fn listings_mirror_each_other(tree: Tree) -> bool {
                let mut ascending = vec![];
                let mut entry = tree.find_min();
                while let Some(e) = entry {
                    ascending.push(*e.key());
                    entry = e.successor();
                }

                let mut descending = vec![];
                let mut entry = tree.find_max();
                while let Some(e) = entry {
                    descending.push(*e.key());
                    entry = e.predecessor();
                }

                descending.reverse();
                ascending == descending &&
                    ascending.windows(2).all(|w| w[0] < w[1]) &&
                    ascending.len() == tree.len() &&
                    tree.iter().rev().map(|e| *e.0).eq(ascending.iter().rev().cloned())
            }

            #[quickcheck]
            fn insert_is_idempotent(tree: Tree, key: u8, value: u16) -> bool {
                let mut tree = tree;
                tree.insert(key, value);
                let once: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
                !tree.insert(key, value.wrapping_add(1)) &&
                    tree.iter().map(|(k, v)| (*k, *v)).eq(once.into_iter())
            }

            #[quickcheck]
            fn delete_is_idempotent(tree: Tree, key: u8) -> bool {
                let mut tree = tree;
                tree.delete(&key);
                let once: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
                tree.delete(&key).is_none() &&
                    tree.iter().map(|(k, v)| (*k, *v)).eq(once.into_iter()) &&
                    tree.validate()
            }

            #[quickcheck]
            fn delete_unlinks_only_its_key(tree: Tree, index: usize) -> TestResult {
                if tree.is_empty() { return TestResult::discard(); }

                let mut tree = tree;
                let key = *tree.iter().nth(index % tree.len()).unwrap().0;
                let before = tree.find(&key).and_then(|e| e.predecessor()).map(|e| *e.key());
                let after = tree.find(&key).and_then(|e| e.successor()).map(|e| *e.key());
                let others: Vec<_> = tree.iter().map(|e| *e.0).filter(|&k| k != key).collect();

                tree.delete(&key);

                let linked = match (before, after) {
                    (Some(b), Some(a)) =>
                        tree.find(&b).and_then(|e| e.successor()).map(|e| *e.key()) == Some(a),
                    (Some(b), None) => tree.find_max().map(|e| *e.key()) == Some(b),
                    (None, Some(a)) => tree.find_min().map(|e| *e.key()) == Some(a),
                    (None, None) => tree.is_empty(),
                };

                TestResult::from_bool(
                    linked && tree.find(&key).is_none() &&
                    tree.iter().map(|e| *e.0).eq(others.into_iter()))
            }

            #[test]
            fn round_trip() {
                let mut tree = new();
                for &k in &[5, 3, 8, 1, 4, 7, 9] { assert!(tree.insert(k, 0)); }
                assert_eq!(tree.delete(&3), Some((3, 0)));
                assert_eq!(tree.delete(&8), Some((8, 0)));
                assert!(tree.validate());

                let keys: Vec<u8> = tree.iter().map(|e| *e.0).collect();
                assert_eq!(keys, [1, 4, 5, 7, 9]);

                let mut entry = tree.find_max();
                let mut descending = vec![];
                while let Some(e) = entry {
                    descending.push(*e.key());
                    entry = e.predecessor();
                }
                assert_eq!(descending, [9, 7, 5, 4, 1]);
            }

            #[test]
            fn empty_tree() {
                let mut tree = new();
                assert!(tree.is_empty());
                assert!(tree.find_min().is_none());
                assert!(tree.find_max().is_none());
                assert!(tree.find(&0).is_none());
                assert_eq!(tree.delete(&0), None);
                assert_eq!(SearchTree::iter(&tree).next(), None);
                assert!(tree.validate());
            }
        }
    }
}

search_tree_tests!(avl, baltree::AvlTree<u8, u16>, baltree::AvlTree::new());
search_tree_tests!(rb, baltree::RbTree<u8, u16>, baltree::RbTree::new());
search_tree_tests!(ab, baltree::AbTree<u8, u16>, baltree::AbTree::new());
search_tree_tests!(ab_3_6, baltree::AbTree<u8, u16>, baltree::AbTree::with_params(3, 6).unwrap());

#[quickcheck]
fn containers_agree(ops: Vec<Op>) -> TestResult {
    use baltree::{AbTree, AvlTree, RbTree};

    if ops.is_empty() { return TestResult::discard(); }

    let (mut avl, mut rb, mut ab) = (AvlTree::new(), RbTree::new(), AbTree::new());
    let mut model = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                avl.insert(k, v);
                rb.insert(k, v);
                ab.insert(k, v);
                model.entry(k).or_insert(v);
            }
            Op::Delete(k) => {
                avl.delete(&k);
                rb.delete(&k);
                ab.delete(&k);
                model.remove(&k);
            }
            Op::Find(_) => {}
        }
    }

    let expected: Vec<_> = model.iter().collect();
    TestResult::from_bool(
        avl.iter().collect::<Vec<_>>() == expected &&
        rb.iter().collect::<Vec<_>>() == expected &&
        ab.iter().collect::<Vec<_>>() == expected)
}
