use crate::entry::Chain;
use crate::locate::{Greatest, Locate};
use std::cmp::Ordering::*;
use std::mem::replace;

/// A vertex of an (a,b)-tree: sorted entry ids and, unless it is a leaf, one more child than
/// entries. Every key in `children[i]` lies between `entries[i - 1]` and `entries[i]`.
#[derive(Clone, Debug, Default)]
pub struct Vertex {
    pub entries: Vec<usize>,
    pub children: Vec<Vertex>,
}

impl Vertex {
    pub fn leaf() -> Self { Vertex::default() }

    pub fn is_leaf(&self) -> bool { self.children.is_empty() }

    /// Returns `Ok(i)` if `entries[i]` is the sought entry, or `Err(i)` if it can only be in
    /// `children[i]`.
    pub fn search<K, V, L>(&self, chain: &Chain<K, V>, at: &L) -> Result<usize, usize>
        where L: Locate<K> {

        let len = self.entries.len();

        for (i, &entry) in self.entries.iter().enumerate() {
            match at.locate(chain.key(entry), !self.is_leaf() || i + 1 < len) {
                Less => return Err(i),
                Equal => return Ok(i),
                Greater => {}
            }
        }

        Err(len)
    }

    pub fn find<K, V, L>(&self, chain: &Chain<K, V>, at: &L) -> Option<usize> where L: Locate<K> {
        let mut vertex = self;

        loop {
            match vertex.search(chain, at) {
                Ok(i) => return Some(vertex.entries[i]),
                Err(_) if vertex.is_leaf() => return None,
                Err(i) => vertex = &vertex.children[i],
            }
        }
    }

    /// Returns the greatest entry strictly below the probe.
    pub fn lower<K, V, L>(&self, chain: &Chain<K, V>, at: &L) -> Option<usize> where L: Locate<K> {
        let (mut vertex, mut closest) = (self, None);

        loop {
            let i = vertex.search(chain, at).unwrap_or_else(|i| i);
            if i > 0 { closest = Some(vertex.entries[i - 1]); }
            if vertex.is_leaf() { return closest; }
            vertex = &vertex.children[i];
        }
    }

    /// Returns the least entry strictly above the probe.
    pub fn higher<K, V, L>(&self, chain: &Chain<K, V>, at: &L) -> Option<usize> where L: Locate<K> {
        let (mut vertex, mut closest) = (self, None);

        loop {
            let i = match vertex.search(chain, at) { Ok(i) => i + 1, Err(i) => i };
            if let Some(&entry) = vertex.entries.get(i) { closest = Some(entry); }
            if vertex.is_leaf() { return closest; }
            vertex = &vertex.children[i];
        }
    }

    pub fn first(&self) -> Option<usize> {
        let mut vertex = self;
        while let Some(child) = vertex.children.first() { vertex = child; }
        vertex.entries.first().cloned()
    }

    pub fn last(&self) -> Option<usize> {
        let mut vertex = self;
        while let Some(child) = vertex.children.last() { vertex = child; }
        vertex.entries.last().cloned()
    }

    /// Inserts `entry` into the leaf `at` leads to, splitting every vertex on the way back up that
    /// reaches `b` entries. Returns the median and the new right sibling if this vertex split.
    pub fn insert<K, V, L>(&mut self, chain: &Chain<K, V>, at: &L, entry: usize, b: usize)
        -> Option<(usize, Vertex)> where L: Locate<K> {

        match self.search(chain, at) {
            Ok(_) => return None,
            Err(i) if self.is_leaf() => self.entries.insert(i, entry),
            Err(i) => {
                if let Some((median, right)) = self.children[i].insert(chain, at, entry, b) {
                    self.entries.insert(i, median);
                    self.children.insert(i + 1, right);
                }
            }
        }

        if self.entries.len() < b { return None; }

        let mid = self.entries.len() / 2;
        let entries = self.entries.split_off(mid + 1);
        let children = if self.is_leaf() { vec![] } else { self.children.split_off(mid + 1) };
        let median = self.entries.remove(mid);

        Some((median, Vertex { entries: entries, children: children }))
    }

    /// Removes the entry `at` leads to from this subtree, restoring every child on the way back up
    /// that fell below `a - 1` entries. The vertex itself may be left short; its parent, or the
    /// tree for the root, deals with that.
    pub fn remove<K, V, L>(&mut self, chain: &Chain<K, V>, at: &L, a: usize) -> Option<usize>
        where L: Locate<K> {

        let (i, removed) = match self.search(chain, at) {
            Ok(i) if self.is_leaf() => return Some(self.entries.remove(i)),
            Err(_) if self.is_leaf() => return None,
            Ok(i) => {
                // The predecessor takes over the slot; the chain already has it in place.
                let pred = self.children[i].remove(chain, &Greatest, a);
                (i, pred.map(|pred| replace(&mut self.entries[i], pred)))
            }
            Err(i) => (i, self.children[i].remove(chain, at, a)),
        };

        if self.children[i].entries.len() < a - 1 { self.restore(i, a); }

        removed
    }

    // Refills `children[i]` from a sibling with entries to spare, or else merges it with one.
    fn restore(&mut self, i: usize, a: usize) {
        if i > 0 && self.children[i - 1].entries.len() > a - 1 {
            self.rotate_right(i);
        } else if i + 1 < self.children.len() && self.children[i + 1].entries.len() > a - 1 {
            self.rotate_left(i);
        } else if i > 0 {
            self.merge(i - 1);
        } else {
            self.merge(i);
        }
    }

    // Moves the last entry of `children[i - 1]` up and the separator down into `children[i]`.
    fn rotate_right(&mut self, i: usize) {
        let (left, right) = self.children.split_at_mut(i);
        let (left, child) = (&mut left[i - 1], &mut right[0]);

        if let Some(entry) = left.entries.pop() {
            let separator = replace(&mut self.entries[i - 1], entry);
            child.entries.insert(0, separator);
            if let Some(grandchild) = left.children.pop() { child.children.insert(0, grandchild); }
        }
    }

    // Moves the first entry of `children[i + 1]` up and the separator down into `children[i]`.
    fn rotate_left(&mut self, i: usize) {
        let (left, right) = self.children.split_at_mut(i + 1);
        let (child, right) = (&mut left[i], &mut right[0]);

        if !right.entries.is_empty() {
            let separator = replace(&mut self.entries[i], right.entries.remove(0));
            child.entries.push(separator);
            if !right.is_leaf() { child.children.push(right.children.remove(0)); }
        }
    }

    // Folds `children[i + 1]` and the separator between them into `children[i]`.
    fn merge(&mut self, i: usize) {
        let right = self.children.remove(i + 1);
        let separator = self.entries.remove(i);
        let left = &mut self.children[i];

        left.entries.push(separator);
        left.entries.extend(right.entries);
        left.children.extend(right.children);
    }

    /// Checks occupancy and shape, returning the depth of the subtree's leaves.
    pub fn check(&self, a: usize, b: usize, root: bool) -> Option<usize> {
        let len = self.entries.len();
        if len > b - 1 || (!root && len < a - 1) { return None; }

        if self.is_leaf() { return Some(0); }
        if len == 0 || self.children.len() != len + 1 { return None; }

        let mut depth = None;
        for child in &self.children {
            let d = child.check(a, b, false)?;
            if *depth.get_or_insert(d) != d { return None; }
        }

        depth.map(|d| d + 1)
    }

    pub fn in_order(&self, order: &mut Vec<usize>) {
        for (i, &entry) in self.entries.iter().enumerate() {
            if let Some(child) = self.children.get(i) { child.in_order(order); }
            order.push(entry);
        }
        if let Some(child) = self.children.get(self.entries.len()) { child.in_order(order); }
    }
}
