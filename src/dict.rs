// Copyright 2025 Lars Brubaker
// License: MIT
//
// Ordered set used as the sweep-line status structure.
//
// An AVL tree whose nodes live in a BucketAlloc arena and link to each other
// by index (left/right/parent). Node handles (NodeIdx) stay valid until the
// node holding that key is removed; removing a node never moves any other
// key to a different handle.
//
// The comparison function is passed to each call instead of being stored:
// it reads sweep events that the caller keeps mutating between calls.

use std::cmp::Ordering;

use crate::bucketalloc::BucketAlloc;
use crate::error::ClipError;

/// Index into the set's node arena.
pub type NodeIdx = u32;

/// Null link.
pub const INVALID: NodeIdx = u32::MAX;

#[derive(Clone, Debug)]
struct DictNode<K> {
    key: K,
    left: NodeIdx,
    right: NodeIdx,
    parent: NodeIdx,
    height: i32,
}

/// A self-balancing ordered set with positional node handles.
///
/// Keys that compare equal are kept in insertion order (a new key goes after
/// existing equal keys). `find` returns any one of them.
#[derive(Clone, Debug)]
pub struct OrderedSet<K> {
    nodes: BucketAlloc<DictNode<K>>,
    root: NodeIdx,
}

impl<K: Copy> OrderedSet<K> {
    pub fn new() -> Self {
        OrderedSet {
            nodes: BucketAlloc::new(),
            root: INVALID,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root == INVALID
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = INVALID;
    }

    /// Key stored at `node`. The handle must be live.
    #[inline]
    pub fn key(&self, node: NodeIdx) -> K {
        self.nodes[node].key
    }

    /// True while `node` refers to a key still in the set.
    #[inline]
    pub fn contains_node(&self, node: NodeIdx) -> bool {
        self.nodes.is_live(node)
    }

    /// Height of the whole tree; 0 when empty.
    #[inline]
    pub fn height(&self) -> i32 {
        self.h(self.root)
    }

    // ─────── Queries ──────────────────────────────────────────────────────────

    pub fn find<F>(&self, key: K, cmp: &F) -> Option<NodeIdx>
    where
        F: Fn(K, K) -> Ordering,
    {
        let mut cur = self.root;
        while cur != INVALID {
            match cmp(key, self.nodes[cur].key) {
                Ordering::Less => cur = self.nodes[cur].left,
                Ordering::Greater => cur = self.nodes[cur].right,
                Ordering::Equal => return Some(cur),
            }
        }
        None
    }

    pub fn min(&self) -> Result<NodeIdx, ClipError> {
        if self.root == INVALID {
            return Err(ClipError::EmptyContainer);
        }
        Ok(self.leftmost(self.root))
    }

    pub fn max(&self) -> Result<NodeIdx, ClipError> {
        if self.root == INVALID {
            return Err(ClipError::EmptyContainer);
        }
        Ok(self.rightmost(self.root))
    }

    pub fn predecessor(&self, node: NodeIdx) -> Option<NodeIdx> {
        let n = &self.nodes[node];
        if n.left != INVALID {
            return Some(self.rightmost(n.left));
        }
        let mut child = node;
        let mut parent = n.parent;
        while parent != INVALID && self.nodes[parent].left == child {
            child = parent;
            parent = self.nodes[parent].parent;
        }
        (parent != INVALID).then_some(parent)
    }

    pub fn successor(&self, node: NodeIdx) -> Option<NodeIdx> {
        let n = &self.nodes[node];
        if n.right != INVALID {
            return Some(self.leftmost(n.right));
        }
        let mut child = node;
        let mut parent = n.parent;
        while parent != INVALID && self.nodes[parent].right == child {
            child = parent;
            parent = self.nodes[parent].parent;
        }
        (parent != INVALID).then_some(parent)
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_, K> {
        let next = if self.root == INVALID {
            None
        } else {
            Some(self.leftmost(self.root))
        };
        Iter { set: self, next }
    }

    // ─────── Mutation ─────────────────────────────────────────────────────────

    /// Insert `key` at its sorted position and return its handle.
    pub fn insert<F>(&mut self, key: K, cmp: &F) -> NodeIdx
    where
        F: Fn(K, K) -> Ordering,
    {
        let mut parent = INVALID;
        let mut go_left = false;
        let mut cur = self.root;
        while cur != INVALID {
            parent = cur;
            go_left = cmp(key, self.nodes[cur].key) == Ordering::Less;
            cur = if go_left {
                self.nodes[cur].left
            } else {
                self.nodes[cur].right
            };
        }

        let idx = self.nodes.alloc(DictNode {
            key,
            left: INVALID,
            right: INVALID,
            parent,
            height: 1,
        });

        if parent == INVALID {
            self.root = idx;
        } else if go_left {
            self.nodes[parent].left = idx;
        } else {
            self.nodes[parent].right = idx;
        }
        self.rebalance_from(parent);
        idx
    }

    /// Remove the node holding a key equal to `key`. Returns false if absent.
    pub fn remove<F>(&mut self, key: K, cmp: &F) -> bool
    where
        F: Fn(K, K) -> Ordering,
    {
        match self.find(key, cmp) {
            Some(node) => self.remove_node(node),
            None => false,
        }
    }

    /// Remove the node behind `node`. Returns false for a stale handle.
    ///
    /// A node with two children trades places with its in-order successor
    /// (relinking, not copying keys), so every other handle keeps pointing at
    /// the same key. The removed handle is freed and may be recycled by a
    /// later insert.
    pub fn remove_node(&mut self, node: NodeIdx) -> bool {
        if !self.nodes.is_live(node) {
            return false;
        }
        let DictNode {
            left,
            right,
            parent,
            height,
            ..
        } = self.nodes[node];

        let rebalance_start;
        if left != INVALID && right != INVALID {
            let succ = self.leftmost(right);
            if succ == right {
                self.nodes[succ].left = left;
                self.nodes[left].parent = succ;
                rebalance_start = succ;
            } else {
                let succ_parent = self.nodes[succ].parent;
                let succ_right = self.nodes[succ].right;
                self.nodes[succ_parent].left = succ_right;
                if succ_right != INVALID {
                    self.nodes[succ_right].parent = succ_parent;
                }
                self.nodes[succ].right = right;
                self.nodes[right].parent = succ;
                self.nodes[succ].left = left;
                self.nodes[left].parent = succ;
                rebalance_start = succ_parent;
            }
            self.nodes[succ].height = height;
            self.nodes[succ].parent = parent;
            self.replace_child(parent, node, succ);
        } else {
            let child = if left != INVALID { left } else { right };
            if child != INVALID {
                self.nodes[child].parent = parent;
            }
            self.replace_child(parent, node, child);
            rebalance_start = parent;
        }

        self.nodes.free(node);
        self.rebalance_from(rebalance_start);
        true
    }

    /// Check parent links, heights, balance and ordering. Used by tests.
    pub fn is_valid<F>(&self, cmp: &F) -> bool
    where
        F: Fn(K, K) -> Ordering,
    {
        if self.root != INVALID && self.nodes[self.root].parent != INVALID {
            return false;
        }
        if self.check_subtree(self.root).is_none() {
            return false;
        }
        let keys: Vec<K> = self.iter().collect();
        keys.len() == self.len()
            && keys.windows(2).all(|w| cmp(w[0], w[1]) != Ordering::Greater)
    }

    // ─────── Internals ────────────────────────────────────────────────────────

    #[inline]
    fn h(&self, node: NodeIdx) -> i32 {
        if node == INVALID {
            0
        } else {
            self.nodes[node].height
        }
    }

    #[inline]
    fn balance(&self, node: NodeIdx) -> i32 {
        let n = &self.nodes[node];
        self.h(n.left) - self.h(n.right)
    }

    #[inline]
    fn update_height(&mut self, node: NodeIdx) {
        let n = &self.nodes[node];
        let h = 1 + self.h(n.left).max(self.h(n.right));
        self.nodes[node].height = h;
    }

    fn leftmost(&self, mut node: NodeIdx) -> NodeIdx {
        while self.nodes[node].left != INVALID {
            node = self.nodes[node].left;
        }
        node
    }

    fn rightmost(&self, mut node: NodeIdx) -> NodeIdx {
        while self.nodes[node].right != INVALID {
            node = self.nodes[node].right;
        }
        node
    }

    fn replace_child(&mut self, parent: NodeIdx, old: NodeIdx, new: NodeIdx) {
        if parent == INVALID {
            self.root = new;
        } else if self.nodes[parent].left == old {
            self.nodes[parent].left = new;
        } else {
            debug_assert_eq!(self.nodes[parent].right, old);
            self.nodes[parent].right = new;
        }
    }

    fn rotate_left(&mut self, x: NodeIdx) -> NodeIdx {
        let y = self.nodes[x].right;
        let y_left = self.nodes[y].left;
        let parent = self.nodes[x].parent;

        self.nodes[x].right = y_left;
        if y_left != INVALID {
            self.nodes[y_left].parent = x;
        }
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, y);
        self.nodes[y].left = x;
        self.nodes[x].parent = y;

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rotate_right(&mut self, x: NodeIdx) -> NodeIdx {
        let y = self.nodes[x].left;
        let y_right = self.nodes[y].right;
        let parent = self.nodes[x].parent;

        self.nodes[x].left = y_right;
        if y_right != INVALID {
            self.nodes[y_right].parent = x;
        }
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, y);
        self.nodes[y].right = x;
        self.nodes[x].parent = y;

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Restore heights and the AVL balance invariant from `node` up to the root.
    fn rebalance_from(&mut self, mut node: NodeIdx) {
        while node != INVALID {
            self.update_height(node);
            let bf = self.balance(node);
            if bf > 1 {
                let left = self.nodes[node].left;
                if self.balance(left) < 0 {
                    self.rotate_left(left);
                }
                node = self.rotate_right(node);
            } else if bf < -1 {
                let right = self.nodes[node].right;
                if self.balance(right) > 0 {
                    self.rotate_right(right);
                }
                node = self.rotate_left(node);
            }
            node = self.nodes[node].parent;
        }
    }

    /// Returns the subtree height if consistent.
    fn check_subtree(&self, node: NodeIdx) -> Option<i32> {
        if node == INVALID {
            return Some(0);
        }
        let n = &self.nodes[node];
        for child in [n.left, n.right] {
            if child != INVALID && self.nodes[child].parent != node {
                return None;
            }
        }
        let hl = self.check_subtree(n.left)?;
        let hr = self.check_subtree(n.right)?;
        if (hl - hr).abs() > 1 || n.height != 1 + hl.max(hr) {
            return None;
        }
        Some(n.height)
    }
}

impl<K: Copy> Default for OrderedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator returned by [`OrderedSet::iter`].
pub struct Iter<'a, K> {
    set: &'a OrderedSet<K>,
    next: Option<NodeIdx>,
}

impl<K: Copy> Iterator for Iter<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let node = self.next?;
        self.next = self.set.successor(node);
        Some(self.set.key(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: i32, b: i32) -> Ordering {
        a.cmp(&b)
    }

    #[test]
    fn empty_set() {
        let d: OrderedSet<i32> = OrderedSet::new();
        assert!(d.is_empty());
        assert!(matches!(d.min(), Err(ClipError::EmptyContainer)));
        assert!(matches!(d.max(), Err(ClipError::EmptyContainer)));
        assert_eq!(d.height(), 0);
    }

    #[test]
    fn insert_and_order() {
        let mut d = OrderedSet::new();
        d.insert(3, &cmp);
        d.insert(1, &cmp);
        d.insert(2, &cmp);

        let n1 = d.min().unwrap();
        assert_eq!(d.key(n1), 1);
        let n2 = d.successor(n1).unwrap();
        assert_eq!(d.key(n2), 2);
        let n3 = d.successor(n2).unwrap();
        assert_eq!(d.key(n3), 3);
        assert_eq!(d.successor(n3), None);
        assert_eq!(d.predecessor(n1), None);
        assert_eq!(d.max().unwrap(), n3);
        assert!(d.is_valid(&cmp));
    }

    #[test]
    fn sequential_inserts_stay_balanced() {
        let mut d = OrderedSet::new();
        for i in 0..1000 {
            d.insert(i, &cmp);
        }
        assert!(d.is_valid(&cmp));
        // 1.45 * log2(1002) ~ 14.5
        assert!(d.height() <= 14, "height {}", d.height());
    }

    #[test]
    fn remove_two_child_node_keeps_other_handles() {
        let mut d = OrderedSet::new();
        let handles: Vec<NodeIdx> = (0..16).map(|i| d.insert(i, &cmp)).collect();
        let root_key = d.key(d.root);
        assert!(d.remove(root_key, &cmp));
        assert!(!d.contains_node(handles[root_key as usize]));
        for (k, &h) in handles.iter().enumerate() {
            if k as i32 != root_key {
                assert_eq!(d.key(h), k as i32);
            }
        }
        assert!(d.is_valid(&cmp));
        assert_eq!(d.len(), 15);
    }

    #[test]
    fn remove_by_handle_and_stale_handle() {
        let mut d = OrderedSet::new();
        d.insert(1, &cmp);
        let n2 = d.insert(2, &cmp);
        d.insert(3, &cmp);

        assert!(d.remove_node(n2));
        assert!(!d.remove_node(n2));

        let keys: Vec<i32> = d.iter().collect();
        assert_eq!(keys, vec![1, 3]);
        assert!(!d.remove(2, &cmp));
    }

    #[test]
    fn find_and_neighbours() {
        let mut d = OrderedSet::new();
        for k in [5, 1, 9, 3, 7] {
            d.insert(k, &cmp);
        }
        let n = d.find(5, &cmp).unwrap();
        assert_eq!(d.predecessor(n).map(|p| d.key(p)), Some(3));
        assert_eq!(d.successor(n).map(|s| d.key(s)), Some(7));
        assert_eq!(d.find(4, &cmp), None);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut d: OrderedSet<(i32, i32)> = OrderedSet::new();
        let by_first = |a: (i32, i32), b: (i32, i32)| a.0.cmp(&b.0);
        d.insert((1, 0), &by_first);
        d.insert((1, 1), &by_first);
        d.insert((0, 2), &by_first);
        let keys: Vec<_> = d.iter().collect();
        assert_eq!(keys, vec![(0, 2), (1, 0), (1, 1)]);
    }

    #[test]
    fn drain_in_random_order() {
        let mut d = OrderedSet::new();
        let keys: Vec<i32> = (0..200).map(|i| (i * 7919) % 211).collect();
        for &k in &keys {
            d.insert(k, &cmp);
        }
        for (i, &k) in keys.iter().enumerate() {
            assert!(d.remove(k, &cmp));
            if i % 17 == 0 {
                assert!(d.is_valid(&cmp));
            }
        }
        assert!(d.is_empty());
    }
}
