// Copyright 2025 Lars Brubaker
// License: MIT
//
// A two-phase priority queue:
//   Phase 1 (pre-init): inserts go into a key array that init() sorts once.
//   Phase 2 (post-init): inserts go directly into a binary min-heap.
// extract_min() takes the smaller of the sorted-array tail and the heap top.
//
// The sweep seeds the queue with every input edge endpoint (phase 1) and
// later pushes only the few events created by segment subdivision (phase 2),
// so most keys are ordered by a single sort.
//
// The comparison function is passed to each call because it reads event
// records owned by the caller.

use std::cmp::Ordering;

/// Binary min-heap (0-based).
#[derive(Clone, Debug)]
struct Heap<K> {
    nodes: Vec<K>,
}

impl<K: Copy> Heap<K> {
    fn new() -> Self {
        Heap { nodes: Vec::new() }
    }

    fn float_down<F>(&mut self, mut curr: usize, cmp: &F)
    where
        F: Fn(K, K) -> Ordering,
    {
        let size = self.nodes.len();
        loop {
            let mut child = 2 * curr + 1;
            if child >= size {
                break;
            }
            if child + 1 < size && cmp(self.nodes[child + 1], self.nodes[child]) == Ordering::Less {
                child += 1;
            }
            if cmp(self.nodes[curr], self.nodes[child]) != Ordering::Greater {
                break;
            }
            self.nodes.swap(curr, child);
            curr = child;
        }
    }

    fn float_up<F>(&mut self, mut curr: usize, cmp: &F)
    where
        F: Fn(K, K) -> Ordering,
    {
        while curr > 0 {
            let parent = (curr - 1) / 2;
            if cmp(self.nodes[parent], self.nodes[curr]) != Ordering::Greater {
                break;
            }
            self.nodes.swap(curr, parent);
            curr = parent;
        }
    }

    fn insert<F>(&mut self, key: K, cmp: &F)
    where
        F: Fn(K, K) -> Ordering,
    {
        self.nodes.push(key);
        let last = self.nodes.len() - 1;
        self.float_up(last, cmp);
    }

    fn extract_min<F>(&mut self, cmp: &F) -> Option<K>
    where
        F: Fn(K, K) -> Ordering,
    {
        if self.nodes.is_empty() {
            return None;
        }
        let min = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.float_down(0, cmp);
        }
        Some(min)
    }

    #[inline]
    fn minimum(&self) -> Option<K> {
        self.nodes.first().copied()
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// The combined priority queue (sort-array + heap).
#[derive(Clone, Debug)]
pub struct PriorityQ<K> {
    heap: Heap<K>,
    /// Pre-init keys; after init, sorted descending so the minimum is last.
    keys: Vec<K>,
    initialized: bool,
}

impl<K: Copy> PriorityQ<K> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(size: usize) -> Self {
        PriorityQ {
            heap: Heap::new(),
            keys: Vec::with_capacity(size),
            initialized: false,
        }
    }

    /// Sort the pre-init keys. Called implicitly by the first extraction.
    pub fn init<F>(&mut self, cmp: &F)
    where
        F: Fn(K, K) -> Ordering,
    {
        if self.initialized {
            return;
        }
        // Descending, so we pop from the end in ascending order.
        self.keys.sort_by(|&a, &b| cmp(b, a));
        self.initialized = true;
    }

    pub fn insert<F>(&mut self, key: K, cmp: &F)
    where
        F: Fn(K, K) -> Ordering,
    {
        if self.initialized {
            self.heap.insert(key, cmp);
        } else {
            self.keys.push(key);
        }
    }

    /// Remove and return the minimum key.
    pub fn extract_min<F>(&mut self, cmp: &F) -> Option<K>
    where
        F: Fn(K, K) -> Ordering,
    {
        self.init(cmp);
        let sort_min = match self.keys.last() {
            Some(&k) => k,
            None => return self.heap.extract_min(cmp),
        };
        if let Some(heap_min) = self.heap.minimum() {
            if cmp(heap_min, sort_min) != Ordering::Greater {
                return self.heap.extract_min(cmp);
            }
        }
        self.keys.pop()
    }

    /// Peek at the minimum key without extracting.
    pub fn minimum<F>(&mut self, cmp: &F) -> Option<K>
    where
        F: Fn(K, K) -> Ordering,
    {
        self.init(cmp);
        match (self.keys.last().copied(), self.heap.minimum()) {
            (Some(s), Some(h)) => Some(if cmp(h, s) != Ordering::Greater { h } else { s }),
            (s, h) => s.or(h),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len() + self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Copy> Default for PriorityQ<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp_u32(a: u32, b: u32) -> Ordering {
        a.cmp(&b)
    }

    #[test]
    fn heap_basic() {
        let mut h = Heap::new();
        h.insert(3, &cmp_u32);
        h.insert(1, &cmp_u32);
        h.insert(2, &cmp_u32);
        assert_eq!(h.minimum(), Some(1));
        assert_eq!(h.extract_min(&cmp_u32), Some(1));
        assert_eq!(h.extract_min(&cmp_u32), Some(2));
        assert_eq!(h.extract_min(&cmp_u32), Some(3));
        assert_eq!(h.extract_min(&cmp_u32), None);
    }

    #[test]
    fn pq_pre_init_insert_then_extract() {
        let mut pq = PriorityQ::new();
        for k in [5, 2, 8, 1] {
            pq.insert(k, &cmp_u32);
        }
        pq.init(&cmp_u32);

        assert_eq!(pq.extract_min(&cmp_u32), Some(1));
        assert_eq!(pq.extract_min(&cmp_u32), Some(2));
        assert_eq!(pq.extract_min(&cmp_u32), Some(5));
        assert_eq!(pq.extract_min(&cmp_u32), Some(8));
        assert!(pq.is_empty());
    }

    #[test]
    fn pq_post_init_insert_interleaves() {
        let mut pq = PriorityQ::new();
        pq.insert(3, &cmp_u32);
        pq.insert(10, &cmp_u32);
        assert_eq!(pq.extract_min(&cmp_u32), Some(3));
        pq.insert(1, &cmp_u32); // goes into heap
        pq.insert(12, &cmp_u32);
        assert_eq!(pq.minimum(&cmp_u32), Some(1));
        assert_eq!(pq.len(), 3);
        assert_eq!(pq.extract_min(&cmp_u32), Some(1));
        assert_eq!(pq.extract_min(&cmp_u32), Some(10));
        assert_eq!(pq.extract_min(&cmp_u32), Some(12));
        assert_eq!(pq.extract_min(&cmp_u32), None);
    }

    #[test]
    fn pq_many_keys_come_out_sorted() {
        let mut pq = PriorityQ::with_capacity(64);
        for i in 0..64u32 {
            pq.insert((i * 37) % 64, &cmp_u32);
        }
        let mut out = Vec::new();
        while let Some(k) = pq.extract_min(&cmp_u32) {
            out.push(k);
            if k % 8 == 0 && k < 40 {
                pq.insert(k + 100, &cmp_u32);
            }
        }
        assert!(out.windows(2).all(|w| w[0] <= w[1]), "{:?}", out);
        assert_eq!(out.len(), 64 + 5);
    }
}
