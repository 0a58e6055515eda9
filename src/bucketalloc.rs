// Copyright 2025 Lars Brubaker
// License: MIT
//
// Vec-backed arena with free-list recycling. Backs the node storage of the
// ordered set, so node handles are plain u32 indices instead of pointers.

use std::ops::{Index, IndexMut};

/// Slot arena. Freed slots are recycled LIFO by later allocations.
#[derive(Clone, Debug)]
pub struct BucketAlloc<T> {
    items: Vec<Option<T>>,
    free_list: Vec<u32>,
}

impl<T> BucketAlloc<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `value`, reusing a freed slot when one is available.
    pub fn alloc(&mut self, value: T) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            self.items[idx as usize] = Some(value);
            idx
        } else {
            let idx = self.items.len() as u32;
            self.items.push(Some(value));
            idx
        }
    }

    /// Release slot `idx`, returning its value. Freeing a free slot is a no-op.
    pub fn free(&mut self, idx: u32) -> Option<T> {
        let value = self.items.get_mut(idx as usize)?.take()?;
        self.free_list.push(idx);
        Some(value)
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        self.items.get_mut(idx as usize)?.as_mut()
    }

    #[inline]
    pub fn is_live(&self, idx: u32) -> bool {
        self.get(idx).is_some()
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.free_list.clear();
    }
}

impl<T> Default for BucketAlloc<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u32> for BucketAlloc<T> {
    type Output = T;

    /// Panics on a freed slot; callers only index handles they hold live.
    fn index(&self, idx: u32) -> &T {
        match self.items[idx as usize].as_ref() {
            Some(v) => v,
            None => panic!("BucketAlloc: slot {} is free", idx),
        }
    }
}

impl<T> IndexMut<u32> for BucketAlloc<T> {
    fn index_mut(&mut self, idx: u32) -> &mut T {
        match self.items[idx as usize].as_mut() {
            Some(v) => v,
            None => panic!("BucketAlloc: slot {} is free", idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slot_is_recycled() {
        let mut arena: BucketAlloc<u32> = BucketAlloc::new();
        let first = arena.alloc(7);
        let second = arena.alloc(8);
        assert_eq!(arena.free(first), Some(7));
        let third = arena.alloc(9);
        assert_eq!(third, first);
        assert_ne!(third, second);
        assert_eq!(arena[third], 9);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn double_free_is_noop() {
        let mut arena: BucketAlloc<i32> = BucketAlloc::new();
        let slot = arena.alloc(1);
        assert_eq!(arena.free(slot), Some(1));
        assert_eq!(arena.free(slot), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn free_slot_reads_as_dead() {
        let mut arena: BucketAlloc<i32> = BucketAlloc::new();
        let slot = arena.alloc(3);
        arena.free(slot);
        assert!(arena.get(slot).is_none());
        assert!(!arena.is_live(slot));
        arena.clear();
        assert!(arena.get(slot).is_none());
    }
}
