//! Bounded FIFO block cache, the memoizing half of C5 (Block Fetcher + Cache).
//!
//! An optimization only: correctness of `Reader` never depends on what this
//! cache holds, only on it returning what was last inserted under a given
//! key. Insert unconditionally on every miss; evict the oldest entry once
//! size exceeds capacity. The source implementation inserted only when
//! already over capacity (inserting conditionally on its own overflow
//! check) — spec §9 flags this as a bug to fix, not preserve.

use std::collections::HashMap;
use std::collections::VecDeque;

/// FIFO-eviction cache, keyed by block index, capped at a fixed capacity.
pub struct BlockCache {
    capacity: usize,
    order: VecDeque<u64>,
    entries: HashMap<u64, Vec<u8>>,
}

impl BlockCache {
    pub fn new(capacity: usize) -> Self {
        BlockCache {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, block_index: u64) -> Option<&Vec<u8>> {
        self.entries.get(&block_index)
    }

    /// Insert `data` under `block_index`, evicting the oldest entry if the
    /// cache is now over capacity. Re-inserting an already-cached key does
    /// not change its insertion order (this path never happens in practice —
    /// `Reader::read_block` only inserts after a cache miss — but is kept
    /// harmless rather than left undefined).
    pub fn insert(&mut self, block_index: u64, data: Vec<u8>) {
        if !self.entries.contains_key(&block_index) {
            self.order.push_back(block_index);
        }
        self.entries.insert(block_index, data);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_after_insert() {
        let mut cache = BlockCache::new(2);
        cache.insert(0, vec![1, 2, 3]);
        assert_eq!(cache.get(0), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn miss_before_insert() {
        let cache = BlockCache::new(2);
        assert_eq!(cache.get(0), None);
    }

    #[test]
    fn evicts_oldest_over_capacity() {
        let mut cache = BlockCache::new(2);
        cache.insert(0, vec![0]);
        cache.insert(1, vec![1]);
        cache.insert(2, vec![2]);
        assert_eq!(cache.get(0), None, "oldest entry should have been evicted");
        assert_eq!(cache.get(1), Some(&vec![1]));
        assert_eq!(cache.get(2), Some(&vec![2]));
    }

    #[test]
    fn default_capacity_five_keeps_five_most_recent() {
        let mut cache = BlockCache::new(5);
        for i in 0..7u64 {
            cache.insert(i, vec![i as u8]);
        }
        for i in 0..2 {
            assert_eq!(cache.get(i), None);
        }
        for i in 2..7 {
            assert_eq!(cache.get(i), Some(&vec![i as u8]));
        }
    }
}
