//! # Adaptive Replacement Cache
//!
//! Bounded cache balancing recency and frequency (Megiddo & Modha, ARC).
//!
//! ## Lists
//!
//! - `t1`: keys seen once recently
//! - `t2`: keys seen at least twice
//! - `b1` / `b2`: ghost keys recently evicted from `t1` / `t2`
//!
//! A ghost hit in `b1` grows the recency target `p`; a ghost hit in `b2`
//! shrinks it. `t1.len() + t2.len()` never exceeds the capacity.
//!
//! All operations take one internal mutex, so the cache can be shared
//! between threads without outside locking.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::error::FilterError;

/// Occupancy of each ARC list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArcStats {
    pub capacity: usize,
    pub recent: usize,
    pub frequent: usize,
    pub recent_ghosts: usize,
    pub frequent_ghosts: usize,
    /// Current target size of the recent list (`p`)
    pub target_recent: usize,
}

struct ArcState<K: Hash + Eq, V> {
    size: usize,
    p: usize,
    t1: LruCache<K, V>,
    t2: LruCache<K, V>,
    b1: LruCache<K, ()>,
    b2: LruCache<K, ()>,
}

/// Thread-safe fixed-capacity ARC cache.
pub struct ArcCache<K: Hash + Eq, V> {
    state: Mutex<ArcState<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> ArcCache<K, V> {
    /// Create a cache holding at most `size` live entries.
    pub fn new(size: usize) -> Result<Self, FilterError> {
        let cap = NonZeroUsize::new(size).ok_or(FilterError::InvalidCacheSize { size })?;
        Ok(Self {
            state: Mutex::new(ArcState {
                size,
                p: 0,
                t1: LruCache::new(cap),
                t2: LruCache::new(cap),
                b1: LruCache::new(cap),
                b2: LruCache::new(cap),
            }),
        })
    }

    /// Insert or update an entry. May silently evict another entry.
    pub fn insert(&self, key: K, value: V) {
        self.state.lock().insert(key, value);
    }

    /// Look up an entry, promoting it to the frequent list on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.state.lock().get(key)
    }

    /// Presence check without promotion.
    pub fn contains(&self, key: &K) -> bool {
        let state = self.state.lock();
        state.t1.contains(key) || state.t2.contains(key)
    }

    /// Live entries.
    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.t1.len() + state.t2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().size
    }

    pub fn stats(&self) -> ArcStats {
        let state = self.state.lock();
        ArcStats {
            capacity: state.size,
            recent: state.t1.len(),
            frequent: state.t2.len(),
            recent_ghosts: state.b1.len(),
            frequent_ghosts: state.b2.len(),
            target_recent: state.p,
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone> ArcState<K, V> {
    fn get(&mut self, key: &K) -> Option<V> {
        // A second touch moves a recent entry to the frequent list
        if let Some((k, v)) = self.t1.pop_entry(key) {
            self.t2.put(k, v.clone());
            return Some(v);
        }
        self.t2.get(key).cloned()
    }

    fn insert(&mut self, key: K, value: V) {
        if self.t1.contains(&key) {
            self.t1.pop(&key);
            self.t2.put(key, value);
            return;
        }

        if self.t2.contains(&key) {
            self.t2.put(key, value);
            return;
        }

        if self.b1.contains(&key) {
            let (b1_len, b2_len) = (self.b1.len(), self.b2.len());
            let delta = if b2_len > b1_len { b2_len / b1_len } else { 1 };
            self.p = (self.p + delta).min(self.size);

            if self.t1.len() + self.t2.len() >= self.size {
                self.replace(false);
            }
            self.b1.pop(&key);
            self.t2.put(key, value);
            return;
        }

        if self.b2.contains(&key) {
            let (b1_len, b2_len) = (self.b1.len(), self.b2.len());
            let delta = if b1_len > b2_len { b1_len / b2_len } else { 1 };
            self.p = self.p.saturating_sub(delta);

            if self.t1.len() + self.t2.len() >= self.size {
                self.replace(true);
            }
            self.b2.pop(&key);
            self.t2.put(key, value);
            return;
        }

        // Brand new key
        if self.t1.len() + self.t2.len() >= self.size {
            self.replace(false);
        }
        if self.b1.len() > self.size - self.p {
            self.b1.pop_lru();
        }
        if self.b2.len() > self.p {
            self.b2.pop_lru();
        }
        self.t1.put(key, value);
    }

    /// Evict one live entry into the matching ghost list.
    ///
    /// Falls back to the other live list when the preferred one is empty,
    /// so a call on a full cache always frees a slot.
    fn replace(&mut self, b2_contains_key: bool) {
        let t1_len = self.t1.len();
        let prefer_recent =
            t1_len > 0 && (t1_len > self.p || (t1_len == self.p && b2_contains_key));
        if prefer_recent || self.t2.is_empty() {
            self.evict_recent();
        } else {
            self.evict_frequent();
        }
    }

    fn evict_recent(&mut self) {
        if let Some((k, _)) = self.t1.pop_lru() {
            self.b1.put(k, ());
        }
    }

    fn evict_frequent(&mut self) {
        if let Some((k, _)) = self.t2.pop_lru() {
            self.b2.put(k, ());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            ArcCache::<u32, ()>::new(0),
            Err(FilterError::InvalidCacheSize { size: 0 })
        ));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ArcCache::new(4).unwrap();
        cache.insert("a", 1);

        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_promotes_to_frequent() {
        let cache = ArcCache::new(4).unwrap();
        cache.insert(1u32, ());
        assert_eq!(cache.stats().recent, 1);

        cache.get(&1);
        let stats = cache.stats();
        assert_eq!(stats.recent, 0);
        assert_eq!(stats.frequent, 1);
    }

    #[test]
    fn test_contains_does_not_promote() {
        let cache = ArcCache::new(4).unwrap();
        cache.insert(1u32, ());

        assert!(cache.contains(&1));
        assert_eq!(cache.stats().recent, 1);
    }

    #[test]
    fn test_overflow_evicts_oldest_recent() {
        let cache = ArcCache::new(3).unwrap();
        for k in 0u32..4 {
            cache.insert(k, ());
        }

        assert!(!cache.contains(&0), "oldest entry must be evicted");
        for k in 1..4 {
            assert!(cache.contains(&k));
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().recent_ghosts, 1);
    }

    #[test]
    fn test_overflow_evicts_oldest_frequent() {
        let cache = ArcCache::new(3).unwrap();
        for k in 0u32..3 {
            cache.insert(k, ());
            cache.get(&k);
        }
        cache.insert(3, ());

        assert!(!cache.contains(&0));
        for k in 1..4 {
            assert!(cache.contains(&k));
        }
    }

    #[test]
    fn test_frequent_entries_survive_scan() {
        let cache = ArcCache::new(4).unwrap();
        cache.insert("hot_a", ());
        cache.insert("hot_b", ());
        cache.get(&"hot_a");
        cache.get(&"hot_b");

        for key in ["c", "d", "e", "f", "g", "h", "i", "j", "k", "l"] {
            cache.insert(key, ());
        }

        assert!(cache.contains(&"hot_a"), "frequent entry evicted by a scan");
        assert!(cache.contains(&"hot_b"), "frequent entry evicted by a scan");
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_ghost_hit_readmits_as_frequent() {
        let cache = ArcCache::new(2).unwrap();
        cache.insert("a", ());
        cache.insert("b", ());
        cache.insert("c", ()); // a -> ghost
        assert!(!cache.contains(&"a"));

        cache.insert("a", ());

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        let stats = cache.stats();
        assert_eq!(stats.recent, 1);
        assert_eq!(stats.frequent, 1);
        assert_eq!(stats.target_recent, 1, "recent ghost hit grows p");
    }

    #[test]
    fn test_update_existing_keeps_size() {
        let cache = ArcCache::new(2).unwrap();
        cache.insert(1u8, "x");
        cache.insert(1u8, "y");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some("y"));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let cache = ArcCache::new(16).unwrap();
        for i in 0u64..1000 {
            cache.insert(i % 97, ());
            if i % 3 == 0 {
                cache.get(&(i % 13));
            }
            assert!(cache.len() <= 16);
        }
    }

    #[test]
    fn test_recent_ghost_hit_with_empty_frequent_list() {
        let cache = ArcCache::new(1).unwrap();
        cache.insert(0u64, ());
        cache.insert(1, ()); // 0 -> ghost
        cache.insert(0, ()); // target reaches capacity, frequent list still empty

        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&0));
        assert!(!cache.contains(&1));
        let stats = cache.stats();
        assert_eq!(stats.frequent, 1);
        assert_eq!(stats.target_recent, 1);
    }

    #[test]
    fn test_frequent_ghost_hit_shrinks_target() {
        let cache = ArcCache::new(2).unwrap();
        cache.insert("a", ());
        cache.insert("b", ());
        cache.insert("c", ()); // a -> recent ghost
        cache.insert("a", ()); // p = 1, b -> recent ghost, a frequent
        cache.get(&"c"); // c frequent
        cache.insert("d", ()); // a -> frequent ghost
        assert!(!cache.contains(&"a"));
        let before = cache.stats();
        assert_eq!(before.frequent_ghosts, 1);
        assert_eq!(before.target_recent, 1);

        cache.insert("a", ());

        let after = cache.stats();
        assert!(after.target_recent < before.target_recent);
        assert!(cache.contains(&"a"));
        assert!(cache.contains(&"c"));
        assert!(!cache.contains(&"d"));
        assert_eq!(after.frequent, 2);
        assert_eq!(cache.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(
            size in 1usize..=5,
            ops in proptest::collection::vec((any::<bool>(), 0u8..8), 1..200),
        ) {
            let cache = ArcCache::new(size).unwrap();
            for (is_get, key) in ops {
                if is_get {
                    cache.get(&key);
                } else {
                    cache.insert(key, ());
                }
                let stats = cache.stats();
                prop_assert!(
                    cache.len() <= size,
                    "len {} over capacity {}: {:?}",
                    cache.len(),
                    size,
                    stats
                );
                prop_assert!(stats.recent_ghosts + stats.frequent_ghosts <= 2 * size);
                prop_assert!(stats.target_recent <= size);
            }
        }
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ArcCache::new(64).unwrap());

        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..1000 {
                        cache.insert(t * 1000 + i, ());
                        cache.get(&(t * 1000 + i / 2));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 64);
    }
}
