//! Outbound Ports (Driven Ports)
//!
//! Contracts for the two structures a corrected filter owns. The bundled
//! implementations are [`CuckooFilter`] and [`ArcCache`].

use std::hash::Hash;

use crate::domain::{ArcCache, CuckooFilter};
use crate::error::FilterError;

/// Approximate set over byte keys (Driven Port)
///
/// INVARIANT: no false negatives. After `insert(k)` returns `Ok`,
/// `contains(k)` MUST return true until the filter is replaced.
pub trait MembershipFilter: Send + Sync + Sized {
    /// Insert a key. A rejected insert must leave the filter unchanged.
    fn insert(&mut self, key: &[u8]) -> Result<(), FilterError>;

    /// Test if a key might be present
    fn contains(&self, key: &[u8]) -> bool;

    /// Encode the filter for storage or transfer
    fn encode(&self) -> Vec<u8>;

    /// Decode a filter produced by [`MembershipFilter::encode`]
    fn decode(bytes: &[u8]) -> Result<Self, FilterError>;

    /// Stored items
    fn len(&self) -> usize;

    /// Total item slots
    fn slots(&self) -> usize;

    /// Bits stored per item
    fn fingerprint_bits(&self) -> u32;
}

/// Bounded record of reported false positives (Driven Port)
///
/// Implementations synchronize internally and may evict entries silently
/// once full.
pub trait CorrectionCache<K>: Send + Sync {
    /// Record a key. Infallible; may evict another key.
    fn record(&self, key: K);

    /// Whether the key is currently recorded. May refresh its standing.
    fn lookup(&self, key: &K) -> bool;

    /// Live entries
    fn len(&self) -> usize;

    fn capacity(&self) -> usize;
}

impl MembershipFilter for CuckooFilter {
    fn insert(&mut self, key: &[u8]) -> Result<(), FilterError> {
        CuckooFilter::insert(self, key)
    }

    fn contains(&self, key: &[u8]) -> bool {
        CuckooFilter::contains(self, key)
    }

    fn encode(&self) -> Vec<u8> {
        self.to_bytes()
    }

    fn decode(bytes: &[u8]) -> Result<Self, FilterError> {
        CuckooFilter::from_bytes(bytes)
    }

    fn len(&self) -> usize {
        CuckooFilter::len(self)
    }

    fn slots(&self) -> usize {
        self.params().slots()
    }

    fn fingerprint_bits(&self) -> u32 {
        self.params().fingerprint_bits
    }
}

impl<K> CorrectionCache<K> for ArcCache<K, ()>
where
    K: Hash + Eq + Clone + Send,
{
    fn record(&self, key: K) {
        self.insert(key, ());
    }

    fn lookup(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        ArcCache::capacity(self)
    }
}
