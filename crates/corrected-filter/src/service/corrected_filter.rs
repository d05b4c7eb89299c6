//! Corrected Filter Service
//!
//! A membership filter paired with a bounded cache of reported false
//! positives.
//!
//! ## Locking
//!
//! | Operation | Filter lock | Cache lock |
//! |-----------|-------------|------------|
//! | `add` | exclusive | - |
//! | `check` | shared, held across the cache lookup | internal |
//! | `mark_false_positive` | - | internal |
//! | `to_bytes` / `stats` | shared | - / internal |
//! | `restore_filter` | exclusive | - |
//!
//! The two locks are independent: `check` and `mark_false_positive` may run
//! at the same time. Key encoding happens before any lock is taken.

use std::hash::Hash;
use std::marker::PhantomData;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::domain::{ArcCache, CorrectedFilterConfig, CuckooFilter, KeyEncoding};
use crate::error::FilterError;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::ports::{CorrectedFilterApi, CorrectionCache, FilterStats, MembershipFilter};

/// Membership filter with false-positive suppression.
///
/// Share it between threads by reference or `Arc`; all operations take
/// `&self`.
pub struct CorrectedFilter<E, F = CuckooFilter, C = ArcCache<E, ()>> {
    filter: RwLock<F>,
    cache: C,
    metrics: Metrics,
    _element: PhantomData<fn(&E)>,
}

impl<E> CorrectedFilter<E>
where
    E: KeyEncoding + Hash + Eq + Clone + Send + Sync,
{
    /// Create an empty filter.
    ///
    /// # Arguments
    /// * `capacity` - Expected number of elements
    /// * `target_fpr` - Target false positive rate in (0, 1); clamped to 4..=32 fingerprint bits
    /// * `correction_cache_size` - Maximum live corrections, must be positive
    pub fn new(
        capacity: usize,
        target_fpr: f64,
        correction_cache_size: usize,
    ) -> Result<Self, FilterError> {
        Self::with_config(&CorrectedFilterConfig::new(
            capacity,
            target_fpr,
            correction_cache_size,
        )?)
    }

    /// Create an empty filter from a configuration
    pub fn with_config(config: &CorrectedFilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let params = config.filter_params()?;
        let cache = ArcCache::new(config.correction_cache_size)?;
        let filter = CuckooFilter::new(params);

        debug!(
            capacity = config.capacity,
            target_fpr = config.target_fpr,
            fingerprint_bits = params.fingerprint_bits,
            bucket_count = params.bucket_count,
            correction_cache_size = config.correction_cache_size,
            "Created corrected filter"
        );

        Ok(Self::with_parts(filter, cache))
    }

    /// Restore a filter from bytes produced by [`CorrectedFilter::to_bytes`].
    ///
    /// The correction cache always starts empty; corrections are never
    /// serialized.
    pub fn from_bytes(data: &[u8], correction_cache_size: usize) -> Result<Self, FilterError> {
        let cache = ArcCache::new(correction_cache_size)?;
        let filter = CuckooFilter::from_bytes(data)?;

        debug!(
            bytes = data.len(),
            items = filter.len(),
            fingerprint_bits = filter.params().fingerprint_bits,
            correction_cache_size,
            "Restored corrected filter"
        );

        Ok(Self::with_parts(filter, cache))
    }
}

impl<E, F, C> CorrectedFilter<E, F, C>
where
    E: KeyEncoding + Hash + Eq + Clone,
    F: MembershipFilter,
    C: CorrectionCache<E>,
{
    /// Compose a filter from existing parts.
    pub fn with_parts(filter: F, cache: C) -> Self {
        Self {
            filter: RwLock::new(filter),
            cache,
            metrics: Metrics::new(),
            _element: PhantomData,
        }
    }

    /// Insert an element.
    ///
    /// A rejected insert leaves the filter unchanged and usable.
    pub fn add(&self, element: &E) -> Result<(), FilterError> {
        let key = element.encode_key().map_err(FilterError::encoding)?;
        let result = self.filter.write().insert(&key);
        self.metrics.record_insert(result.is_ok());
        result
    }

    /// Test membership, honouring recorded corrections.
    pub fn check(&self, element: &E) -> Result<bool, FilterError> {
        let key = element.encode_key().map_err(FilterError::encoding)?;

        let filter = self.filter.read();
        if !filter.contains(&key) {
            // No false negatives, so the cache has nothing to add
            drop(filter);
            self.metrics.record_lookup(false, false);
            return Ok(false);
        }
        let corrected = self.cache.lookup(element);
        drop(filter);

        if corrected {
            trace!("Suppressed reported false positive");
        }
        self.metrics.record_lookup(true, corrected);
        Ok(!corrected)
    }

    /// Record that a positive answer for `element` was wrong.
    pub fn mark_false_positive(&self, element: &E) {
        self.cache.record(element.clone());
        self.metrics.record_correction();
        trace!(corrections = self.cache.len(), "Recorded false positive");
    }

    /// Encode the membership filter. Corrections are not included.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.filter.read().encode()
    }

    /// Replace the membership filter in place from encoded bytes.
    ///
    /// On error the current filter is kept. Recorded corrections are kept
    /// as well; build a fresh instance with `from_bytes` to drop them.
    pub fn restore_filter(&self, data: &[u8]) -> Result<(), FilterError> {
        let decoded = F::decode(data)?;
        let items = decoded.len();
        *self.filter.write() = decoded;

        debug!(bytes = data.len(), items, "Replaced membership filter");
        Ok(())
    }

    /// Occupancy of the filter and the correction cache
    pub fn stats(&self) -> FilterStats {
        let (items, slots, fingerprint_bits) = {
            let filter = self.filter.read();
            (filter.len(), filter.slots(), filter.fingerprint_bits())
        };

        FilterStats {
            items,
            slots,
            fingerprint_bits,
            corrections: self.cache.len(),
            correction_capacity: self.cache.capacity(),
        }
    }

    /// Snapshot of the operation counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Zero the operation counters. Filter and corrections are untouched.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

impl<E, F, C> CorrectedFilterApi<E> for CorrectedFilter<E, F, C>
where
    E: KeyEncoding + Hash + Eq + Clone,
    F: MembershipFilter,
    C: CorrectionCache<E>,
{
    fn add(&self, element: &E) -> Result<(), FilterError> {
        CorrectedFilter::add(self, element)
    }

    fn check(&self, element: &E) -> Result<bool, FilterError> {
        CorrectedFilter::check(self, element)
    }

    fn mark_false_positive(&self, element: &E) {
        CorrectedFilter::mark_false_positive(self, element)
    }

    fn to_bytes(&self) -> Vec<u8> {
        CorrectedFilter::to_bytes(self)
    }
}
