//! Metrics for corrected filter operations
//!
//! Lock-free counters, updated outside both the filter lock and the cache
//! lock.
//!
//! ## Usage
//!
//! ```ignore
//! let filter = CorrectedFilter::<u64>::new(1 << 16, 0.0001, 1 << 10)?;
//! filter.add(&7)?;
//! filter.check(&7)?;
//!
//! let snapshot = filter.metrics();
//! assert_eq!(snapshot.lookups_performed, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for corrected filter operations
#[derive(Debug, Default)]
pub struct Metrics {
    /// Successful insertions
    pub elements_inserted: AtomicU64,
    /// Insertions rejected by the membership filter
    pub insert_failures: AtomicU64,
    /// Total `check` calls that got past key encoding
    pub lookups_performed: AtomicU64,
    /// Lookups the membership filter answered positively
    pub filter_positives: AtomicU64,
    /// Filter positives overridden by a recorded correction
    pub positives_suppressed: AtomicU64,
    /// Calls to `mark_false_positive`
    pub corrections_recorded: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of an insertion
    pub fn record_insert(&self, accepted: bool) {
        if accepted {
            self.elements_inserted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.insert_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a lookup
    ///
    /// # Arguments
    /// * `filter_positive` - Whether the membership filter matched
    /// * `suppressed` - Whether a correction overrode that match
    pub fn record_lookup(&self, filter_positive: bool, suppressed: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        if filter_positive {
            self.filter_positives.fetch_add(1, Ordering::Relaxed);
        }
        if suppressed {
            self.positives_suppressed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_correction(&self) {
        self.corrections_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            elements_inserted: self.elements_inserted.load(Ordering::Relaxed),
            insert_failures: self.insert_failures.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            filter_positives: self.filter_positives.load(Ordering::Relaxed),
            positives_suppressed: self.positives_suppressed.load(Ordering::Relaxed),
            corrections_recorded: self.corrections_recorded.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.elements_inserted.store(0, Ordering::Relaxed);
        self.insert_failures.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.filter_positives.store(0, Ordering::Relaxed);
        self.positives_suppressed.store(0, Ordering::Relaxed);
        self.corrections_recorded.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub elements_inserted: u64,
    pub insert_failures: u64,
    pub lookups_performed: u64,
    pub filter_positives: u64,
    pub positives_suppressed: u64,
    pub corrections_recorded: u64,
}

impl MetricsSnapshot {
    /// Fraction of lookups the membership filter matched.
    ///
    /// Includes both true positives and false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        if self.lookups_performed == 0 {
            return 0.0;
        }
        self.filter_positives as f64 / self.lookups_performed as f64
    }

    /// Fraction of filter matches overridden by a correction.
    pub fn suppression_rate(&self) -> f64 {
        if self.filter_positives == 0 {
            return 0.0;
        }
        self.positives_suppressed as f64 / self.filter_positives as f64
    }
}
