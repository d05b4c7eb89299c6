//! Inbound Ports (Driving Ports)
//!
//! The API callers use to query and correct a filter.

use crate::error::FilterError;

/// Point-in-time occupancy of a corrected filter
#[derive(Clone, Debug, PartialEq)]
pub struct FilterStats {
    /// Items stored in the membership filter
    pub items: usize,
    /// Total slots in the membership filter
    pub slots: usize,
    /// Bits stored per item
    pub fingerprint_bits: u32,
    /// Live corrections
    pub corrections: usize,
    /// Maximum live corrections
    pub correction_capacity: usize,
}

impl FilterStats {
    /// Occupied fraction of the membership filter.
    pub fn load_factor(&self) -> f64 {
        if self.slots == 0 {
            return 0.0;
        }
        self.items as f64 / self.slots as f64
    }

    /// Number of buckets in the membership filter.
    pub fn bucket_count(&self) -> usize {
        self.slots / crate::domain::parameters::TAGS_PER_BUCKET
    }
}

/// Primary corrected filter API (Driving Port)
pub trait CorrectedFilterApi<E>: Send + Sync {
    /// Insert an element into the membership filter.
    ///
    /// Errors with `Encoding` if the key cannot be produced, or `Capacity`
    /// if the filter is full. Never touches recorded corrections.
    fn add(&self, element: &E) -> Result<(), FilterError>;

    /// Test membership.
    ///
    /// - `false` if the filter says absent (authoritative, no false negatives)
    /// - `false` if the filter says present but the element was reported
    ///   as a false positive and that report has not been evicted
    /// - `true` otherwise
    fn check(&self, element: &E) -> Result<bool, FilterError>;

    /// Report that a positive `check` for this element was wrong.
    ///
    /// The report is best effort: it lasts only until the correction cache
    /// evicts it.
    fn mark_false_positive(&self, element: &E);

    /// Encode the membership filter. Corrections are not included.
    fn to_bytes(&self) -> Vec<u8>;
}
