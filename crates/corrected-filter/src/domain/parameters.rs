//! Cuckoo filter parameter derivation
//!
//! Formulas:
//! - fingerprint bits = ceil(log2(1 / fpr)), clamped to [4, 32]
//! - buckets = next_pow2(capacity / 4), doubled when load would exceed 0.96

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Slots per bucket. Fixed, not tunable.
pub const TAGS_PER_BUCKET: usize = 4;

/// Narrowest fingerprint we will store.
pub const MIN_FINGERPRINT_BITS: u32 = 4;

/// Widest fingerprint we will store.
pub const MAX_FINGERPRINT_BITS: u32 = 32;

/// Highest load factor a freshly sized table is allowed to start at.
const MAX_LOAD_FACTOR: f64 = 0.96;

/// Cuckoo filter parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Bits stored per item
    pub fingerprint_bits: u32,
    /// Slots per bucket (always [`TAGS_PER_BUCKET`])
    pub tags_per_bucket: usize,
    /// Number of buckets, a power of two
    pub bucket_count: usize,
}

impl FilterParams {
    /// Total slots in the table.
    pub fn slots(&self) -> usize {
        self.bucket_count * self.tags_per_bucket
    }

    /// Size of the packed table in bits.
    pub fn table_bits(&self) -> usize {
        self.slots() * self.fingerprint_bits as usize
    }

    /// Rough false positive bound for a full table: 2b / 2^f.
    pub fn expected_fpr(&self) -> f64 {
        (2 * self.tags_per_bucket) as f64 / 2f64.powi(self.fingerprint_bits as i32)
    }
}

/// Derive filter parameters for a capacity and target false positive rate.
///
/// Rejects rates outside the open interval (0, 1); extreme rates inside it
/// are clamped to the supported fingerprint widths rather than refused.
pub fn calculate_filter_params(
    capacity: usize,
    target_fpr: f64,
) -> Result<FilterParams, FilterError> {
    let fingerprint_bits = fingerprint_bits_for(target_fpr)?;
    let unaddressable =
        || FilterError::InvalidParameters(format!("capacity {} is too large to address", capacity));

    let bucket_count = bucket_count_for(capacity).ok_or_else(unaddressable)?;
    bucket_count
        .checked_mul(TAGS_PER_BUCKET)
        .and_then(|slots| slots.checked_mul(fingerprint_bits as usize))
        .ok_or_else(unaddressable)?;

    Ok(FilterParams {
        fingerprint_bits,
        tags_per_bucket: TAGS_PER_BUCKET,
        bucket_count,
    })
}

/// Fingerprint width needed for a target false positive rate.
pub fn fingerprint_bits_for(target_fpr: f64) -> Result<u32, FilterError> {
    if !target_fpr.is_finite() || target_fpr <= 0.0 || target_fpr >= 1.0 {
        return Err(FilterError::InvalidFalsePositiveRate { fpr: target_fpr });
    }

    // FP rate ~ 1/2^bits, so bits = ceil(log2(1/fpr))
    let bits = (1.0 / target_fpr).log2().ceil();
    let bits = bits.clamp(MIN_FINGERPRINT_BITS as f64, MAX_FINGERPRINT_BITS as f64);
    Ok(bits as u32)
}

/// Number of buckets for an expected item count, `None` on overflow.
pub fn bucket_count_for(capacity: usize) -> Option<usize> {
    let buckets = (capacity / TAGS_PER_BUCKET).max(1).checked_next_power_of_two()?;
    let load = capacity as f64 / (buckets as f64 * TAGS_PER_BUCKET as f64);
    if load > MAX_LOAD_FACTOR {
        buckets.checked_mul(2)
    } else {
        Some(buckets)
    }
}
