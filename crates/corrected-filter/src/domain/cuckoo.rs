//! # Packed Cuckoo Filter
//!
//! Insert-only approximate membership with a configurable fingerprint width.
//!
//! ## Layout
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `params.bucket_count` | power of two, indexed with a mask |
//! | `params.tags_per_bucket` | always 4 |
//! | `params.fingerprint_bits` | 4..=32 bits per slot |
//! | `table` | `bucket_count * 4` slots packed back to back, zero = empty |
//!
//! ## Invariants
//!
//! - No false negatives: once `insert` returns `Ok`, `contains` is true.
//! - A failed `insert` leaves the table byte-for-byte unchanged.

use bincode::Options;
use bitvec::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hash_functions::{alt_index, fingerprint_and_index};
use super::parameters::{
    calculate_filter_params, FilterParams, MAX_FINGERPRINT_BITS, MIN_FINGERPRINT_BITS,
    TAGS_PER_BUCKET,
};
use crate::error::FilterError;

/// Encoding format version written at the head of every table.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum number of kicks before giving up.
const MAX_KICKS: usize = 500;

/// Cuckoo filter over byte keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CuckooFilter {
    version: u8,
    params: FilterParams,
    /// Occupied slots
    count: usize,
    #[serde(with = "bitvec_serde")]
    table: BitVec<u8, Lsb0>,
}

/// Serde support for the packed table
mod bitvec_serde {
    use bitvec::prelude::*;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bits: &BitVec<u8, Lsb0>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (bits.as_raw_slice(), bits.len()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BitVec<u8, Lsb0>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (bytes, len): (Vec<u8>, usize) = Deserialize::deserialize(deserializer)?;
        if bytes.len() != len.div_ceil(8) {
            return Err(D::Error::custom(format!(
                "table holds {} bytes but declares {} bits",
                bytes.len(),
                len
            )));
        }
        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes);
        bits.truncate(len);
        Ok(bits)
    }
}

/// Fixed-width little-endian encoding that refuses trailing input.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl CuckooFilter {
    /// Create an empty filter with explicit parameters.
    pub fn new(params: FilterParams) -> Self {
        Self {
            version: FORMAT_VERSION,
            params,
            count: 0,
            table: bitvec![u8, Lsb0; 0; params.table_bits()],
        }
    }

    /// Create an empty filter sized for `capacity` items at `target_fpr`.
    pub fn with_capacity(capacity: usize, target_fpr: f64) -> Result<Self, FilterError> {
        Ok(Self::new(calculate_filter_params(capacity, target_fpr)?))
    }

    /// Insert a key.
    ///
    /// Keys whose fingerprint already sits in one of their two buckets are
    /// treated as present and not stored again. Returns
    /// [`FilterError::Capacity`] when no slot can be freed within the kick
    /// budget; the table is rolled back to its prior state in that case.
    pub fn insert(&mut self, element: &[u8]) -> Result<(), FilterError> {
        let mask = self.bucket_mask();
        let (fp, i1) = fingerprint_and_index(element, self.params.fingerprint_bits, mask);
        let i2 = alt_index(i1, fp, mask);

        if self.bucket_contains(i1, fp) || self.bucket_contains(i2, fp) {
            return Ok(());
        }

        if self.try_place(i1, fp) || self.try_place(i2, fp) {
            self.count += 1;
            return Ok(());
        }

        let start = if rand::thread_rng().gen_bool(0.5) { i1 } else { i2 };
        self.relocate(fp, start)
    }

    /// Kick fingerprints along their alternate buckets to make room.
    fn relocate(&mut self, mut fp: u32, mut idx: usize) -> Result<(), FilterError> {
        let mask = self.bucket_mask();
        let mut rng = rand::thread_rng();
        let mut path: Vec<(usize, usize, u32)> = Vec::with_capacity(MAX_KICKS);

        for _ in 0..MAX_KICKS {
            let slot = rng.gen_range(0..TAGS_PER_BUCKET);
            let victim = self.slot(idx, slot);
            self.set_slot(idx, slot, fp);
            path.push((idx, slot, victim));

            fp = victim;
            idx = alt_index(idx, fp, mask);
            if self.try_place(idx, fp) {
                self.count += 1;
                return Ok(());
            }
        }

        // Undo every swap so the evicted fingerprints are not lost
        for (idx, slot, victim) in path.into_iter().rev() {
            self.set_slot(idx, slot, victim);
        }

        Err(FilterError::Capacity {
            items: self.count,
            slots: self.params.slots(),
        })
    }

    /// Check if a key might be in the filter.
    pub fn contains(&self, element: &[u8]) -> bool {
        let mask = self.bucket_mask();
        let (fp, i1) = fingerprint_and_index(element, self.params.fingerprint_bits, mask);
        self.bucket_contains(i1, fp) || self.bucket_contains(alt_index(i1, fp, mask), fp)
    }

    /// Number of stored fingerprints.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Occupied fraction of all slots.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.params.slots() as f64
    }

    /// Serialize the filter to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        // Integers and a byte vector always serialize into a Vec
        codec().serialize(self).unwrap_or_default()
    }

    /// Deserialize a filter from bytes, validating its structure
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        let filter: Self = codec()
            .deserialize(bytes)
            .map_err(|e| FilterError::Decode(e.to_string()))?;
        filter.validate()?;
        Ok(filter)
    }

    fn validate(&self) -> Result<(), FilterError> {
        let params = &self.params;

        if self.version != FORMAT_VERSION {
            return Err(FilterError::Decode(format!(
                "unsupported format version {}",
                self.version
            )));
        }

        if !(MIN_FINGERPRINT_BITS..=MAX_FINGERPRINT_BITS).contains(&params.fingerprint_bits) {
            return Err(FilterError::Decode(format!(
                "fingerprint width {} outside [{}, {}]",
                params.fingerprint_bits, MIN_FINGERPRINT_BITS, MAX_FINGERPRINT_BITS
            )));
        }

        if params.tags_per_bucket != TAGS_PER_BUCKET {
            return Err(FilterError::Decode(format!(
                "expected {} slots per bucket, found {}",
                TAGS_PER_BUCKET, params.tags_per_bucket
            )));
        }

        if !params.bucket_count.is_power_of_two() {
            return Err(FilterError::Decode(format!(
                "bucket count {} is not a power of two",
                params.bucket_count
            )));
        }

        let expected_bits = params
            .bucket_count
            .checked_mul(TAGS_PER_BUCKET)
            .and_then(|slots| slots.checked_mul(params.fingerprint_bits as usize));
        if expected_bits != Some(self.table.len()) {
            return Err(FilterError::Decode(format!(
                "table has {} bits, header implies {:?}",
                self.table.len(),
                expected_bits
            )));
        }

        let occupied = (0..params.bucket_count)
            .flat_map(|b| (0..TAGS_PER_BUCKET).map(move |s| (b, s)))
            .filter(|&(b, s)| self.slot(b, s) != 0)
            .count();
        if occupied != self.count {
            return Err(FilterError::Decode(format!(
                "header counts {} items but {} slots are occupied",
                self.count, occupied
            )));
        }

        Ok(())
    }

    fn bucket_mask(&self) -> usize {
        self.params.bucket_count - 1
    }

    fn slot_range(&self, bucket: usize, slot: usize) -> std::ops::Range<usize> {
        let width = self.params.fingerprint_bits as usize;
        let start = (bucket * TAGS_PER_BUCKET + slot) * width;
        start..start + width
    }

    fn slot(&self, bucket: usize, slot: usize) -> u32 {
        self.table[self.slot_range(bucket, slot)].load_le::<u32>()
    }

    fn set_slot(&mut self, bucket: usize, slot: usize, fp: u32) {
        let range = self.slot_range(bucket, slot);
        self.table[range].store_le::<u32>(fp);
    }

    fn bucket_contains(&self, bucket: usize, fp: u32) -> bool {
        (0..TAGS_PER_BUCKET).any(|s| self.slot(bucket, s) == fp)
    }

    /// Place `fp` in the first empty slot of `bucket`.
    fn try_place(&mut self, bucket: usize, fp: u32) -> bool {
        match (0..TAGS_PER_BUCKET).find(|&s| self.slot(bucket, s) == 0) {
            Some(s) => {
                self.set_slot(bucket, s, fp);
                true
            }
            None => false,
        }
    }
}
