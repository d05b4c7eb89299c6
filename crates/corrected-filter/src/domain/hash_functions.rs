//! Hash functions for the cuckoo filter
//!
//! One MurmurHash3 x64/128 pass per key: the low half picks the primary
//! bucket, the high half supplies the fingerprint.

use std::io::Cursor;

/// Seed shared by every filter so encoded tables stay portable.
const KEY_SEED: u32 = 0;

/// Mixing constant for the alternate bucket (MurmurHash2 multiplier).
const ALT_INDEX_MIX: u64 = 0x5bd1_e995;

/// Hash a key with MurmurHash3 x64/128
pub fn murmur_hash128(element: &[u8]) -> u128 {
    let mut cursor = Cursor::new(element);
    // Reading from an in-memory cursor cannot fail
    murmur3::murmur3_x64_128(&mut cursor, KEY_SEED).unwrap_or(0)
}

/// Derive a non-zero fingerprint of `bits` width and the primary bucket index.
///
/// `bucket_mask` must be `bucket_count - 1` for a power-of-two bucket count.
pub fn fingerprint_and_index(element: &[u8], bits: u32, bucket_mask: usize) -> (u32, usize) {
    let hash = murmur_hash128(element);
    let low = hash as u64;
    let high = (hash >> 64) as u64;

    let mask = fingerprint_mask(bits);
    let mut fp = (high as u32) & mask;
    // Zero marks an empty slot
    if fp == 0 {
        fp = 1;
    }

    (fp, (low as usize) & bucket_mask)
}

/// Partial-key cuckoo hashing: `alt(alt(i, fp), fp) == i`.
pub fn alt_index(index: usize, fp: u32, bucket_mask: usize) -> usize {
    let mixed = (fp as u64).wrapping_mul(ALT_INDEX_MIX);
    (index ^ mixed as usize) & bucket_mask
}

/// Mask selecting the low `bits` of a fingerprint.
pub fn fingerprint_mask(bits: u32) -> u32 {
    ((1u64 << bits) - 1) as u32
}
