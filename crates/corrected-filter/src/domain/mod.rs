//! Domain Layer - Pure data structures
//!
//! This layer contains:
//! - Packed cuckoo filter (membership)
//! - Adaptive replacement cache (corrections)
//! - Hash functions
//! - Parameter derivation
//! - Configuration
//! - Key encoding
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Only the ARC cache owns a lock; everything else is plain `&mut self`

pub mod arc_cache;
pub mod config;
pub mod cuckoo;
pub mod hash_functions;
pub mod key_encoding;
pub mod parameters;

pub use arc_cache::{ArcCache, ArcStats};
pub use config::{CorrectedFilterConfig, CorrectedFilterConfigBuilder};
pub use cuckoo::{CuckooFilter, FORMAT_VERSION};
pub use key_encoding::{BincodeKey, KeyEncoding};
pub use parameters::{
    calculate_filter_params, fingerprint_bits_for, FilterParams, MAX_FINGERPRINT_BITS,
    MIN_FINGERPRINT_BITS, TAGS_PER_BUCKET,
};
