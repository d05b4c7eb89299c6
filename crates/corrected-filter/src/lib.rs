//! # Corrected Filter
//!
//! Approximate set membership with retroactive false-positive correction.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure data structures, no I/O
//!   - `CuckooFilter`: Packed cuckoo filter, 4 slots per bucket, 4-32 bit fingerprints
//!   - `ArcCache`: Thread-safe adaptive replacement cache
//!   - `CorrectedFilterConfig`: Configuration with validation
//!   - `KeyEncoding`: Deterministic element-to-bytes contract
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `CorrectedFilterApi`: Driving port (inbound API)
//!   - `MembershipFilter`, `CorrectionCache`: Driven ports (owned collaborators)
//!
//! - **Service Layer** (`service/`): Composition
//!   - `CorrectedFilter`: Implements `CorrectedFilterApi` over a filter and a cache
//!
//! ## Semantics
//!
//! - `add` writes only to the membership filter.
//! - `check` asks the filter first; a negative answer is final. A positive
//!   answer is overridden when the element was reported through
//!   `mark_false_positive` and that report is still cached.
//! - `mark_false_positive` writes only to the correction cache. The cache is
//!   bounded, so old reports are eventually forgotten and the element checks
//!   positive again.
//! - `to_bytes` / `from_bytes` carry the filter only. Corrections are
//!   process-local and start empty after every restore.
//!
//! ## Invariants
//!
//! - **No false negatives**: if `add(e)` succeeded, the filter reports `e` present.
//! - **Corrections only suppress**: a cached correction can turn a positive
//!   into a negative, never the reverse.
//!
//! ## Usage Example
//!
//! ```ignore
//! use corrected_filter::CorrectedFilter;
//!
//! let filter = CorrectedFilter::<u64>::new(1 << 16, 0.0001, 1 << 10)?;
//! for i in 0..(1 << 12) {
//!     filter.add(&i)?;
//! }
//!
//! if let Some(oops) = ((1 << 12)..(1 << 20)).find(|i| filter.check(i).unwrap_or(false)) {
//!     filter.mark_false_positive(&oops);
//!     assert!(!filter.check(&oops)?);
//! }
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    ArcCache, ArcStats, BincodeKey, CorrectedFilterConfig, CorrectedFilterConfigBuilder,
    CuckooFilter, FilterParams, KeyEncoding,
};
pub use error::FilterError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::{CorrectedFilterApi, CorrectionCache, FilterStats, MembershipFilter};
pub use service::CorrectedFilter;
