//! Service Layer
//!
//! Composes the membership filter and correction cache behind the
//! inbound API.

pub mod corrected_filter;

pub use corrected_filter::CorrectedFilter;
