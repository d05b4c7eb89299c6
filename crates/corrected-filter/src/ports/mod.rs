//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for callers of the corrected filter
//! - Driven Ports (outbound) - the membership filter and correction cache it composes

pub mod inbound;
pub mod outbound;

pub use inbound::{CorrectedFilterApi, FilterStats};
pub use outbound::{CorrectionCache, MembershipFilter};
