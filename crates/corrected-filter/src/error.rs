//! Error types for the corrected filter

use thiserror::Error;

/// Boxed error produced by a caller-supplied key encoder.
pub type BoxedEncodingError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building or operating a corrected filter
#[derive(Debug, Error)]
pub enum FilterError {
    /// The element could not be turned into its byte key.
    #[error("Key encoding failed: {0}")]
    Encoding(#[source] BoxedEncodingError),

    /// The membership filter has no room left for this item.
    #[error("Insertion failed: filter is full ({items} items in {slots} slots)")]
    Capacity { items: usize, slots: usize },

    #[error("Invalid false positive rate: {fpr} (must be in the open interval (0, 1))")]
    InvalidFalsePositiveRate { fpr: f64 },

    #[error("Invalid correction cache size: {size} (must be positive)")]
    InvalidCacheSize { size: usize },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    /// Serialized filter bytes were malformed or structurally inconsistent.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl FilterError {
    /// Wrap a caller encoder failure.
    pub fn encoding<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Encoding(Box::new(err))
    }

    /// Whether this error was raised while constructing a filter.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::InvalidFalsePositiveRate { .. }
                | Self::InvalidCacheSize { .. }
                | Self::InvalidParameters(_)
        )
    }
}
