//! Corrected filter configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use corrected_filter::CorrectedFilterConfigBuilder;
//!
//! let config = CorrectedFilterConfigBuilder::new()
//!     .capacity(1 << 16)
//!     .target_fpr(0.0001)
//!     .correction_cache_size(1 << 10)
//!     .build()
//!     .expect("Valid config");
//! ```

use serde::{Deserialize, Serialize};

use super::parameters::{calculate_filter_params, FilterParams};
use crate::error::FilterError;

/// Corrected filter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrectedFilterConfig {
    /// Expected number of elements
    pub capacity: usize,
    /// Target false positive rate, in (0, 1)
    pub target_fpr: f64,
    /// Maximum live corrections
    pub correction_cache_size: usize,
}

impl Default for CorrectedFilterConfig {
    fn default() -> Self {
        Self {
            capacity: 1 << 16,
            target_fpr: 0.0001, // 14-bit fingerprints
            correction_cache_size: 1 << 10,
        }
    }
}

impl CorrectedFilterConfig {
    /// Create a new configuration with validation
    pub fn new(
        capacity: usize,
        target_fpr: f64,
        correction_cache_size: usize,
    ) -> Result<Self, FilterError> {
        let config = Self {
            capacity,
            target_fpr,
            correction_cache_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate construction preconditions
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.correction_cache_size == 0 {
            return Err(FilterError::InvalidCacheSize {
                size: self.correction_cache_size,
            });
        }

        self.filter_params().map(|_| ())
    }

    /// Derived cuckoo parameters.
    pub fn filter_params(&self) -> Result<FilterParams, FilterError> {
        calculate_filter_params(self.capacity, self.target_fpr)
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = fpr;
        self
    }

    pub fn with_correction_cache_size(mut self, size: usize) -> Self {
        self.correction_cache_size = size;
        self
    }
}

/// Builder for CorrectedFilterConfig with validation
///
/// Unset fields fall back to [`CorrectedFilterConfig::default`].
#[derive(Default)]
pub struct CorrectedFilterConfigBuilder {
    capacity: Option<usize>,
    target_fpr: Option<f64>,
    correction_cache_size: Option<usize>,
}

impl CorrectedFilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set expected element count
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set target false positive rate (must be in (0, 1))
    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Set the number of corrections kept before eviction starts
    pub fn correction_cache_size(mut self, size: usize) -> Self {
        self.correction_cache_size = Some(size);
        self
    }

    /// Build the config, validating all parameters
    pub fn build(self) -> Result<CorrectedFilterConfig, FilterError> {
        let defaults = CorrectedFilterConfig::default();

        let config = CorrectedFilterConfig {
            capacity: self.capacity.unwrap_or(defaults.capacity),
            target_fpr: self.target_fpr.unwrap_or(defaults.target_fpr),
            correction_cache_size: self
                .correction_cache_size
                .unwrap_or(defaults.correction_cache_size),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CorrectedFilterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.filter_params().unwrap().fingerprint_bits, 14);
    }

    #[test]
    fn test_rejects_zero_cache_size() {
        let result = CorrectedFilterConfig::new(100, 0.01, 0);
        assert!(matches!(result, Err(FilterError::InvalidCacheSize { size: 0 })));
    }

    #[test]
    fn test_rejects_fpr_out_of_range() {
        for fpr in [0.0, 1.0, 2.0, -0.5, f64::NAN] {
            let result = CorrectedFilterConfig::new(100, fpr, 10);
            assert!(
                matches!(result, Err(FilterError::InvalidFalsePositiveRate { .. })),
                "fpr {} should be rejected",
                fpr
            );
        }
    }

    #[test]
    fn test_rejects_unaddressable_capacity() {
        let result = CorrectedFilterConfig::new(usize::MAX / 2, 0.01, 10);
        assert!(matches!(result, Err(FilterError::InvalidParameters(_))));
    }

    #[test]
    fn test_extreme_rates_accepted() {
        assert!(CorrectedFilterConfig::new(100, 1e-12, 10).is_ok());
        assert!(CorrectedFilterConfig::new(100, 0.9, 10).is_ok());
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = CorrectedFilterConfigBuilder::new()
            .target_fpr(0.01)
            .build()
            .expect("Should use defaults for other fields");

        let defaults = CorrectedFilterConfig::default();
        assert_eq!(config.capacity, defaults.capacity);
        assert_eq!(config.correction_cache_size, defaults.correction_cache_size);
        assert_eq!(config.target_fpr, 0.01);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        let result = CorrectedFilterConfigBuilder::new().correction_cache_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_with_methods_chain() {
        let config = CorrectedFilterConfig::default()
            .with_capacity(10)
            .with_target_fpr(0.5)
            .with_correction_cache_size(3);
        assert_eq!(config, CorrectedFilterConfig::new(10, 0.5, 3).unwrap());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{"capacity":4096,"target_fpr":0.001,"correction_cache_size":64}"#;
        let config: CorrectedFilterConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.filter_params().unwrap().fingerprint_bits, 10);
    }
}
