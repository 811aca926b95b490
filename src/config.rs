//! # Differencing Configuration
//!
//! This module contains the configuration values that control how series are
//! differenced: the fixed order, the windowing method, the truncation
//! tolerance, and the grid used by the minimum-order search.
//!
//! Every configuration is a plain value. Builders return a new value and
//! nothing is shared between transformer instances.

use crate::errors::{
    validate_order, validate_parameter, validate_positive, FracDiffError, FracDiffResult,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default fixed differencing order
pub const DEFAULT_ORDER: f64 = 1.0;
/// Default weight / cumulative-loss tolerance
pub const DEFAULT_THRESHOLD: f64 = 1e-2;
/// Default cap on the number of weights the fixed-window recursion may produce
pub const DEFAULT_MAX_WEIGHT_TERMS: usize = 100_000;
/// Upper bound on the number of grid points a search may evaluate
pub const MAX_GRID_POINTS: usize = 10_000;

/// Windowing method used when applying the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowMethod {
    /// Fixed-width window: weights truncated once they drop below the tolerance
    #[default]
    Fixed,
    /// Expanding window: all available history, truncated by cumulative loss
    Expanding,
}

/// Confidence level used to read the stationarity test's critical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConfidenceLevel {
    /// 1% critical value (index 0)
    OnePercent,
    /// 5% critical value (index 1)
    #[default]
    FivePercent,
    /// 10% critical value (index 2)
    TenPercent,
}

impl ConfidenceLevel {
    /// All levels, ordered by index.
    pub const ALL: [ConfidenceLevel; 3] = [
        ConfidenceLevel::OnePercent,
        ConfidenceLevel::FivePercent,
        ConfidenceLevel::TenPercent,
    ];

    /// Map a confidence index (0: 1%, 1: 5%, 2: 10%) to a level.
    pub fn from_index(index: usize) -> FracDiffResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| FracDiffError::InvalidParameter {
                parameter: "confidence_index".to_string(),
                value: index as f64,
                constraint: "one of 0 (1%), 1 (5%), 2 (10%)".to_string(),
            })
    }

    /// Position of this level in the critical value table.
    pub fn index(self) -> usize {
        match self {
            ConfidenceLevel::OnePercent => 0,
            ConfidenceLevel::FivePercent => 1,
            ConfidenceLevel::TenPercent => 2,
        }
    }

    /// Significance level as a fraction.
    pub fn significance(self) -> f64 {
        match self {
            ConfidenceLevel::OnePercent => 0.01,
            ConfidenceLevel::FivePercent => 0.05,
            ConfidenceLevel::TenPercent => 0.10,
        }
    }
}

/// Grid and acceptance rule for the minimum-order search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Lower bound of the order interval (first grid point)
    pub lower: f64,
    /// Upper bound of the order interval (inclusive)
    pub upper: f64,
    /// Distance between grid points
    pub step: f64,
    /// Critical value used to accept an order
    pub confidence: ConfidenceLevel,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
            step: 0.1,
            confidence: ConfidenceLevel::FivePercent,
        }
    }
}

impl SearchConfig {
    /// Search configuration over `[lower, upper]` with the given step.
    pub fn new(lower: f64, upper: f64, step: f64) -> Self {
        Self {
            lower,
            upper,
            step,
            ..Self::default()
        }
    }

    /// Replace the confidence level.
    pub fn with_confidence(self, confidence: ConfidenceLevel) -> Self {
        Self { confidence, ..self }
    }

    /// Number of grid points `lower + i * step` that fall inside `[lower, upper]`.
    ///
    /// A relative tolerance absorbs representation error so that `[0, 1]`
    /// with step `0.1` yields eleven points.
    pub fn grid_len(&self) -> usize {
        let span = (self.upper - self.lower) / self.step;
        (span + 1e-9 * span.abs().max(1.0)).floor() as usize + 1
    }

    /// Check bounds, step and grid size.
    pub fn validate(&self) -> FracDiffResult<()> {
        validate_order(self.lower)?;
        validate_order(self.upper)?;
        validate_positive(self.step, "step")?;
        if self.lower > self.upper {
            return Err(FracDiffError::InvalidParameter {
                parameter: "lower".to_string(),
                value: self.lower,
                constraint: format!("<= upper ({})", self.upper),
            });
        }
        let points = (self.upper - self.lower) / self.step;
        if points >= MAX_GRID_POINTS as f64 {
            return Err(FracDiffError::InvalidParameter {
                parameter: "step".to_string(),
                value: self.step,
                constraint: format!("grid must have at most {} points", MAX_GRID_POINTS),
            });
        }
        Ok(())
    }
}

/// Configuration for [`crate::FracDiffTransformer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FracDiffConfig {
    /// Differencing order used when `minimum` is false
    pub order: f64,
    /// Windowing method
    pub method: WindowMethod,
    /// Weight tolerance (fixed) or cumulative-loss tolerance (expanding)
    pub threshold: f64,
    /// Search for the minimum stationary order instead of using `order`
    pub minimum: bool,
    /// Grid used when `minimum` is true
    pub search: SearchConfig,
    /// Cap on fixed-window weights before the order is rejected
    pub max_weight_terms: usize,
}

impl Default for FracDiffConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            method: WindowMethod::Fixed,
            threshold: DEFAULT_THRESHOLD,
            minimum: false,
            search: SearchConfig::default(),
            max_weight_terms: DEFAULT_MAX_WEIGHT_TERMS,
        }
    }
}

impl FracDiffConfig {
    /// Fixed-order configuration.
    pub fn fixed_order(order: f64) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Minimum-order configuration searching the given grid.
    pub fn minimum_order(search: SearchConfig) -> Self {
        Self {
            minimum: true,
            search,
            ..Self::default()
        }
    }

    /// Replace the windowing method.
    pub fn with_method(self, method: WindowMethod) -> Self {
        Self { method, ..self }
    }

    /// Replace the truncation tolerance.
    pub fn with_threshold(self, threshold: f64) -> Self {
        Self { threshold, ..self }
    }

    /// Replace the fixed-window weight cap.
    pub fn with_max_weight_terms(self, max_weight_terms: usize) -> Self {
        Self {
            max_weight_terms,
            ..self
        }
    }

    /// Check every field used by the selected mode.
    pub fn validate(&self) -> FracDiffResult<()> {
        validate_parameter(self.threshold, 0.0, f64::MAX, "threshold")?;
        if self.max_weight_terms == 0 {
            return Err(FracDiffError::InvalidParameter {
                parameter: "max_weight_terms".to_string(),
                value: 0.0,
                constraint: ">= 1".to_string(),
            });
        }
        if self.minimum {
            self.search.validate()
        } else {
            validate_order(self.order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FracDiffConfig::default();
        assert_eq!(config.order, 1.0);
        assert_eq!(config.method, WindowMethod::Fixed);
        assert_eq!(config.threshold, 0.01);
        assert!(!config.minimum);
        assert_eq!(config.search.lower, 0.0);
        assert_eq!(config.search.upper, 1.0);
        assert_eq!(config.search.step, 0.1);
        assert_eq!(config.search.confidence, ConfidenceLevel::FivePercent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_confidence_index_round_trip() {
        for index in 0..3 {
            let level = ConfidenceLevel::from_index(index).unwrap();
            assert_eq!(level.index(), index);
        }
        assert!(ConfidenceLevel::from_index(3).is_err());
    }

    #[test]
    fn test_grid_len_counts_closed_interval() {
        assert_eq!(SearchConfig::default().grid_len(), 11);
        assert_eq!(SearchConfig::new(0.0, 1.0, 0.3).grid_len(), 4);
        assert_eq!(SearchConfig::new(0.5, 0.5, 0.1).grid_len(), 1);
        assert_eq!(SearchConfig::new(0.0, 2.0, 0.25).grid_len(), 9);
    }

    #[test]
    fn test_search_validation() {
        assert!(SearchConfig::new(1.0, 0.0, 0.1).validate().is_err());
        assert!(SearchConfig::new(0.0, 1.0, 0.0).validate().is_err());
        assert!(SearchConfig::new(0.0, 1.0, -0.1).validate().is_err());
        assert!(SearchConfig::new(0.0, f64::INFINITY, 0.1).validate().is_err());
        assert!(SearchConfig::new(0.0, 1.0, 1e-6).validate().is_err());
    }

    #[test]
    fn test_builders_do_not_share_state() {
        let base = FracDiffConfig::default();
        let tuned = base.clone().with_threshold(1e-4).with_method(WindowMethod::Expanding);
        assert_eq!(base.threshold, 0.01);
        assert_eq!(base.method, WindowMethod::Fixed);
        assert_eq!(tuned.threshold, 1e-4);
        assert_eq!(tuned.method, WindowMethod::Expanding);
    }

    #[test]
    fn test_config_validation() {
        assert!(FracDiffConfig::default().with_threshold(-0.1).validate().is_err());
        assert!(FracDiffConfig::default().with_threshold(f64::NAN).validate().is_err());
        assert!(FracDiffConfig::fixed_order(f64::NAN).validate().is_err());
        assert!(FracDiffConfig::default().with_max_weight_terms(0).validate().is_err());
        let bad_grid = FracDiffConfig::minimum_order(SearchConfig::new(0.0, 1.0, 0.0));
        assert!(bad_grid.validate().is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(FracDiffConfig::default().with_threshold(0.0).validate().is_ok());
        match FracDiffConfig::default().with_threshold(f64::INFINITY).validate() {
            Err(FracDiffError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "threshold")
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }
}
