//! Error types and validation functions for fractional differencing.
//!
//! This module provides the error taxonomy shared by every stage of the
//! pipeline (weight generation, differencing, order search, column assembly)
//! together with the small validators used to check configuration values
//! before any computation starts.

use thiserror::Error;

/// Error types for fractional differencing operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FracDiffError {
    /// The differencing order cannot be used to build a weight vector.
    #[error("Invalid differencing order d = {order}: {reason}")]
    InvalidOrder {
        /// Order that was rejected
        order: f64,
        /// Why the order was rejected
        reason: String,
    },

    /// Invalid parameter value for a configuration field.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Insufficient data for the requested computation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Numerical computation error due to instability or a singular system.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// Series keys are inconsistent with their values or not strictly ordered.
    #[error("Invalid series index: {reason}")]
    InvalidIndex {
        /// Description of the index problem
        reason: String,
    },

    /// A frame already holds a column with this name.
    #[error("Duplicate column name: {name}")]
    DuplicateColumn {
        /// Offending column name
        name: String,
    },

    /// Statistical test computation failure.
    #[error("Statistical test failed: {test_name}: {reason}")]
    StatisticalTestError {
        /// Name of the statistical test that failed
        test_name: String,
        /// Reason reported by the test
        reason: String,
    },

    /// No order on the search grid produced a stationary series.
    #[error(
        "No stationary order found in [{lower}, {upper}]; last attempted order was {last_order}"
    )]
    SearchExhausted {
        /// Lower bound of the searched interval
        lower: f64,
        /// Upper bound of the searched interval
        upper: f64,
        /// Last grid point evaluated
        last_order: f64,
    },
}

/// Result type for fractional differencing operations.
///
/// This is a convenience type alias for operations that may fail with [`FracDiffError`].
pub type FracDiffResult<T> = Result<T, FracDiffError>;

/// Fails with [`FracDiffError::InsufficientData`] when `data` holds fewer
/// than `min_required` points.
///
/// # Example
/// ```rust
/// use fracdiff::errors::validate_data_length;
///
/// let differenced = vec![0.4, -0.1, 0.3];
/// assert!(validate_data_length(&differenced, 3).is_ok());
/// assert!(validate_data_length(&differenced, 6).is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize) -> FracDiffResult<()> {
    if data.len() < min_required {
        Err(FracDiffError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Checks that `value` lies in `[min, max]`. NaN is always rejected, and
/// so is infinity when `max` is finite.
///
/// # Example
/// ```rust
/// use fracdiff::errors::validate_parameter;
///
/// assert!(validate_parameter(1e-2, 0.0, f64::MAX, "threshold").is_ok());
/// assert!(validate_parameter(-1e-2, 0.0, f64::MAX, "threshold").is_err());
/// assert!(validate_parameter(f64::INFINITY, 0.0, f64::MAX, "threshold").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> FracDiffResult<()> {
    if value.is_nan() {
        return Err(FracDiffError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if min.is_nan() || max.is_nan() || min > max {
        return Err(FracDiffError::NumericalError {
            reason: format!(
                "Invalid bounds for parameter {}: min={}, max={}",
                name, min, max
            ),
            operation: None,
        });
    }

    if value < min || value > max {
        Err(FracDiffError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that a value is finite and not NaN.
///
/// # Example
/// ```rust
/// use fracdiff::errors::validate_finite;
///
/// assert!(validate_finite(1.0, "step").is_ok());
/// assert!(validate_finite(f64::NAN, "step").is_err());
/// assert!(validate_finite(f64::INFINITY, "step").is_err());
/// ```
pub fn validate_finite(value: f64, name: &str) -> FracDiffResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FracDiffError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must be finite".to_string(),
        })
    }
}

/// Validates that a value is finite and strictly positive.
pub fn validate_positive(value: f64, name: &str) -> FracDiffResult<()> {
    validate_finite(value, name)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(FracDiffError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must be > 0".to_string(),
        })
    }
}

/// Validates that a differencing order is usable by the weight recursion.
pub fn validate_order(order: f64) -> FracDiffResult<()> {
    if order.is_finite() {
        Ok(())
    } else {
        Err(FracDiffError::InvalidOrder {
            order,
            reason: "order must be finite".to_string(),
        })
    }
}
