//! Unit-root testing used to judge whether a differenced series is stationary.
//!
//! The search only needs a test statistic and critical values at 1%, 5% and
//! 10%, so the test is a trait. Any closure
//! `Fn(&[f64]) -> FracDiffResult<StationarityReport>` implements it, and
//! [`AugmentedDickeyFuller`] is the default.
//!
//! The ADF regression is fixed for reproducibility of the order search:
//!
//! ```text
//! Δy_t = α + β·y_{t-1} + γ·Δy_{t-1} + ε_t
//! ```
//!
//! one lagged difference, a constant and no trend, and no automatic lag
//! selection. The statistic is the t-ratio of `β`. Critical values come from
//! the MacKinnon (2010) response surface for the constant-only case.
//!
//! The regression is solved through the SVD pseudo-inverse. A rank-deficient
//! design (a constant series, or a linear trend whose differences are
//! constant) or a perfect fit has no usable t-ratio: the report then carries
//! a NaN statistic, which never rejects the unit root.

use crate::config::ConfidenceLevel;
use crate::errors::{validate_data_length, FracDiffError, FracDiffResult};
use nalgebra::{DMatrix, DVector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum number of input points accepted by the ADF test.
///
/// One lagged difference needs `nobs / 2 - 2 >= 1`, i.e. six points.
pub const MIN_ADF_OBSERVATIONS: usize = 6;

const ADF_LAG: usize = 1;
const ADF_REGRESSORS: usize = 3;
/// Singular values below `RANK_TOL * s_max` count as zero.
const RANK_TOL: f64 = 1e-10;
/// Residual variance below this share of the response energy is a perfect fit.
const PERFECT_FIT_TOL: f64 = 1e-20;

/// MacKinnon (2010) constant-only coefficients, one row per level (1%, 5%, 10%).
const MACKINNON_TAU_C: [[f64; 4]; 3] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-2.86154, -2.8903, -4.234, -40.040],
    [-2.56677, -1.5384, -2.809, 0.0],
];

/// Outcome of a unit-root test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationarityReport {
    /// Test statistic; more negative is stronger evidence against a unit root
    pub statistic: f64,
    /// Approximate p-value interpolated from the critical values
    pub p_value: f64,
    /// Observations used in the regression
    pub observations: usize,
    /// Lagged differences included
    pub used_lag: usize,
    /// `(significance, critical value)` for 1%, 5% and 10%
    pub critical_values: [(f64, f64); 3],
}

impl StationarityReport {
    /// Report for a regression without a usable statistic. Never rejects.
    pub fn degenerate(observations: usize) -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            observations,
            used_lag: ADF_LAG,
            critical_values: mackinnon_critical_values(observations.max(1)),
        }
    }

    /// False for [`StationarityReport::degenerate`] reports.
    pub fn is_finite(&self) -> bool {
        self.statistic.is_finite()
    }

    /// Critical value at `level`.
    pub fn critical_value(&self, level: ConfidenceLevel) -> f64 {
        self.critical_values[level.index()].1
    }

    /// True when the statistic is below the critical value at `level`.
    /// A NaN statistic never rejects.
    pub fn rejects_unit_root(&self, level: ConfidenceLevel) -> bool {
        self.statistic < self.critical_value(level)
    }
}

/// A test for a unit root in a finite sequence.
pub trait StationarityTest {
    /// Name used in error messages and logs.
    fn name(&self) -> &str {
        "stationarity test"
    }

    /// Run the test on finite values.
    fn run(&self, values: &[f64]) -> FracDiffResult<StationarityReport>;
}

impl<F> StationarityTest for F
where
    F: Fn(&[f64]) -> FracDiffResult<StationarityReport>,
{
    fn run(&self, values: &[f64]) -> FracDiffResult<StationarityReport> {
        self(values)
    }
}

/// Augmented Dickey-Fuller test with one lagged difference and a constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AugmentedDickeyFuller;

impl StationarityTest for AugmentedDickeyFuller {
    fn name(&self) -> &str {
        "augmented_dickey_fuller"
    }

    fn run(&self, values: &[f64]) -> FracDiffResult<StationarityReport> {
        augmented_dickey_fuller(values)
    }
}

/// MacKinnon (2010) critical values for `observations` regression rows.
pub fn mackinnon_critical_values(observations: usize) -> [(f64, f64); 3] {
    let n_inv = 1.0 / observations as f64;
    let mut table = [(0.0, 0.0); 3];
    for (slot, (level, coeffs)) in table
        .iter_mut()
        .zip(ConfidenceLevel::ALL.iter().zip(MACKINNON_TAU_C.iter()))
    {
        let value = coeffs[0] + n_inv * (coeffs[1] + n_inv * (coeffs[2] + n_inv * coeffs[3]));
        *slot = (level.significance(), value);
    }
    table
}

/// Run the fixed-lag ADF regression on `data`.
///
/// Fails with [`FracDiffError::InsufficientData`] below
/// [`MIN_ADF_OBSERVATIONS`] points and with
/// [`FracDiffError::StatisticalTestError`] on non-finite input.
pub fn augmented_dickey_fuller(data: &[f64]) -> FracDiffResult<StationarityReport> {
    validate_data_length(data, MIN_ADF_OBSERVATIONS)?;
    if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
        return Err(FracDiffError::StatisticalTestError {
            test_name: "augmented_dickey_fuller".to_string(),
            reason: format!("non-finite value at position {}", pos),
        });
    }

    let diffs: Vec<f64> = data.windows(2).map(|pair| pair[1] - pair[0]).collect();
    // Rows: diffs[t] for t in ADF_LAG..diffs.len()
    let observations = diffs.len() - ADF_LAG;

    let design = DMatrix::from_fn(observations, ADF_REGRESSORS, |row, col| {
        let t = row + ADF_LAG;
        match col {
            0 => data[t],
            1 => diffs[t - 1],
            _ => 1.0,
        }
    });
    let response = DVector::from_iterator(observations, diffs[ADF_LAG..].iter().copied());

    let svd = design.clone().svd(true, true);
    let eps = svd.singular_values.max() * RANK_TOL;
    let rank = svd.rank(eps);
    if rank < ADF_REGRESSORS {
        log::debug!(
            "ADF design has rank {} of {}; no statistic on {} observations",
            rank,
            ADF_REGRESSORS,
            observations
        );
        return Ok(StationarityReport::degenerate(observations));
    }

    let pinv = svd
        .pseudo_inverse(eps)
        .map_err(|reason| FracDiffError::NumericalError {
            reason: reason.to_string(),
            operation: Some("augmented_dickey_fuller".to_string()),
        })?;
    let beta = &pinv * &response;
    let unscaled_cov = &pinv * pinv.transpose();

    let residuals = &response - &design * &beta;
    let rss = residuals.norm_squared();
    let sigma2 = rss / (observations - rank) as f64;
    let se_beta = (sigma2 * unscaled_cov[(0, 0)]).sqrt();
    if !se_beta.is_finite() || rss <= PERFECT_FIT_TOL * response.norm_squared() {
        log::debug!(
            "ADF regression fits exactly (rss {:e}); no statistic on {} observations",
            rss,
            observations
        );
        return Ok(StationarityReport::degenerate(observations));
    }

    let statistic = beta[0] / se_beta;
    let critical_values = mackinnon_critical_values(observations);
    let p_value = interpolated_p_value(statistic, &critical_values);

    log::debug!(
        "ADF statistic {:.4} on {} observations (5% critical value {:.4})",
        statistic,
        observations,
        critical_values[1].1
    );

    Ok(StationarityReport {
        statistic,
        p_value,
        observations,
        used_lag: ADF_LAG,
        critical_values,
    })
}

/// Piecewise-linear p-value between the tabulated critical values.
fn interpolated_p_value(t_stat: f64, critical_values: &[(f64, f64); 3]) -> f64 {
    let cv_01 = critical_values[0].1;
    let cv_05 = critical_values[1].1;
    let cv_10 = critical_values[2].1;

    if t_stat < cv_01 {
        0.001
    } else if t_stat < cv_05 {
        0.01 + 0.04 * ((t_stat - cv_01) / (cv_05 - cv_01)).clamp(0.0, 1.0)
    } else if t_stat < cv_10 {
        0.05 + 0.05 * ((t_stat - cv_05) / (cv_10 - cv_05)).clamp(0.0, 1.0)
    } else if t_stat < 0.0 {
        0.10 + 0.89 * ((t_stat - cv_10) / (0.0 - cv_10)).clamp(0.0, 1.0)
    } else {
        0.99
    }
}
