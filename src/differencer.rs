//! Fractional differencing of a single series.
//!
//! Weights from [`crate::weights`] are applied as a sliding dot product over
//! the raw values. The output is keyed by a suffix of the input keys starting
//! at the window offset `l`; positions whose input value is missing are left
//! out of the output instead of being filled.
//!
//! ## Windowing
//!
//! - **Fixed**: the truncated weight vector of length `l` is applied to the
//!   `l` values ending at each position. If `l` exceeds the series length the
//!   call falls back to the expanding window, and the returned
//!   [`AppliedWindow`] records the fallback.
//! - **Expanding**: every position `idx` uses the whole history up to and
//!   including itself, i.e. `idx + 1` values against the trailing `idx + 1`
//!   weights; the first `l` positions are skipped, where `l` comes from the
//!   cumulative-loss cutoff of the full weight vector.
//!
//! Both windows end at and include the current position, so `d = 0` returns
//! the input values unchanged.
//!
//! ## Missing values
//!
//! A non-finite value removes every output position whose window contains
//! it. For the fixed window that is the `l` positions starting at the hole.
//! The expanding window contains the whole history, so one hole removes the
//! hole and everything after it.

use crate::config::{WindowMethod, DEFAULT_MAX_WEIGHT_TERMS};
use crate::errors::{validate_finite, FracDiffResult};
use crate::series::Series;
use crate::weights::{generate_weights, WeightVector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Window that was actually applied to a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AppliedWindow {
    /// Method the caller asked for
    pub requested: WindowMethod,
    /// Method used after any fallback
    pub applied: WindowMethod,
    /// First input position that may appear in the output
    pub offset: usize,
    /// Number of weights that were generated
    pub weights_len: usize,
}

impl AppliedWindow {
    /// True when a fixed window did not fit and the expanding window was used.
    pub fn used_fallback(&self) -> bool {
        self.requested != self.applied
    }
}

/// Differenced values together with the window that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencedSeries<K = usize> {
    /// Output values keyed by a suffix of the input keys
    pub series: Series<K>,
    /// Window description
    pub window: AppliedWindow,
}

impl<K> DifferencedSeries<K> {
    /// Output offset `l`.
    pub fn offset(&self) -> usize {
        self.window.offset
    }

    /// True when a fixed window fell back to the expanding window.
    pub fn used_fallback(&self) -> bool {
        self.window.used_fallback()
    }

    /// Drop the window description.
    pub fn into_series(self) -> Series<K> {
        self.series
    }
}

/// Fractionally difference `series` with order `d`.
///
/// Uses the default fixed-window weight cap; see [`frac_diff_with_limit`].
/// Positions whose window contains a non-finite value are omitted. With
/// [`WindowMethod::Expanding`] that is every position from the first
/// non-finite value onwards.
///
/// # Example
/// ```rust
/// use fracdiff::{frac_diff, Series, WindowMethod};
///
/// let series = Series::from_values((1..=10).map(|v| v as f64).collect());
/// let out = frac_diff(&series, 1.0, WindowMethod::Fixed, 1e-2).unwrap();
/// assert_eq!(out.series.keys(), &[2, 3, 4, 5, 6, 7, 8, 9]);
/// assert!(out.series.values().iter().all(|v| (*v - 1.0).abs() < 1e-12));
/// ```
pub fn frac_diff<K: Ord + Clone>(
    series: &Series<K>,
    d: f64,
    method: WindowMethod,
    threshold: f64,
) -> FracDiffResult<DifferencedSeries<K>> {
    frac_diff_with_limit(series, d, method, threshold, DEFAULT_MAX_WEIGHT_TERMS)
}

/// Fractionally difference `series`, rejecting fixed-window orders that need
/// more than `max_weight_terms` weights.
pub fn frac_diff_with_limit<K: Ord + Clone>(
    series: &Series<K>,
    d: f64,
    method: WindowMethod,
    threshold: f64,
    max_weight_terms: usize,
) -> FracDiffResult<DifferencedSeries<K>> {
    validate_finite(threshold, "threshold")?;
    let size = series.len();

    match method {
        WindowMethod::Fixed => {
            let weights = generate_weights(d, size, WindowMethod::Fixed, threshold, max_weight_terms)?;
            if weights.len() > size {
                log::warn!(
                    "fixed window of {} weights does not fit series of length {} (d = {}); using expanding window",
                    weights.len(),
                    size,
                    d
                );
                return expanding(series, d, threshold, WindowMethod::Fixed);
            }
            Ok(fixed(series, &weights))
        }
        WindowMethod::Expanding => expanding(series, d, threshold, WindowMethod::Expanding),
    }
}

fn fixed<K: Ord + Clone>(series: &Series<K>, weights: &WeightVector) -> DifferencedSeries<K> {
    let values = series.values();
    let width = weights.len();

    let (keys, out) = apply(series, width, |idx| {
        dot(weights.as_slice(), &values[idx + 1 - width..=idx])
    });

    log::debug!(
        "fixed window: {} weights, {} of {} positions emitted",
        width,
        out.len(),
        values.len()
    );

    DifferencedSeries {
        series: Series::from_parts_unchecked(keys, out),
        window: AppliedWindow {
            requested: WindowMethod::Fixed,
            applied: WindowMethod::Fixed,
            offset: width,
            weights_len: width,
        },
    }
}

fn expanding<K: Ord + Clone>(
    series: &Series<K>,
    d: f64,
    threshold: f64,
    requested: WindowMethod,
) -> FracDiffResult<DifferencedSeries<K>> {
    let values = series.values();
    // Magnitude never truncates the expanding recursion, so the cap is unused.
    let weights = generate_weights(d, values.len(), WindowMethod::Expanding, threshold, usize::MAX)?;
    let offset = weights.cumulative_loss_cutoff(threshold);

    let (keys, out) = apply(series, offset, |idx| {
        dot(weights.trailing(idx + 1), &values[..=idx])
    });

    log::debug!(
        "expanding window: offset {}, {} of {} positions emitted",
        offset,
        out.len(),
        values.len()
    );

    Ok(DifferencedSeries {
        series: Series::from_parts_unchecked(keys, out),
        window: AppliedWindow {
            requested,
            applied: WindowMethod::Expanding,
            offset,
            weights_len: weights.len(),
        },
    })
}

/// Evaluate `value_at` for every position from `offset` onwards whose input
/// is finite. Results that are not finite (a missing value inside the
/// window) are left out as well.
fn apply<K, F>(series: &Series<K>, offset: usize, mut value_at: F) -> (Vec<K>, Vec<f64>)
where
    K: Ord + Clone,
    F: FnMut(usize) -> f64,
{
    let values = series.values();
    let capacity = values.len().saturating_sub(offset);
    let mut keys = Vec::with_capacity(capacity);
    let mut out = Vec::with_capacity(capacity);

    for idx in offset..values.len() {
        if !values[idx].is_finite() {
            continue;
        }
        let value = value_at(idx);
        if !value.is_finite() {
            continue;
        }
        keys.push(series.keys()[idx].clone());
        out.push(value);
    }
    (keys, out)
}

#[inline]
fn dot(weights: &[f64], window: &[f64]) -> f64 {
    debug_assert_eq!(weights.len(), window.len());
    weights.iter().zip(window).map(|(w, x)| w * x).sum()
}
