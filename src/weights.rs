//! Binomial-series weights for the fractional difference operator `(1 - L)^d`.
//!
//! The weights follow the recursion `w_0 = 1`, `w_k = -w_{k-1} (d - k + 1) / k`.
//! Vectors are returned oldest lag first, so the last element is always the
//! lag-0 weight `1.0` and a dot product with a trailing window of the series
//! needs no reordering.

use crate::config::WindowMethod;
use crate::errors::{validate_order, FracDiffError, FracDiffResult};

/// Weights ordered from the most distant lag to lag 0.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    weights: Vec<f64>,
}

impl WeightVector {
    /// Number of weights.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false: the lag-0 weight is always present.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weights, oldest lag first.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Lag-0 weight.
    pub fn last(&self) -> f64 {
        self.weights.last().copied().unwrap_or(1.0)
    }

    /// The last `count` weights, i.e. lags `count - 1` down to 0.
    pub fn trailing(&self, count: usize) -> &[f64] {
        &self.weights[self.weights.len() - count.min(self.weights.len())..]
    }

    /// Number of leading positions an expanding window must skip.
    ///
    /// Cumulative absolute weights are normalised by their total; the
    /// result is the count of normalised entries strictly above `threshold`.
    pub fn cumulative_loss_cutoff(&self, threshold: f64) -> usize {
        let total: f64 = self.weights.iter().map(|w| w.abs()).sum();
        if total == 0.0 {
            return self.weights.len();
        }
        let mut cumulative = 0.0;
        self.weights
            .iter()
            .filter(|w| {
                cumulative += w.abs();
                cumulative / total > threshold
            })
            .count()
    }
}

/// Generate the weight vector for order `d`.
///
/// * [`WindowMethod::Fixed`] recurses until `|w_k| <= threshold` (that term is
///   dropped), so the length depends only on `d` and `threshold`. Fails with
///   [`FracDiffError::InvalidOrder`] if more than `max_terms` weights would be
///   produced.
/// * [`WindowMethod::Expanding`] produces exactly `max(size, 1)` weights, one
///   per lag `0..size`, regardless of magnitude.
///
/// # Example
/// ```rust
/// use fracdiff::{generate_weights, WindowMethod};
///
/// let w = generate_weights(1.0, 10, WindowMethod::Fixed, 1e-2, 1_000).unwrap();
/// assert_eq!(w.as_slice(), &[-1.0, 1.0]);
/// ```
pub fn generate_weights(
    d: f64,
    size: usize,
    method: WindowMethod,
    threshold: f64,
    max_terms: usize,
) -> FracDiffResult<WeightVector> {
    validate_order(d)?;

    let mut weights = vec![1.0];
    match method {
        WindowMethod::Fixed => {
            let mut k = 1usize;
            loop {
                let next = next_weight(weights[k - 1], d, k);
                if !next.is_finite() {
                    return Err(FracDiffError::InvalidOrder {
                        order: d,
                        reason: format!("weight recursion overflowed at lag {}", k),
                    });
                }
                if next.abs() <= threshold {
                    break;
                }
                if weights.len() >= max_terms {
                    return Err(FracDiffError::InvalidOrder {
                        order: d,
                        reason: format!(
                            "weights still above threshold {} after {} terms",
                            threshold, max_terms
                        ),
                    });
                }
                weights.push(next);
                k += 1;
            }
        }
        WindowMethod::Expanding => {
            weights.reserve(size.saturating_sub(1));
            for k in 1..size {
                let next = next_weight(weights[k - 1], d, k);
                weights.push(next);
            }
        }
    }

    weights.reverse();
    log::debug!(
        "generated {} {:?} weights for d = {} (threshold {})",
        weights.len(),
        method,
        d,
        threshold
    );
    Ok(WeightVector { weights })
}

#[inline]
fn next_weight(previous: f64, d: f64, k: usize) -> f64 {
    -previous / k as f64 * (d - k as f64 + 1.0)
}
