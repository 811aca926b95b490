//! Minimum-order search.
//!
//! Walks the order grid `lower, lower + step, ..., <= upper` and differences
//! the series at each point. The first order whose differenced series makes
//! the stationarity test reject a unit root at the configured confidence
//! level is accepted. Grid points are computed as `lower + i * step` from an
//! integer counter, so the number of evaluated points does not depend on
//! accumulated rounding.
//!
//! A grid point whose differenced series is too short for the test, or gives
//! it no usable statistic, counts as not stationary and the scan moves on.
//! Any other test error aborts the search.
//!
//! When no grid point is accepted the search still returns the last
//! differenced series, wrapped in [`SearchOutcome::Exhausted`] so callers can
//! tell it apart from a stationary result.

use crate::config::{SearchConfig, WindowMethod, DEFAULT_MAX_WEIGHT_TERMS};
use crate::differencer::{frac_diff_with_limit, DifferencedSeries};
use crate::errors::{FracDiffError, FracDiffResult};
use crate::series::Series;
use crate::stationarity::{StationarityReport, StationarityTest};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One evaluated grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchTrial {
    /// Differencing order
    pub order: f64,
    /// Test statistic of the differenced series
    pub statistic: f64,
    /// Critical value at the configured confidence level
    pub critical_value: f64,
    /// Window offset of the differenced series
    pub offset: usize,
    /// Length of the differenced series handed to the test
    pub observations: usize,
}

impl SearchTrial {
    /// True when this grid point passed the test.
    pub fn accepted(&self) -> bool {
        self.statistic < self.critical_value
    }
}

/// Result of a minimum-order search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<K = usize> {
    /// The smallest grid order that produced a stationary series.
    Found {
        /// Accepted order
        order: f64,
        /// Series differenced at `order`
        differenced: DifferencedSeries<K>,
        /// Test result at `order`
        report: StationarityReport,
        /// Every grid point evaluated, in order
        trials: Vec<SearchTrial>,
    },
    /// No grid order produced a stationary series.
    Exhausted {
        /// Last grid point evaluated
        last_order: f64,
        /// Series differenced at `last_order`
        differenced: DifferencedSeries<K>,
        /// Test result at `last_order`
        report: StationarityReport,
        /// Every grid point evaluated, in order
        trials: Vec<SearchTrial>,
        /// Interval that was searched
        interval: (f64, f64),
    },
}

impl<K> SearchOutcome<K> {
    /// Accepted order, or the last order tried when the grid was exhausted.
    pub fn order(&self) -> f64 {
        match self {
            SearchOutcome::Found { order, .. } => *order,
            SearchOutcome::Exhausted { last_order, .. } => *last_order,
        }
    }

    /// True for [`SearchOutcome::Found`].
    pub fn is_stationary(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// Differenced series at [`SearchOutcome::order`].
    pub fn differenced(&self) -> &DifferencedSeries<K> {
        match self {
            SearchOutcome::Found { differenced, .. }
            | SearchOutcome::Exhausted { differenced, .. } => differenced,
        }
    }

    /// Test result at [`SearchOutcome::order`].
    pub fn report(&self) -> &StationarityReport {
        match self {
            SearchOutcome::Found { report, .. } | SearchOutcome::Exhausted { report, .. } => {
                report
            }
        }
    }

    /// Every evaluated grid point.
    pub fn trials(&self) -> &[SearchTrial] {
        match self {
            SearchOutcome::Found { trials, .. } | SearchOutcome::Exhausted { trials, .. } => {
                trials
            }
        }
    }

    /// Consume the outcome, keeping the order and the differenced series.
    pub fn into_parts(self) -> (f64, DifferencedSeries<K>) {
        match self {
            SearchOutcome::Found {
                order, differenced, ..
            } => (order, differenced),
            SearchOutcome::Exhausted {
                last_order,
                differenced,
                ..
            } => (last_order, differenced),
        }
    }

    /// Strict view: an exhausted grid becomes [`FracDiffError::SearchExhausted`].
    pub fn into_result(self) -> FracDiffResult<(f64, DifferencedSeries<K>)> {
        match self {
            SearchOutcome::Found {
                order, differenced, ..
            } => Ok((order, differenced)),
            SearchOutcome::Exhausted {
                last_order,
                interval,
                ..
            } => Err(FracDiffError::SearchExhausted {
                lower: interval.0,
                upper: interval.1,
                last_order,
            }),
        }
    }
}

/// Grid orders `lower + i * step` inside `[lower, upper]`.
pub fn order_grid(search: &SearchConfig) -> impl Iterator<Item = f64> {
    let SearchConfig {
        lower, upper, step, ..
    } = *search;
    (0..search.grid_len()).map(move |i| (lower + i as f64 * step).min(upper))
}

/// Find the smallest grid order whose differenced series is stationary.
pub fn find_minimum_order<K, T>(
    series: &Series<K>,
    search: &SearchConfig,
    method: WindowMethod,
    threshold: f64,
    test: &T,
) -> FracDiffResult<SearchOutcome<K>>
where
    K: Ord + Clone,
    T: StationarityTest + ?Sized,
{
    find_minimum_order_with_limit(series, search, method, threshold, DEFAULT_MAX_WEIGHT_TERMS, test)
}

/// [`find_minimum_order`] with an explicit fixed-window weight cap.
pub fn find_minimum_order_with_limit<K, T>(
    series: &Series<K>,
    search: &SearchConfig,
    method: WindowMethod,
    threshold: f64,
    max_weight_terms: usize,
    test: &T,
) -> FracDiffResult<SearchOutcome<K>>
where
    K: Ord + Clone,
    T: StationarityTest + ?Sized,
{
    search.validate()?;

    let mut trials = Vec::with_capacity(search.grid_len());
    let mut last = None;

    for order in order_grid(search) {
        let (differenced, report) =
            evaluate(series, order, method, threshold, max_weight_terms, test)?;
        let trial = trial_for(order, &differenced, &report, search);
        trials.push(trial);

        log::debug!(
            "d = {:.4}: statistic {:.4} vs critical value {:.4} ({} observations)",
            order,
            trial.statistic,
            trial.critical_value,
            trial.observations
        );

        if trial.accepted() {
            log::info!(
                "{} rejects a unit root at d = {:.4} after {} grid points",
                test.name(),
                order,
                trials.len()
            );
            return Ok(SearchOutcome::Found {
                order,
                differenced,
                report,
                trials,
            });
        }
        last = Some((order, differenced, report));
    }

    exhausted(last, trials, search)
}

/// Evaluate every grid point concurrently and return the smallest accepted
/// order.
///
/// All grid points are computed, so an error at any point fails the search,
/// even one above the accepted order.
#[cfg(feature = "parallel")]
pub fn find_minimum_order_parallel<K, T>(
    series: &Series<K>,
    search: &SearchConfig,
    method: WindowMethod,
    threshold: f64,
    test: &T,
) -> FracDiffResult<SearchOutcome<K>>
where
    K: Ord + Clone + Send + Sync,
    T: StationarityTest + Sync + ?Sized,
{
    use rayon::prelude::*;

    search.validate()?;
    let grid: Vec<f64> = order_grid(search).collect();

    let evaluated: Vec<(f64, DifferencedSeries<K>, StationarityReport)> = grid
        .par_iter()
        .map(|&order| {
            evaluate(series, order, method, threshold, DEFAULT_MAX_WEIGHT_TERMS, test)
                .map(|(differenced, report)| (order, differenced, report))
        })
        .collect::<FracDiffResult<Vec<_>>>()?;

    let trials: Vec<SearchTrial> = evaluated
        .iter()
        .map(|(order, differenced, report)| trial_for(*order, differenced, report, search))
        .collect();

    match trials.iter().position(SearchTrial::accepted) {
        Some(pos) => {
            let (order, differenced, report) = evaluated.into_iter().nth(pos).ok_or_else(|| {
                FracDiffError::NumericalError {
                    reason: "accepted grid point missing from evaluations".to_string(),
                    operation: Some("find_minimum_order_parallel".to_string()),
                }
            })?;
            log::info!("{} rejects a unit root at d = {:.4}", test.name(), order);
            Ok(SearchOutcome::Found {
                order,
                differenced,
                report,
                trials,
            })
        }
        None => exhausted(evaluated.into_iter().last(), trials, search),
    }
}

fn evaluate<K, T>(
    series: &Series<K>,
    order: f64,
    method: WindowMethod,
    threshold: f64,
    max_weight_terms: usize,
    test: &T,
) -> FracDiffResult<(DifferencedSeries<K>, StationarityReport)>
where
    K: Ord + Clone,
    T: StationarityTest + ?Sized,
{
    let differenced = frac_diff_with_limit(series, order, method, threshold, max_weight_terms)?;
    let report = match test.run(differenced.series.values()) {
        Ok(report) => report,
        // too short or numerically unusable at this order: not stationary, keep scanning
        Err(err @ FracDiffError::InsufficientData { .. })
        | Err(err @ FracDiffError::NumericalError { .. }) => {
            log::warn!("{} skipped at d = {:.4}: {}", test.name(), order, err);
            StationarityReport::degenerate(differenced.series.len())
        }
        Err(err) => return Err(err),
    };
    Ok((differenced, report))
}

fn trial_for<K>(
    order: f64,
    differenced: &DifferencedSeries<K>,
    report: &StationarityReport,
    search: &SearchConfig,
) -> SearchTrial {
    SearchTrial {
        order,
        statistic: report.statistic,
        critical_value: report.critical_value(search.confidence),
        offset: differenced.window.offset,
        observations: report.observations,
    }
}

fn exhausted<K>(
    last: Option<(f64, DifferencedSeries<K>, StationarityReport)>,
    trials: Vec<SearchTrial>,
    search: &SearchConfig,
) -> FracDiffResult<SearchOutcome<K>> {
    let (last_order, differenced, report) = last.ok_or_else(|| FracDiffError::InvalidParameter {
        parameter: "step".to_string(),
        value: search.step,
        constraint: "grid must contain at least one order".to_string(),
    })?;
    log::warn!(
        "no order in [{}, {}] produced a stationary series; returning d = {}",
        search.lower,
        search.upper,
        last_order
    );
    Ok(SearchOutcome::Exhausted {
        last_order,
        differenced,
        report,
        trials,
        interval: (search.lower, search.upper),
    })
}
