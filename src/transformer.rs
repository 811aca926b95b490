//! # Column-wise Fractional Differencing
//!
//! [`FracDiffTransformer`] applies either a fixed order or a searched minimum
//! order to every column of a [`Frame`] and assembles the differenced columns
//! into a new frame. Output columns are named `<input>_fd`, keep the input
//! column order, and keep their own index: two columns with different window
//! offsets are not reconciled.
//!
//! ## Usage Example
//!
//! ```rust
//! use fracdiff::{FracDiffConfig, FracDiffTransformer, Frame, Series};
//! use fracdiff::errors::FracDiffError;
//!
//! # fn main() -> Result<(), FracDiffError> {
//! let prices = Series::from_values((1..=10).map(|v| v as f64).collect());
//! let volume = Series::from_values(vec![5.0, 7.0, 6.0, 9.0, 8.0, 12.0]);
//! let frame = Frame::from_columns(vec![("price", prices), ("volume", volume)])?;
//!
//! let transformer = FracDiffTransformer::new(FracDiffConfig::fixed_order(1.0))?;
//! let out = transformer.fit(&frame).transform(&frame)?;
//!
//! assert_eq!(out.column_names(), vec!["price_fd", "volume_fd"]);
//! assert_eq!(out.column("price_fd").map(|s| s.len()), Some(8));
//! # Ok(())
//! # }
//! ```

use crate::config::FracDiffConfig;
use crate::differencer::{frac_diff_with_limit, AppliedWindow};
use crate::errors::FracDiffResult;
use crate::frame::Frame;
use crate::search::find_minimum_order_with_limit;
use crate::series::Series;
use crate::stationarity::{AugmentedDickeyFuller, StationarityTest};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Suffix appended to every output column name.
pub const OUTPUT_SUFFIX: &str = "_fd";

/// What happened to one input column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnReport {
    /// Input column name
    pub input_name: String,
    /// Output column name (`<input>_fd`)
    pub output_name: String,
    /// Order applied to the column
    pub order: f64,
    /// `None` in fixed-order mode; whether the search found a stationary order otherwise
    pub stationary: Option<bool>,
    /// Window actually applied
    pub window: AppliedWindow,
}

/// Per-column details of a transform, in input column order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransformReport {
    /// One entry per input column
    pub columns: Vec<ColumnReport>,
}

impl TransformReport {
    /// Report for the input column `name`.
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.input_name == name)
    }

    /// Columns whose minimum-order search exhausted its grid.
    pub fn non_stationary_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.stationary == Some(false))
            .map(|c| c.input_name.as_str())
            .collect()
    }
}

/// Fractional differencing transformer over frames of named series.
#[derive(Debug, Clone)]
pub struct FracDiffTransformer<T = AugmentedDickeyFuller> {
    config: FracDiffConfig,
    test: T,
}

impl FracDiffTransformer<AugmentedDickeyFuller> {
    /// Transformer using the augmented Dickey-Fuller test for order search.
    pub fn new(config: FracDiffConfig) -> FracDiffResult<Self> {
        Self::with_test(config, AugmentedDickeyFuller)
    }
}

impl Default for FracDiffTransformer<AugmentedDickeyFuller> {
    fn default() -> Self {
        Self {
            config: FracDiffConfig::default(),
            test: AugmentedDickeyFuller,
        }
    }
}

impl<T: StationarityTest> FracDiffTransformer<T> {
    /// Transformer using a caller-supplied stationarity test.
    pub fn with_test(config: FracDiffConfig, test: T) -> FracDiffResult<Self> {
        config.validate()?;
        Ok(Self { config, test })
    }

    /// Active configuration.
    pub fn config(&self) -> &FracDiffConfig {
        &self.config
    }

    /// No-op: the transformer learns nothing from the data.
    pub fn fit<K>(&self, _frame: &Frame<K>) -> &Self {
        self
    }

    /// Difference every column of `frame`.
    pub fn transform<K: Ord + Clone>(&self, frame: &Frame<K>) -> FracDiffResult<Frame<K>> {
        self.transform_with_report(frame).map(|(out, _)| out)
    }

    /// Difference a single series, returned as a one-column frame named `0_fd`.
    pub fn transform_series<K: Ord + Clone>(&self, series: &Series<K>) -> FracDiffResult<Frame<K>> {
        self.transform(&Frame::from_series(series.clone()))
    }

    /// Difference every column of `frame` and report the order and window
    /// used per column.
    pub fn transform_with_report<K: Ord + Clone>(
        &self,
        frame: &Frame<K>,
    ) -> FracDiffResult<(Frame<K>, TransformReport)> {
        let results = frame
            .columns()
            .map(|(name, series)| self.transform_column(name, series))
            .collect::<FracDiffResult<Vec<_>>>()?;
        assemble(results)
    }

    fn transform_column<K: Ord + Clone>(
        &self,
        name: &str,
        series: &Series<K>,
    ) -> FracDiffResult<(Series<K>, ColumnReport)> {
        let config = &self.config;
        let (order, differenced, stationary) = if config.minimum {
            let outcome = find_minimum_order_with_limit(
                series,
                &config.search,
                config.method,
                config.threshold,
                config.max_weight_terms,
                &self.test,
            )?;
            let stationary = outcome.is_stationary();
            let (order, differenced) = outcome.into_parts();
            (order, differenced, Some(stationary))
        } else {
            let differenced = frac_diff_with_limit(
                series,
                config.order,
                config.method,
                config.threshold,
                config.max_weight_terms,
            )?;
            (config.order, differenced, None)
        };

        log::debug!(
            "column {}: d = {}, {} -> {} rows",
            name,
            order,
            series.len(),
            differenced.series.len()
        );

        let report = ColumnReport {
            input_name: name.to_string(),
            output_name: format!("{}{}", name, OUTPUT_SUFFIX),
            order,
            stationary,
            window: differenced.window,
        };
        Ok((differenced.into_series(), report))
    }
}

#[cfg(feature = "parallel")]
impl<T: StationarityTest + Sync> FracDiffTransformer<T> {
    /// [`FracDiffTransformer::transform_with_report`] with columns processed
    /// on the rayon thread pool. Output order still follows input order.
    pub fn transform_parallel<K>(&self, frame: &Frame<K>) -> FracDiffResult<(Frame<K>, TransformReport)>
    where
        K: Ord + Clone + Send + Sync,
    {
        use rayon::prelude::*;

        let columns: Vec<(&str, &Series<K>)> = frame.columns().collect();
        let results = columns
            .par_iter()
            .map(|(name, series)| self.transform_column(name, series))
            .collect::<FracDiffResult<Vec<_>>>()?;
        assemble(results)
    }
}

fn assemble<K: Ord + Clone>(
    results: Vec<(Series<K>, ColumnReport)>,
) -> FracDiffResult<(Frame<K>, TransformReport)> {
    let mut out = Frame::new();
    let mut report = TransformReport {
        columns: Vec::with_capacity(results.len()),
    };
    for (series, column) in results {
        out.push_column(column.output_name.clone(), series)?;
        report.columns.push(column);
    }
    Ok((out, report))
}
