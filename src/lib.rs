//! # Fractional Differencing
//!
//! Fractional differencing of financial time series as a preprocessing step
//! for models that expect (approximately) stationary inputs.
//!
//! An integer difference removes a unit root but also most of the memory of
//! the series. The operator `(1 - L)^d` with a non-integer order `d` sits
//! between the raw series (`d = 0`) and its first difference (`d = 1`), so the
//! smallest `d` that passes a unit-root test keeps as much memory as possible.
//!
//! ## Key Features
//!
//! - **Weight Generation**: binomial-series weights with fixed-width or expanding truncation
//! - **Differencing**: sliding dot product that skips missing values instead of filling them
//! - **Minimum-Order Search**: linear grid scan driven by an augmented Dickey-Fuller test
//! - **Frames**: column-wise transform of any number of named series
//!
//! ## Quick Start
//!
//! ```rust
//! use fracdiff::{FracDiffConfig, FracDiffTransformer, SearchConfig, Series};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Random walk with drift: non-stationary at d = 0
//!     let mut level = 100.0;
//!     let prices: Vec<f64> = (0..300)
//!         .map(|i| {
//!             level += 0.3 + ((i * 7919) % 13) as f64 / 13.0 - 0.5;
//!             level
//!         })
//!         .collect();
//!
//!     let config = FracDiffConfig::minimum_order(SearchConfig::default());
//!     let transformer = FracDiffTransformer::new(config)?;
//!     let (frame, report) = transformer
//!         .transform_with_report(&fracdiff::Frame::from_series(Series::from_values(prices)))?;
//!
//!     let column = &report.columns[0];
//!     println!(
//!         "{}: d = {:.1}, stationary = {:?}, {} rows",
//!         column.output_name,
//!         column.order,
//!         column.stationary,
//!         frame.column(&column.output_name).map(|s| s.len()).unwrap_or(0)
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Leaves first: [`weights`] builds the weight vector, [`differencer`] applies
//! it to one series, [`search`] walks the order grid against a
//! [`stationarity`] test, and [`transformer`] runs either mode over every
//! column of a [`Frame`].
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configuration, series and reports
//! - `parallel`: rayon-backed column and grid evaluation

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod differencer;
pub mod errors;
pub mod frame;
pub mod search;
pub mod series;
pub mod stationarity;
pub mod transformer;
pub mod weights;

// Re-exports for convenience - main public API
pub use config::{ConfidenceLevel, FracDiffConfig, SearchConfig, WindowMethod};
pub use differencer::{frac_diff, frac_diff_with_limit, AppliedWindow, DifferencedSeries};
pub use errors::{FracDiffError, FracDiffResult};
pub use frame::Frame;
#[cfg(feature = "parallel")]
pub use search::find_minimum_order_parallel;
pub use search::{
    find_minimum_order, find_minimum_order_with_limit, order_grid, SearchOutcome, SearchTrial,
};
pub use series::Series;
pub use stationarity::{
    augmented_dickey_fuller, mackinnon_critical_values, AugmentedDickeyFuller,
    StationarityReport, StationarityTest,
};
pub use transformer::{ColumnReport, FracDiffTransformer, TransformReport, OUTPUT_SUFFIX};
pub use weights::{generate_weights, WeightVector};
