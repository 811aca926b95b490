//! Ordered collection of named series.
//!
//! Columns keep their insertion order and each column keeps its own index,
//! so differenced columns with different start offsets live side by side
//! without being aligned onto a common index.

use crate::errors::{FracDiffError, FracDiffResult};
use crate::series::Series;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name given to the column created by [`Frame::from_series`].
pub const DEFAULT_COLUMN_NAME: &str = "0";

/// Table of uniquely named series in insertion order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame<K = usize> {
    columns: Vec<(String, Series<K>)>,
}

impl<K: Ord + Clone> Frame<K> {
    /// Frame without columns.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// One-column frame named [`DEFAULT_COLUMN_NAME`].
    pub fn from_series(series: Series<K>) -> Self {
        Self {
            columns: vec![(DEFAULT_COLUMN_NAME.to_string(), series)],
        }
    }

    /// Build from `(name, series)` pairs, rejecting duplicate names.
    pub fn from_columns<I, S>(columns: I) -> FracDiffResult<Self>
    where
        I: IntoIterator<Item = (S, Series<K>)>,
        S: Into<String>,
    {
        let mut frame = Self::new();
        for (name, series) in columns {
            frame.push_column(name, series)?;
        }
        Ok(frame)
    }

    /// Append a column at the end.
    pub fn push_column(&mut self, name: impl Into<String>, series: Series<K>) -> FracDiffResult<()> {
        let name = name.into();
        if self.column(&name).is_some() {
            return Err(FracDiffError::DuplicateColumn { name });
        }
        self.columns.push((name, series));
        Ok(())
    }

    /// Column stored under `name`.
    pub fn column(&self, name: &str) -> Option<&Series<K>> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, series)| series)
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Series<K>)> + '_ {
        self.columns
            .iter()
            .map(|(name, series)| (name.as_str(), series))
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the frame has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Ord + Clone> Default for Frame<K> {
    fn default() -> Self {
        Self::new()
    }
}
