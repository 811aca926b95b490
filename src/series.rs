//! Keyed time series container.
//!
//! A [`Series`] pairs every value with a key (timestamp, bar number, ...).
//! Keys are strictly increasing, so they are unique and carry the temporal
//! order of the observations. Values may be non-finite; those positions are
//! treated as missing by the differencer.

use crate::errors::{FracDiffError, FracDiffResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered sequence of `f64` values indexed by strictly increasing keys.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Series<K = usize> {
    keys: Vec<K>,
    values: Vec<f64>,
}

impl Series<usize> {
    /// Series indexed by position (`0..n`).
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            keys: (0..values.len()).collect(),
            values,
        }
    }
}

impl<K: Ord + Clone> Series<K> {
    /// Build a series, checking that keys and values line up and keys are
    /// strictly increasing.
    pub fn new(keys: Vec<K>, values: Vec<f64>) -> FracDiffResult<Self> {
        if keys.len() != values.len() {
            return Err(FracDiffError::InvalidIndex {
                reason: format!(
                    "{} keys supplied for {} values",
                    keys.len(),
                    values.len()
                ),
            });
        }
        if let Some(pos) = keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(FracDiffError::InvalidIndex {
                reason: format!(
                    "keys must be strictly increasing; violated between positions {} and {}",
                    pos,
                    pos + 1
                ),
            });
        }
        Ok(Self { keys, values })
    }

    /// Build from parts already known to be consistent.
    pub(crate) fn from_parts_unchecked(keys: Vec<K>, values: Vec<f64>) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self { keys, values }
    }

    /// Empty series.
    pub fn empty() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys in temporal order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Values in temporal order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate `(key, value)` pairs in temporal order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.keys.iter().zip(self.values.iter().copied())
    }

    /// Value stored under `key`, if present.
    pub fn get(&self, key: &K) -> Option<f64> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|pos| self.values[pos])
    }
}

impl<K: Ord + Clone> Default for Series<K> {
    fn default() -> Self {
        Self::empty()
    }
}
