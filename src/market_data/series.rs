use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

// ---------------------------------------------------------------------------
// Series -- bar-aligned numeric vector
// ---------------------------------------------------------------------------

/// One value per bar, oldest first.
///
/// `series[i]` only ever depends on bars `0..=i`; every producer in this crate
/// fills the vector front to back in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<f64>);

impl Series {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// A series of `len` copies of `value`.
    pub fn constant(value: f64, len: usize) -> Self {
        Self(vec![value; len])
    }

    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// The value `lag` bars before `index`.
    ///
    /// During cold start the lookback is clamped to the first bar, so a
    /// momentum formula sees a shorter effective window instead of failing.
    ///
    /// # Panics
    /// If `index >= self.len()`.  Callers iterate `0..len`.
    pub(crate) fn lagged(&self, index: usize, lag: usize) -> f64 {
        self.0[index.saturating_sub(lag)]
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Series {
        self.0.iter().map(|&v| f(v)).collect()
    }

    /// Combine two bar-aligned series element by element.
    pub fn zip_with(
        &self,
        other: &[f64],
        context: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Series> {
        IndicatorError::check_aligned(context, self.len(), other.len())?;
        Ok(self
            .0
            .iter()
            .zip(other.iter())
            .map(|(&a, &b)| f(a, b))
            .collect())
    }
}

impl Deref for Series {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl AsRef<[f64]> for Series {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Series {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<f64> for Series {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
