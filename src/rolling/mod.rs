// =============================================================================
// Rolling Window Accumulator
// =============================================================================
//
// Trailing statistics over the last N pushed values, maintained incrementally
// (append one, evict one) instead of re-reducing the trailing slice each bar.
//
// Cold start: before N values have been pushed, every statistic is computed
// over the values pushed so far.  No padding, no failure.
//
//   sum / average  -> compensated (Neumaier) running sum
//   min / max      -> monotonic deques keyed by push index
//   variance       -> sliding Welford update of mean and M2 (population)
//
// The running sum, mean and M2 are re-anchored from the live values once
// every `length` evictions, and as soon as the window's range falls below
// half of the widest range seen since the last anchor.  Cancellation error
// from an earlier stretch of large values therefore never outlives the window
// that produced it.  A window whose min equals its max reports a variance of
// exactly 0.
//
// Every statistic must agree with a naive recomputation over
// `values[i + 1 - min(N, i + 1) ..= i]`.
// =============================================================================

mod extrema;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;
use extrema::{Extreme, MonotonicDeque};

/// Statistic returned by [`RollingWindow::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollingStat {
    Sum,
    Average,
    Min,
    Max,
    /// Population variance around the window's own mean.
    Variance,
    /// Square root of [`RollingStat::Variance`].
    StdDev,
}

/// Trailing-window accumulator over the last `length` pushed values.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    length: usize,
    stat: RollingStat,
    values: VecDeque<f64>,
    pushed: usize,
    sum: f64,
    compensation: f64,
    mean: f64,
    m2: f64,
    evictions: usize,
    peak_range: f64,
    minima: MonotonicDeque,
    maxima: MonotonicDeque,
}

impl RollingWindow {
    /// Create an empty window.
    ///
    /// # Errors
    /// `InvalidLength` when `length == 0`.
    pub fn new(length: usize, stat: RollingStat) -> Result<Self> {
        IndicatorError::check_length("rolling window", length)?;
        Ok(Self {
            length,
            stat,
            values: VecDeque::with_capacity(length),
            pushed: 0,
            sum: 0.0,
            compensation: 0.0,
            mean: 0.0,
            m2: 0.0,
            evictions: 0,
            peak_range: 0.0,
            minima: MonotonicDeque::new(Extreme::Min, length),
            maxima: MonotonicDeque::new(Extreme::Max, length),
        })
    }

    /// Append one observation (evicting the oldest once full) and return the
    /// configured statistic over the current window.
    pub fn push(&mut self, value: f64) -> f64 {
        let index = self.pushed;
        self.pushed += 1;

        let evicted = if self.values.len() == self.length {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        self.accumulate(value);

        match evicted {
            Some(old) => {
                self.accumulate(-old);
                let n = self.length as f64;
                let old_mean = self.mean;
                self.mean += (value - old) / n;
                self.m2 += (value - old) * (value - self.mean + old - old_mean);
            }
            None => {
                let n = self.values.len() as f64;
                let delta = value - self.mean;
                self.mean += delta / n;
                self.m2 += delta * (value - self.mean);
            }
        }

        let oldest_live = self.pushed - self.values.len();
        self.minima.push(index, value);
        self.minima.evict_before(oldest_live);
        self.maxima.push(index, value);
        self.maxima.evict_before(oldest_live);

        let range = self.max() - self.min();
        self.peak_range = self.peak_range.max(range);
        if evicted.is_some() {
            self.evictions += 1;
            if self.evictions >= self.length || range * 2.0 < self.peak_range {
                self.reanchor();
            }
        }
        if self.m2 < 0.0 {
            self.m2 = 0.0;
        }

        self.current()
    }

    /// The configured statistic over the current window (0.0 when empty).
    pub fn current(&self) -> f64 {
        match self.stat {
            RollingStat::Sum => self.sum(),
            RollingStat::Average => self.mean(),
            RollingStat::Min => self.min(),
            RollingStat::Max => self.max(),
            RollingStat::Variance => self.variance(),
            RollingStat::StdDev => self.std_dev(),
        }
    }

    /// Sum of the live values (0.0 when empty).
    pub fn sum(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Arithmetic mean of the live values; during cold start this is the
    /// mean of the values pushed so far.  0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum() / self.values.len() as f64
        }
    }

    /// Smallest live value (0.0 when empty).
    pub fn min(&self) -> f64 {
        self.minima.front().unwrap_or(0.0)
    }

    /// Largest live value (0.0 when empty).
    pub fn max(&self) -> f64 {
        self.maxima.front().unwrap_or(0.0)
    }

    /// Population variance around the window's own mean.
    ///
    /// # Edge cases
    /// - Empty window or a single value: 0.0
    /// - Every live value equal: exactly 0.0
    pub fn variance(&self) -> f64 {
        if self.values.is_empty() || self.is_flat() {
            0.0
        } else {
            self.m2 / self.values.len() as f64
        }
    }

    /// Square root of [`variance`](Self::variance).
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Population variance of the window around an externally supplied mean
    /// (e.g. a moving average computed by another stage).
    pub fn variance_around(&self, mean: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        if self.is_flat() {
            let offset = self.min() - mean;
            return offset * offset;
        }
        let offset = self.mean - mean;
        (self.variance() + offset * offset).max(0.0)
    }

    /// Number of values currently in the window.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True once `length` values have been pushed; earlier statistics are
    /// over a partial window.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.length
    }

    /// Configured window length N.
    pub fn length(&self) -> usize {
        self.length
    }

    fn is_flat(&self) -> bool {
        matches!(
            (self.minima.front(), self.maxima.front()),
            (Some(lo), Some(hi)) if lo == hi
        )
    }

    /// Recompute sum, mean and M2 from the live values.
    fn reanchor(&mut self) {
        self.evictions = 0;
        self.peak_range = self.max() - self.min();
        self.sum = 0.0;
        self.compensation = 0.0;
        for i in 0..self.values.len() {
            let x = self.values[i];
            self.accumulate(x);
        }
        let mean = self.mean();
        self.mean = mean;
        self.m2 = self.values.iter().map(|x| (x - mean) * (x - mean)).sum();
    }

    fn accumulate(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }
}

// ---------------------------------------------------------------------------
// Series helpers
// ---------------------------------------------------------------------------

/// Run a rolling statistic over a whole series.  Output has the input's
/// length; the first `length - 1` values use partial windows.
pub fn rolling(series: &[f64], length: usize, stat: RollingStat) -> Result<Series> {
    let mut window = RollingWindow::new(length, stat)?;
    Ok(series.iter().map(|&v| window.push(v)).collect())
}

/// Rolling population variance around a bar-aligned external mean series.
///
/// # Errors
/// `LengthMismatch` when `means` is not aligned with `series`;
/// `InvalidLength` when `length == 0`.
pub fn rolling_variance_around(series: &[f64], means: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_aligned("rolling variance mean", series.len(), means.len())?;
    let mut window = RollingWindow::new(length, RollingStat::Variance)?;
    Ok(series
        .iter()
        .zip(means.iter())
        .map(|(&v, &m)| {
            window.push(v);
            window.variance_around(m)
        })
        .collect())
}
