// =============================================================================
// Indicator Pipeline
// =============================================================================
//
// Every indicator is the same four-step composition:
//
//   1. extract   price columns from the bars, or an upstream Series
//   2. stages    moving averages / rolling windows, possibly chained
//   3. combine   per-bar scalar arithmetic into the primary series
//   4. classify  one signal rule over the primary series
//
// Chaining is explicit: a downstream indicator receives the upstream
// indicator's primary series through `IndicatorInputs::with_source`, never
// by re-running the upstream computation itself.
// =============================================================================

pub mod combine;
pub mod result;

pub use combine::{clamp, difference, ratio, safe_div, weighted_sum};
pub use result::{Channel, IndicatorResult, IndicatorResultBuilder};

use crate::error::{IndicatorError, Result};
use crate::market_data::{BarSeries, PriceSource, Series};

/// A fully configured indicator, ready to run over any bar series.
pub trait Indicator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run the pipeline over `inputs`.  Every channel and the signal series
    /// in the result have exactly `inputs.len()` entries.
    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult>;
}

/// What an indicator reads: the shared bars plus an optional upstream series.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorInputs<'a> {
    bars: &'a BarSeries,
    source: Option<&'a Series>,
}

impl<'a> IndicatorInputs<'a> {
    pub fn new(bars: &'a BarSeries) -> Self {
        Self { bars, source: None }
    }

    /// Feed `source` (typically another result's primary series) in place of
    /// the raw price column.
    ///
    /// # Errors
    /// `LengthMismatch` when `source` is not bar-aligned.
    pub fn with_source(bars: &'a BarSeries, source: &'a Series) -> Result<Self> {
        IndicatorError::check_aligned("chained source", bars.len(), source.len())?;
        Ok(Self {
            bars,
            source: Some(source),
        })
    }

    pub fn bars(&self) -> &'a BarSeries {
        self.bars
    }

    pub fn source(&self) -> Option<&'a Series> {
        self.source
    }

    pub fn is_chained(&self) -> bool {
        self.source.is_some()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The upstream series when chained, otherwise the `price` column.
    pub fn input(&self, price: PriceSource) -> Series {
        match self.source {
            Some(source) => source.clone(),
            None => self.bars.price(price),
        }
    }
}
