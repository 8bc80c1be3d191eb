use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time in epoch milliseconds. Informational only.
    #[serde(default)]
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time: 0,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A flat bar where every price equals `close`.
    pub fn from_close(close: f64) -> Self {
        Self::new(close, close, close, close, 0.0)
    }

    pub fn price(&self, source: PriceSource) -> f64 {
        match source {
            PriceSource::Open => self.open,
            PriceSource::High => self.high,
            PriceSource::Low => self.low,
            PriceSource::Close => self.close,
            PriceSource::Volume => self.volume,
            PriceSource::Median => (self.high + self.low) / 2.0,
            PriceSource::Typical => (self.high + self.low + self.close) / 3.0,
            PriceSource::Average => (self.open + self.high + self.low + self.close) / 4.0,
        }
    }

    fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Which bar field (or derived price) feeds a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceSource {
    Open,
    High,
    Low,
    Close,
    Volume,
    /// (high + low) / 2
    Median,
    /// (high + low + close) / 3
    Typical,
    /// (open + high + low + close) / 4
    Average,
}

impl Default for PriceSource {
    fn default() -> Self {
        Self::Close
    }
}

// ---------------------------------------------------------------------------
// BarSeries -- immutable, shareable input
// ---------------------------------------------------------------------------

/// The canonical input every indicator reads from.
///
/// Built once by [`BarSeries::ingest`] and never mutated, so one instance can
/// be shared read-only (behind an `Arc`) by any number of indicator runs.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
    open: Series,
    high: Series,
    low: Series,
    close: Series,
    volume: Series,
}

impl BarSeries {
    /// Wrap an ordered bar sequence into column form.
    ///
    /// # Errors
    /// `NonFiniteInput` for the first bar carrying a NaN or infinite field.
    pub fn ingest(bars: impl IntoIterator<Item = Bar>) -> Result<Self> {
        let bars: Vec<Bar> = bars.into_iter().collect();

        if let Some((index, field)) = bars
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.first_non_finite().map(|f| (i, f)))
        {
            return Err(IndicatorError::NonFiniteInput { index, field });
        }

        let column = |f: fn(&Bar) -> f64| bars.iter().map(f).collect::<Series>();
        let series = Self {
            open: column(|b| b.open),
            high: column(|b| b.high),
            low: column(|b| b.low),
            close: column(|b| b.close),
            volume: column(|b| b.volume),
            bars,
        };

        debug!(bars = series.len(), "bar series ingested");
        Ok(series)
    }

    /// Convenience constructor for close-only data (flat bars).
    pub fn from_closes(closes: &[f64]) -> Result<Self> {
        Self::ingest(closes.iter().map(|&c| Bar::from_close(c)))
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn open(&self) -> &Series {
        &self.open
    }

    pub fn high(&self) -> &Series {
        &self.high
    }

    pub fn low(&self) -> &Series {
        &self.low
    }

    pub fn close(&self) -> &Series {
        &self.close
    }

    pub fn volume(&self) -> &Series {
        &self.volume
    }

    /// Extract the series for `source`.
    pub fn price(&self, source: PriceSource) -> Series {
        match source {
            PriceSource::Open => self.open.clone(),
            PriceSource::High => self.high.clone(),
            PriceSource::Low => self.low.clone(),
            PriceSource::Close => self.close.clone(),
            PriceSource::Volume => self.volume.clone(),
            derived => self.bars.iter().map(|b| b.price(derived)).collect(),
        }
    }
}
