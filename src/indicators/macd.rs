// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   Macd      = MA(kind, fast) - MA(kind, slow)
//   Signal    = MA(signal_kind, signal_length) of Macd
//   Histogram = Macd - Signal
//
// Signal: trend-compare on the histogram (Macd above its signal line is
// bullish).  The signal line is a chained stage: it consumes the output of
// the difference step, not the raw price.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::PriceSource;
use crate::moving_average::{self, MovingAverageKind};
use crate::pipeline::{difference, Indicator, IndicatorInputs, IndicatorResult};
use crate::signals::TrendCompare;

fn default_fast() -> usize {
    12
}

fn default_slow() -> usize {
    26
}

fn default_signal_length() -> usize {
    9
}

fn default_kind() -> MovingAverageKind {
    MovingAverageKind::Exponential
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    #[serde(default = "default_fast")]
    pub fast_length: usize,
    #[serde(default = "default_slow")]
    pub slow_length: usize,
    #[serde(default = "default_signal_length")]
    pub signal_length: usize,
    #[serde(default = "default_kind")]
    pub kind: MovingAverageKind,
    #[serde(default = "default_kind")]
    pub signal_kind: MovingAverageKind,
    #[serde(default)]
    pub source: PriceSource,
    #[serde(default)]
    pub signal: TrendCompare,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_length: default_fast(),
            slow_length: default_slow(),
            signal_length: default_signal_length(),
            kind: default_kind(),
            signal_kind: default_kind(),
            source: PriceSource::default(),
            signal: TrendCompare::default(),
        }
    }
}

impl Macd {
    pub fn new(fast_length: usize, slow_length: usize, signal_length: usize) -> Self {
        Self {
            fast_length,
            slow_length,
            signal_length,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        IndicatorError::check_length("macd fast length", self.fast_length)?;
        IndicatorError::check_length("macd slow length", self.slow_length)?;
        IndicatorError::check_length("macd signal length", self.signal_length)?;
        if self.fast_length >= self.slow_length {
            return Err(IndicatorError::InvalidParameter {
                param: "fast_length",
                value: self.fast_length as f64,
                reason: "must be shorter than slow_length",
            });
        }
        Ok(())
    }
}

impl Indicator for Macd {
    fn name(&self) -> &'static str {
        "Macd"
    }

    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
        self.validate()?;
        let price = inputs.input(self.source);

        let fast = moving_average::apply(self.kind, self.fast_length, &price)?;
        let slow = moving_average::apply(self.kind, self.slow_length, &price)?;
        let macd = difference(&fast, &slow)?;
        let signal = moving_average::apply(self.signal_kind, self.signal_length, &macd)?;
        let histogram = difference(&macd, &signal)?;
        let signals = self.signal.classify_series(&histogram);

        IndicatorResult::builder(self.name(), inputs.len())
            .channel("Macd", macd)?
            .channel("Signal", signal)?
            .channel("Histogram", histogram)?
            .signals(signals)?
            .build()
    }
}
