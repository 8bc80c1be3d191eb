// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// True Range for each bar:
//   TR_0 = H - L
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR = MA(kind, length) of TR   (Wilder by default)
//
// Signal: volatility breakout.  While ATR is above its own EMA (expanding
// volatility) the direction of close vs EMA(close) decides; otherwise Neutral.
//
// Default length: 14
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::{BarSeries, PriceSource, Series};
use crate::moving_average::{self, MovingAverageKind};
use crate::pipeline::{difference, Indicator, IndicatorInputs, IndicatorResult};
use crate::signals::VolatilityBreakout;

fn default_length() -> usize {
    14
}

fn default_kind() -> MovingAverageKind {
    MovingAverageKind::Wilder
}

fn default_breakout_length() -> usize {
    14
}

fn default_trend_length() -> usize {
    20
}

/// True range per bar; the first bar has no previous close.
pub fn true_range(bars: &BarSeries) -> Series {
    let (high, low, close) = (bars.high(), bars.low(), bars.close());
    (0..bars.len())
        .map(|i| {
            let hl = high[i] - low[i];
            if i == 0 {
                return hl;
            }
            let prev_close = close[i - 1];
            hl.max((high[i] - prev_close).abs())
                .max((low[i] - prev_close).abs())
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atr {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default = "default_kind")]
    pub kind: MovingAverageKind,
    /// EMA length of ATR that marks "expanding" volatility.
    #[serde(default = "default_breakout_length")]
    pub breakout_length: usize,
    /// EMA length of the close that gives the breakout its direction.
    #[serde(default = "default_trend_length")]
    pub trend_length: usize,
    #[serde(default)]
    pub reversed: bool,
}

impl Default for Atr {
    fn default() -> Self {
        Self {
            length: default_length(),
            kind: default_kind(),
            breakout_length: default_breakout_length(),
            trend_length: default_trend_length(),
            reversed: false,
        }
    }
}

impl Atr {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        IndicatorError::check_length("atr length", self.length)?;
        IndicatorError::check_length("atr breakout length", self.breakout_length)?;
        IndicatorError::check_length("atr trend length", self.trend_length)?;
        Ok(())
    }
}

impl Indicator for Atr {
    fn name(&self) -> &'static str {
        "Atr"
    }

    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
        self.validate()?;
        let tr = true_range(inputs.bars());
        let atr = moving_average::apply(self.kind, self.length, &tr)?;

        let level = moving_average::ema(&atr, self.breakout_length)?;
        let price = inputs.input(PriceSource::Close);
        let trend = moving_average::ema(&price, self.trend_length)?;
        let direction = difference(&price, &trend)?;
        let signals = VolatilityBreakout::new()
            .reversed(self.reversed)
            .classify_series(&atr, &level, &direction)?;

        IndicatorResult::builder(self.name(), inputs.len())
            .channel("Atr", atr)?
            .channel("TrueRange", tr)?
            .signals(signals)?
            .build()
    }
}
