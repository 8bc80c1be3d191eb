// =============================================================================
// Relative Strength Index (RSI)
// =============================================================================
//
// Step 1: change_t = x_t - x_{t-1}   (0 on the first bar)
// Step 2: gain = max(change, 0),  loss = max(-change, 0)
// Step 3: avg_gain / avg_loss = MA(kind, length)   (Wilder by default)
// Step 4: RSI = 100 * avg_gain / (avg_gain + avg_loss)
//          which equals 100 - 100 / (1 + RS) with RS = avg_gain / avg_loss
// Step 5: Signal = MA(signal_kind, signal_length) of RSI
//          Histogram = RSI - Signal
//
// Degenerate bars:
//   avg_gain = avg_loss = 0  => 50 (no movement, no bias)
//   avg_loss = 0             => 100
//
// Thresholds:  crossing above 70 => overbought,  below 30 => oversold.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::{PriceSource, Series};
use crate::moving_average::{self, MovingAverageKind};
use crate::pipeline::{difference, safe_div, Indicator, IndicatorInputs, IndicatorResult};
use crate::signals::BandThreshold;

pub const RSI_NEUTRAL: f64 = 50.0;

fn default_length() -> usize {
    14
}

fn default_kind() -> MovingAverageKind {
    MovingAverageKind::Wilder
}

fn default_signal_length() -> usize {
    9
}

fn default_signal_kind() -> MovingAverageKind {
    MovingAverageKind::Simple
}

fn default_upper() -> f64 {
    70.0
}

fn default_lower() -> f64 {
    30.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rsi {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default = "default_kind")]
    pub kind: MovingAverageKind,
    #[serde(default = "default_signal_length")]
    pub signal_length: usize,
    #[serde(default = "default_signal_kind")]
    pub signal_kind: MovingAverageKind,
    #[serde(default = "default_upper")]
    pub upper_bound: f64,
    #[serde(default = "default_lower")]
    pub lower_bound: f64,
    #[serde(default)]
    pub source: PriceSource,
    #[serde(default)]
    pub reversed: bool,
}

impl Default for Rsi {
    fn default() -> Self {
        Self {
            length: default_length(),
            kind: default_kind(),
            signal_length: default_signal_length(),
            signal_kind: default_signal_kind(),
            upper_bound: default_upper(),
            lower_bound: default_lower(),
            source: PriceSource::default(),
            reversed: false,
        }
    }
}

impl Rsi {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    fn rule(&self) -> Result<BandThreshold> {
        Ok(BandThreshold::new(self.upper_bound, self.lower_bound)?.reversed(self.reversed))
    }

    pub fn validate(&self) -> Result<()> {
        IndicatorError::check_length("rsi length", self.length)?;
        IndicatorError::check_length("rsi signal length", self.signal_length)?;
        self.rule()?;
        Ok(())
    }
}

/// RSI of `series`, every value in `[0, 100]`.
pub fn rsi(series: &[f64], length: usize, kind: MovingAverageKind) -> Result<Series> {
    IndicatorError::check_length("rsi length", length)?;

    let mut gains = Vec::with_capacity(series.len());
    let mut losses = Vec::with_capacity(series.len());
    for (i, &x) in series.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { x - series[i - 1] };
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = moving_average::apply(kind, length, &gains)?;
    let avg_loss = moving_average::apply(kind, length, &losses)?;

    // Overshooting averages (Hull, DEMA) can dip below zero on a gain series.
    Ok(avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&g, &l)| {
            let (g, l) = (g.max(0.0), l.max(0.0));
            (100.0 * safe_div(g, g + l, RSI_NEUTRAL / 100.0)).clamp(0.0, 100.0)
        })
        .collect())
}

impl Indicator for Rsi {
    fn name(&self) -> &'static str {
        "Rsi"
    }

    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
        self.validate()?;
        let rule = self.rule()?;

        let value = rsi(&inputs.input(self.source), self.length, self.kind)?;
        let signal = moving_average::apply(self.signal_kind, self.signal_length, &value)?;
        let histogram = difference(&value, &signal)?;
        let signals = rule.classify_series(&value, &histogram)?;

        IndicatorResult::builder(self.name(), inputs.len())
            .channel("Rsi", value)?
            .channel("Signal", signal)?
            .channel("Histogram", histogram)?
            .signals(signals)?
            .build()
    }
}
