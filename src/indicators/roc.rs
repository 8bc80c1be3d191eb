// =============================================================================
// Rate of Change (ROC): Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// During cold start close_n is the first bar, so ROC[0] is 0.  A zero
// reference price also yields 0.
//
// Positive ROC indicates upward momentum; negative indicates downward.

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::{PriceSource, Series};
use crate::pipeline::{safe_div, Indicator, IndicatorInputs, IndicatorResult};
use crate::signals::TrendCompare;

fn default_length() -> usize {
    10
}

/// Percentage change over `length` bars.
pub fn roc(series: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_length("roc length", length)?;
    let series = Series::from(series);
    Ok((0..series.len())
        .map(|i| {
            let reference = series.lagged(i, length);
            safe_div(series[i] - reference, reference, 0.0) * 100.0
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roc {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default)]
    pub source: PriceSource,
    #[serde(default)]
    pub signal: TrendCompare,
}

impl Default for Roc {
    fn default() -> Self {
        Self {
            length: default_length(),
            source: PriceSource::default(),
            signal: TrendCompare::default(),
        }
    }
}

impl Roc {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        IndicatorError::check_length("roc length", self.length)?;
        Ok(())
    }
}

impl Indicator for Roc {
    fn name(&self) -> &'static str {
        "Roc"
    }

    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
        self.validate()?;
        let value = roc(&inputs.input(self.source), self.length)?;
        let signals = self.signal.classify_series(&value);

        IndicatorResult::builder(self.name(), inputs.len())
            .channel("Roc", value)?
            .signals(signals)?
            .build()
    }
}
