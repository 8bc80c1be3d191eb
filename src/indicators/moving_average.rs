// =============================================================================
// Moving Average trend
// =============================================================================
//
// Channels:  Ma
// Signal:    trend-compare on (price - Ma)
//
// The simplest complete pipeline: one stage, one difference, one rule.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::PriceSource;
use crate::moving_average::{self, MovingAverageKind};
use crate::pipeline::{difference, Indicator, IndicatorInputs, IndicatorResult};
use crate::signals::TrendCompare;

fn default_kind() -> MovingAverageKind {
    MovingAverageKind::Simple
}

fn default_length() -> usize {
    20
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageTrend {
    #[serde(default = "default_kind")]
    pub kind: MovingAverageKind,
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default)]
    pub source: PriceSource,
    #[serde(default)]
    pub signal: TrendCompare,
}

impl Default for MovingAverageTrend {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            length: default_length(),
            source: PriceSource::default(),
            signal: TrendCompare::default(),
        }
    }
}

impl MovingAverageTrend {
    pub fn new(kind: MovingAverageKind, length: usize) -> Self {
        Self {
            kind,
            length,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        IndicatorError::check_length("moving average length", self.length)?;
        Ok(())
    }
}

impl Indicator for MovingAverageTrend {
    fn name(&self) -> &'static str {
        "MovingAverage"
    }

    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
        self.validate()?;
        let price = inputs.input(self.source);
        let ma = moving_average::apply(self.kind, self.length, &price)?;
        let delta = difference(&price, &ma)?;
        let signals = self.signal.classify_series(&delta);

        IndicatorResult::builder(self.name(), inputs.len())
            .channel("Ma", ma)?
            .signals(signals)?
            .build()
    }
}
