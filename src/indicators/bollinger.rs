// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle = MA(kind, length), upper/lower = middle +/- multiplier * sigma.
// Width (BBW) = (upper - lower) / middle * 100, 0 when middle is 0.
//
// sigma is the population standard deviation of the trailing window, taken
// either around the window's own mean (classic) or around the middle band
// when the middle band is not a simple average.
//
// Signal: dual-band crossings of the price against upper / lower.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::PriceSource;
use crate::moving_average::{self, MovingAverageKind};
use crate::pipeline::{difference, ratio, Indicator, IndicatorInputs, IndicatorResult};
use crate::rolling::{rolling, rolling_variance_around, RollingStat};
use crate::signals::DualBand;

/// Which mean the band deviation is measured around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarianceBasis {
    #[default]
    WindowMean,
    MiddleBand,
}

fn default_length() -> usize {
    20
}

fn default_kind() -> MovingAverageKind {
    MovingAverageKind::Simple
}

fn default_multiplier() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bollinger {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default = "default_kind")]
    pub kind: MovingAverageKind,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub basis: VarianceBasis,
    #[serde(default)]
    pub source: PriceSource,
    #[serde(default)]
    pub reversed: bool,
}

impl Default for Bollinger {
    fn default() -> Self {
        Self {
            length: default_length(),
            kind: default_kind(),
            multiplier: default_multiplier(),
            basis: VarianceBasis::default(),
            source: PriceSource::default(),
            reversed: false,
        }
    }
}

impl Bollinger {
    pub fn new(length: usize, multiplier: f64) -> Self {
        Self {
            length,
            multiplier,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        IndicatorError::check_length("bollinger length", self.length)?;
        let multiplier = IndicatorError::check_finite("multiplier", self.multiplier)?;
        if multiplier < 0.0 {
            return Err(IndicatorError::InvalidParameter {
                param: "multiplier",
                value: multiplier,
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &'static str {
        "Bollinger"
    }

    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
        self.validate()?;
        let price = inputs.input(self.source);

        let middle = moving_average::apply(self.kind, self.length, &price)?;
        let variance = match self.basis {
            VarianceBasis::WindowMean => rolling(&price, self.length, RollingStat::Variance)?,
            VarianceBasis::MiddleBand => rolling_variance_around(&price, &middle, self.length)?,
        };
        let offset = variance.map(|v| self.multiplier * v.sqrt());

        let upper = middle.zip_with(&offset, "bollinger upper", |m, o| m + o)?;
        let lower = middle.zip_with(&offset, "bollinger lower", |m, o| m - o)?;
        let width = ratio(&difference(&upper, &lower)?, &middle, 0.0)?.map(|w| w * 100.0);
        let signals = DualBand::new()
            .reversed(self.reversed)
            .classify_series(&price, &upper, &lower)?;

        IndicatorResult::builder(self.name(), inputs.len())
            .channel("MiddleBand", middle)?
            .channel("UpperBand", upper)?
            .channel("LowerBand", lower)?
            .channel("Width", width)?
            .signals(signals)?
            .build()
    }
}
