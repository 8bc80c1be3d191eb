// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. +DM / -DM per bar (0 on the first bar).
//   2. True Range per bar.
//   3. MA(kind, length) of +DM, -DM and TR   (Wilder by default).
//   4. +DI = smoothed(+DM) / smoothed(TR) * 100,   0 when smoothed TR is 0
//      -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100,      0 when both DI are 0
//   6. ADX = MA(kind, adx_length) of DX
//
// Interpretation:
//   ADX > 25  => trending market, direction from +DI vs -DI
//   otherwise => ranging, Neutral
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::indicators::atr::true_range;
use crate::market_data::{BarSeries, Series};
use crate::moving_average::{self, MovingAverageKind};
use crate::pipeline::{clamp, difference, ratio, Indicator, IndicatorInputs, IndicatorResult};
use crate::signals::VolatilityBreakout;

fn default_length() -> usize {
    14
}

fn default_kind() -> MovingAverageKind {
    MovingAverageKind::Wilder
}

fn default_threshold() -> f64 {
    25.0
}

/// Raw (+DM, -DM) per bar.
pub fn directional_movement(bars: &BarSeries) -> (Series, Series) {
    let (high, low) = (bars.high(), bars.low());
    (0..bars.len())
        .map(|i| {
            if i == 0 {
                return (0.0, 0.0);
            }
            let up = high[i] - high[i - 1];
            let down = low[i - 1] - low[i];
            let plus = if up > down && up > 0.0 { up } else { 0.0 };
            let minus = if down > up && down > 0.0 { down } else { 0.0 };
            (plus, minus)
        })
        .unzip()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adx {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default = "default_length")]
    pub adx_length: usize,
    #[serde(default = "default_kind")]
    pub kind: MovingAverageKind,
    #[serde(default = "default_threshold")]
    pub trend_threshold: f64,
    #[serde(default)]
    pub reversed: bool,
}

impl Default for Adx {
    fn default() -> Self {
        Self {
            length: default_length(),
            adx_length: default_length(),
            kind: default_kind(),
            trend_threshold: default_threshold(),
            reversed: false,
        }
    }
}

impl Adx {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            adx_length: length,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        IndicatorError::check_length("adx length", self.length)?;
        IndicatorError::check_length("adx smoothing length", self.adx_length)?;
        let threshold = IndicatorError::check_finite("trend_threshold", self.trend_threshold)?;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(IndicatorError::InvalidParameter {
                param: "trend_threshold",
                value: threshold,
                reason: "must lie in [0, 100]",
            });
        }
        Ok(())
    }
}

impl Indicator for Adx {
    fn name(&self) -> &'static str {
        "Adx"
    }

    fn compute(&self, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
        self.validate()?;
        let bars = inputs.bars();

        let (plus_dm, minus_dm) = directional_movement(bars);
        let tr = true_range(bars);
        let smooth = |s: &[f64]| moving_average::apply(self.kind, self.length, s);
        let (plus_dm, minus_dm, tr) = (
            smooth(plus_dm.as_slice())?,
            smooth(minus_dm.as_slice())?,
            smooth(tr.as_slice())?,
        );

        let to_di = |dm: &Series| -> Result<Series> {
            Ok(clamp(&ratio(dm, &tr, 0.0)?.map(|r| r * 100.0), 0.0, 100.0))
        };
        let plus_di = to_di(&plus_dm)?;
        let minus_di = to_di(&minus_dm)?;

        let spread = difference(&plus_di, &minus_di)?;
        let total = plus_di.zip_with(&minus_di, "adx di sum", |p, m| p + m)?;
        let dx = clamp(&ratio(&spread.map(f64::abs), &total, 0.0)?.map(|r| r * 100.0), 0.0, 100.0);
        let adx = clamp(
            &moving_average::apply(self.kind, self.adx_length, &dx)?,
            0.0,
            100.0,
        );

        let level = Series::constant(self.trend_threshold, adx.len());
        let signals = VolatilityBreakout::new()
            .reversed(self.reversed)
            .classify_series(&adx, &level, &spread)?;

        IndicatorResult::builder(self.name(), inputs.len())
            .channel("Adx", adx)?
            .channel("PlusDi", plus_di)?
            .channel("MinusDi", minus_di)?
            .signals(signals)?
            .build()
    }
}
