// =============================================================================
// Volatility-breakout rule
// =============================================================================
//
//   magnitude > level  => Bullish if direction > 0, Bearish if direction < 0
//   otherwise          => Neutral
//
// `direction` is usually price minus its moving average (ATR) or +DI - -DI
// (ADX).  The rule never carries state: a quiet market is always Neutral.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::signals::{orient, reduce, SignalRule};
use crate::types::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutObservation {
    pub magnitude: f64,
    pub level: f64,
    pub direction: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolatilityBreakout {
    reversed: bool,
}

impl VolatilityBreakout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn classify_series(
        &self,
        magnitude: &[f64],
        level: &[f64],
        direction: &[f64],
    ) -> Result<Vec<Signal>> {
        IndicatorError::check_aligned("breakout level", magnitude.len(), level.len())?;
        IndicatorError::check_aligned("breakout direction", magnitude.len(), direction.len())?;
        Ok(reduce(
            self,
            magnitude
                .iter()
                .zip(level.iter())
                .zip(direction.iter())
                .map(|((&magnitude, &level), &direction)| BreakoutObservation {
                    magnitude,
                    level,
                    direction,
                }),
        ))
    }
}

impl SignalRule for VolatilityBreakout {
    type Observation = BreakoutObservation;

    fn classify(&self, _previous: Signal, obs: &BreakoutObservation) -> Signal {
        if obs.magnitude <= obs.level {
            return Signal::Neutral;
        }
        let fresh = if obs.direction > 0.0 {
            Signal::Bullish
        } else if obs.direction < 0.0 {
            Signal::Bearish
        } else {
            Signal::Neutral
        };
        orient(fresh, self.reversed)
    }
}
