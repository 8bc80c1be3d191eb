// =============================================================================
// Band rules
// =============================================================================
//
// BandThreshold (oscillators such as RSI):
//   value crosses above `upper` moving up    => StrongBearish (overbought)
//   value crosses below `lower` moving down  => StrongBullish (oversold)
//   otherwise                                => trend-compare on the histogram
//
// DualBand (price against an upper/lower envelope):
//   crosses above upper      => Bullish
//   crosses below lower      => Bearish
//   falls back below upper   => Bearish
//   recovers above lower     => Bullish
//   otherwise                => previous signal
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::signals::{orient, reduce, with_previous, SignalRule};
use crate::types::Signal;

// ---------------------------------------------------------------------------
// BandThreshold
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandObservation {
    pub value: f64,
    pub previous_value: f64,
    pub histogram: f64,
    pub previous_histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandThreshold {
    upper: f64,
    lower: f64,
    reversed: bool,
}

impl BandThreshold {
    /// # Errors
    /// `InvalidParameter` when a bound is non-finite or `lower >= upper`.
    pub fn new(upper: f64, lower: f64) -> Result<Self> {
        let upper = IndicatorError::check_finite("upper_bound", upper)?;
        let lower = IndicatorError::check_finite("lower_bound", lower)?;
        if lower >= upper {
            return Err(IndicatorError::InvalidParameter {
                param: "lower_bound",
                value: lower,
                reason: "must be below upper_bound",
            });
        }
        Ok(Self {
            upper,
            lower,
            reversed: false,
        })
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Classify an oscillator series together with its histogram.
    pub fn classify_series(&self, values: &[f64], histogram: &[f64]) -> Result<Vec<Signal>> {
        IndicatorError::check_aligned("band threshold histogram", values.len(), histogram.len())?;
        Ok(reduce(
            self,
            with_previous(values).zip(with_previous(histogram)).map(
                |((previous_value, value), (previous_histogram, histogram))| BandObservation {
                    value,
                    previous_value,
                    histogram,
                    previous_histogram,
                },
            ),
        ))
    }
}

impl SignalRule for BandThreshold {
    type Observation = BandObservation;

    fn classify(&self, previous: Signal, obs: &BandObservation) -> Signal {
        let fresh = if obs.previous_value <= self.upper && obs.value > self.upper {
            Signal::StrongBearish
        } else if obs.previous_value >= self.lower && obs.value < self.lower {
            Signal::StrongBullish
        } else if obs.histogram > 0.0 {
            Signal::Bullish
        } else if obs.histogram < 0.0 {
            Signal::Bearish
        } else {
            return previous;
        };
        orient(fresh, self.reversed)
    }
}

// ---------------------------------------------------------------------------
// DualBand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeObservation {
    pub value: f64,
    pub previous_value: f64,
    pub upper: f64,
    pub previous_upper: f64,
    pub lower: f64,
    pub previous_lower: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DualBand {
    reversed: bool,
}

impl DualBand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn classify_series(&self, values: &[f64], upper: &[f64], lower: &[f64]) -> Result<Vec<Signal>> {
        IndicatorError::check_aligned("dual band upper", values.len(), upper.len())?;
        IndicatorError::check_aligned("dual band lower", values.len(), lower.len())?;
        Ok(reduce(
            self,
            with_previous(values)
                .zip(with_previous(upper))
                .zip(with_previous(lower))
                .map(
                    |(((previous_value, value), (previous_upper, upper)), (previous_lower, lower))| {
                        EnvelopeObservation {
                            value,
                            previous_value,
                            upper,
                            previous_upper,
                            lower,
                            previous_lower,
                        }
                    },
                ),
        ))
    }
}

impl SignalRule for DualBand {
    type Observation = EnvelopeObservation;

    fn classify(&self, previous: Signal, obs: &EnvelopeObservation) -> Signal {
        let was_above = obs.previous_value > obs.previous_upper;
        let was_below = obs.previous_value < obs.previous_lower;
        let is_above = obs.value > obs.upper;
        let is_below = obs.value < obs.lower;

        let fresh = if !was_above && is_above {
            Signal::Bullish
        } else if !was_below && is_below {
            Signal::Bearish
        } else if was_above && !is_above {
            Signal::Bearish
        } else if was_below && !is_below {
            Signal::Bullish
        } else {
            return previous;
        };
        orient(fresh, self.reversed)
    }
}
