// =============================================================================
// Trend-compare rule
// =============================================================================
//
// delta = value - reference
//   delta > 0  => Bullish
//   delta < 0  => Bearish
//   delta == 0 => previous signal (ties never flip)
//
// With `emphasize_crossovers`, a change of sign since the previous bar is
// reported as the Strong variant.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::signals::{orient, reduce, with_previous, SignalRule};
use crate::types::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendObservation {
    pub delta: f64,
    pub previous_delta: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendCompare {
    #[serde(default)]
    pub reversed: bool,
    #[serde(default)]
    pub emphasize_crossovers: bool,
}

impl TrendCompare {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn emphasize_crossovers(mut self, emphasize: bool) -> Self {
        self.emphasize_crossovers = emphasize;
        self
    }

    /// Classify a whole delta series.
    pub fn classify_series(&self, deltas: &[f64]) -> Vec<Signal> {
        reduce(
            self,
            with_previous(deltas).map(|(previous_delta, delta)| TrendObservation {
                delta,
                previous_delta,
            }),
        )
    }
}

impl SignalRule for TrendCompare {
    type Observation = TrendObservation;

    fn classify(&self, previous: Signal, obs: &TrendObservation) -> Signal {
        let crossed = self.emphasize_crossovers && obs.delta * obs.previous_delta < 0.0;
        let fresh = if obs.delta > 0.0 {
            if crossed {
                Signal::StrongBullish
            } else {
                Signal::Bullish
            }
        } else if obs.delta < 0.0 {
            if crossed {
                Signal::StrongBearish
            } else {
                Signal::Bearish
            }
        } else {
            return previous;
        };
        orient(fresh, self.reversed)
    }
}
