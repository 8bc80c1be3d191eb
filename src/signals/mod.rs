// =============================================================================
// Signal Classifier
// =============================================================================
//
// Every rule is a pure per-bar reducer:
//
//   signal_i = classify(signal_{i-1}, observation_i),   signal_{-1} = Neutral
//
// An observation carries the current and immediately preceding values of the
// series the rule looks at.  At bar 0 there is no preceding value, so the
// current value stands in for it; no rule can detect a crossing on bar 0.
//
// Rules:
//   TrendCompare        sign of a delta, ties carry the previous signal
//   BandThreshold       oscillator extremes, else trend on the histogram
//   VolatilityBreakout  direction only while magnitude exceeds a level
//   DualBand            four-way crossings against an upper/lower envelope
// =============================================================================

pub mod bands;
pub mod breakout;
pub mod trend;

pub use bands::{BandObservation, BandThreshold, DualBand, EnvelopeObservation};
pub use breakout::{BreakoutObservation, VolatilityBreakout};
pub use trend::{TrendCompare, TrendObservation};

use crate::types::Signal;

/// A per-bar classification rule.
pub trait SignalRule {
    type Observation;

    /// Classify one bar given the signal emitted for the bar before it.
    fn classify(&self, previous: Signal, observation: &Self::Observation) -> Signal;
}

/// Fold `rule` over `observations`, starting from `Neutral`.
pub fn reduce<R, I>(rule: &R, observations: I) -> Vec<Signal>
where
    R: SignalRule,
    I: IntoIterator<Item = R::Observation>,
{
    observations
        .into_iter()
        .scan(Signal::Neutral, |state, observation| {
            *state = rule.classify(*state, &observation);
            Some(*state)
        })
        .collect()
}

/// `(previous, current)` pairs for every bar, with bar 0 paired to itself.
pub(crate) fn with_previous(series: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    series
        .iter()
        .enumerate()
        .map(move |(i, &x)| (if i == 0 { x } else { series[i - 1] }, x))
}

/// Apply the `reversed` flag to a freshly classified signal.
pub(crate) fn orient(signal: Signal, reversed: bool) -> Signal {
    if reversed {
        signal.inverted()
    } else {
        signal
    }
}
