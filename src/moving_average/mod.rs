// =============================================================================
// Moving Average Engine
// =============================================================================
//
// One polymorphic entry point: `apply(kind, length, series)` returns a series
// of identical length, index-aligned and causal.  Every variant seeds from
// `series[0]` and reads only `series[..=i]` and its own `result[..i]`.
//
// Variants:
//   Simple                 rolling average (partial window at start)
//   Exponential            alpha = 2 / (length + 1)
//   Wilder                 alpha = 1 / length
//   Weighted               linear weights, newest = length
//   DoubleExponential      2*EMA - EMA(EMA)
//   TripleExponential      3*EMA - 3*EMA(EMA) + EMA(EMA(EMA))
//   Hull                   WMA of (2*WMA(n/2) - WMA(n)) over sqrt(n)
//   KaufmanAdaptive        efficiency-ratio driven alpha
//   VariableIndexDynamic   |CMO| driven alpha
// =============================================================================

pub mod adaptive;
pub mod recursive;
pub mod weighted;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;
use crate::rolling::{rolling, RollingStat};

pub use adaptive::{efficiency_ratio, kama, kaufman_adaptive, vidya};
pub use recursive::{dema, ema, smooth, tema, wilder};
pub use weighted::{hull, wma};

/// Which recursive formula a pipeline stage applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovingAverageKind {
    Simple,
    Exponential,
    Wilder,
    Weighted,
    DoubleExponential,
    TripleExponential,
    Hull,
    KaufmanAdaptive,
    VariableIndexDynamic,
}

impl Default for MovingAverageKind {
    fn default() -> Self {
        Self::Exponential
    }
}

impl std::fmt::Display for MovingAverageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Simple => "SMA",
            Self::Exponential => "EMA",
            Self::Wilder => "RMA",
            Self::Weighted => "WMA",
            Self::DoubleExponential => "DEMA",
            Self::TripleExponential => "TEMA",
            Self::Hull => "HMA",
            Self::KaufmanAdaptive => "KAMA",
            Self::VariableIndexDynamic => "VIDYA",
        };
        write!(f, "{name}")
    }
}

/// Stateless descriptor: a variant plus its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovingAverage {
    pub kind: MovingAverageKind,
    pub length: usize,
}

impl MovingAverage {
    pub fn new(kind: MovingAverageKind, length: usize) -> Self {
        Self { kind, length }
    }

    pub fn apply(&self, series: &[f64]) -> Result<Series> {
        apply(self.kind, self.length, series)
    }
}

/// Run the moving average `kind` of `length` over `series`.
///
/// # Errors
/// `InvalidLength` when `length == 0`.
pub fn apply(kind: MovingAverageKind, length: usize, series: &[f64]) -> Result<Series> {
    IndicatorError::check_length("moving average", length)?;
    trace!(%kind, length, bars = series.len(), "moving average stage");

    match kind {
        MovingAverageKind::Simple => rolling(series, length, RollingStat::Average),
        MovingAverageKind::Exponential => ema(series, length),
        MovingAverageKind::Wilder => wilder(series, length),
        MovingAverageKind::Weighted => wma(series, length),
        MovingAverageKind::DoubleExponential => dema(series, length),
        MovingAverageKind::TripleExponential => tema(series, length),
        MovingAverageKind::Hull => hull(series, length),
        MovingAverageKind::KaufmanAdaptive => kama(series, length),
        MovingAverageKind::VariableIndexDynamic => vidya(series, length),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MovingAverageKind; 9] = [
        MovingAverageKind::Simple,
        MovingAverageKind::Exponential,
        MovingAverageKind::Wilder,
        MovingAverageKind::Weighted,
        MovingAverageKind::DoubleExponential,
        MovingAverageKind::TripleExponential,
        MovingAverageKind::Hull,
        MovingAverageKind::KaufmanAdaptive,
        MovingAverageKind::VariableIndexDynamic,
    ];

    #[test]
    fn every_variant_preserves_length() {
        let data: Vec<f64> = (0..37).map(|i| (i as f64 * 0.7).sin() * 10.0 + 50.0).collect();
        for kind in ALL {
            let out = apply(kind, 8, &data).unwrap();
            assert_eq!(out.len(), data.len(), "{kind}");
            assert!((out[0] - data[0]).abs() < 1e-12, "{kind} must seed from the first value");
            assert!(out.iter().all(|v| v.is_finite()), "{kind}");
        }
    }

    #[test]
    fn every_variant_rejects_zero_length() {
        for kind in ALL {
            assert!(apply(kind, 0, &[1.0, 2.0]).is_err(), "{kind}");
        }
    }

    #[test]
    fn every_variant_is_constant_on_constant_input() {
        for kind in ALL {
            let out = apply(kind, 5, &[42.0; 25]).unwrap();
            assert!(out.iter().all(|&v| (v - 42.0).abs() < 1e-9), "{kind}");
        }
    }

    #[test]
    fn every_variant_is_causal() {
        let data: Vec<f64> = (0..30).map(|i| ((i * 13) % 7) as f64).collect();
        for kind in ALL {
            let full = apply(kind, 6, &data).unwrap();
            let prefix = apply(kind, 6, &data[..18]).unwrap();
            for i in 0..18 {
                assert_eq!(full[i], prefix[i], "{kind} repainted at {i}");
            }
        }
    }

    #[test]
    fn sma_scenario() {
        let out = apply(MovingAverageKind::Simple, 3, &[10.0, 11.0, 12.0, 11.0, 10.0]).unwrap();
        let expected = [10.0, 10.5, 11.0, 34.0 / 3.0, 11.0];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn descriptor_roundtrips_through_json() {
        let ma = MovingAverage::new(MovingAverageKind::Hull, 9);
        let json = serde_json::to_string(&ma).unwrap();
        assert_eq!(json, r#"{"kind":"Hull","length":9}"#);
        let back: MovingAverage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ma);
        assert_eq!(back.apply(&[1.0, 2.0]).unwrap().len(), 2);
    }
}
