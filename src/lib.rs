// =============================================================================
// Aurora Indicators: causal technical-indicator core
// =============================================================================
//
// Bars in, bar-aligned series and per-bar signals out.  Every value at bar i
// depends only on bars 0..=i; the first bars use whatever history exists.
//
// Layers, bottom-up:
//   market_data     Bar, BarSeries, Series
//   rolling         incremental trailing-window statistics
//   moving_average  SMA / EMA / Wilder / WMA / DEMA / TEMA / Hull / KAMA / VIDYA
//   signals         per-bar classification rules
//   pipeline        Indicator trait, inputs, combinators, result container
//   indicators      reference indicators and name dispatch
//   engine          cached, batched execution over one shared bar series
// =============================================================================

pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod moving_average;
pub mod pipeline;
pub mod rolling;
pub mod runtime_config;
pub mod signals;
pub mod types;

pub use engine::{BatchOutcome, CacheStats, IndicatorEngine};
pub use error::{IndicatorError, Result};
pub use indicators::{run_indicator, run_named, IndicatorSpec};
pub use market_data::{Bar, BarSeries, PriceSource, Series};
pub use moving_average::{MovingAverage, MovingAverageKind};
pub use pipeline::{Indicator, IndicatorInputs, IndicatorResult};
pub use rolling::{RollingStat, RollingWindow};
pub use runtime_config::EngineConfig;
pub use types::Signal;
