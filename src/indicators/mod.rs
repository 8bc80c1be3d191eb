// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Reference indicators, each a complete pipeline over the shared bar series.
// `IndicatorSpec` is the serialisable form used by configuration files and by
// name dispatch; `build()` validates every parameter before any bar is read.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod roc;
pub mod rsi;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::{Bollinger, VarianceBasis};
pub use macd::Macd;
pub use moving_average::MovingAverageTrend;
pub use roc::Roc;
pub use rsi::Rsi;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::pipeline::{Indicator, IndicatorInputs, IndicatorResult};

/// A named indicator plus its parameters.
///
/// ```json
/// { "indicator": "Rsi", "length": 14, "upper_bound": 70.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "indicator")]
pub enum IndicatorSpec {
    MovingAverage(MovingAverageTrend),
    Rsi(Rsi),
    Macd(Macd),
    Bollinger(Bollinger),
    Atr(Atr),
    Adx(Adx),
    Roc(Roc),
}

impl IndicatorSpec {
    /// Every name accepted by [`run_named`].
    pub const NAMES: [&'static str; 7] = [
        "MovingAverage",
        "Rsi",
        "Macd",
        "Bollinger",
        "Atr",
        "Adx",
        "Roc",
    ];

    pub fn name(&self) -> &'static str {
        self.as_indicator().name()
    }

    fn as_indicator(&self) -> &dyn Indicator {
        match self {
            Self::MovingAverage(i) => i,
            Self::Rsi(i) => i,
            Self::Macd(i) => i,
            Self::Bollinger(i) => i,
            Self::Atr(i) => i,
            Self::Adx(i) => i,
            Self::Roc(i) => i,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::MovingAverage(i) => i.validate(),
            Self::Rsi(i) => i.validate(),
            Self::Macd(i) => i.validate(),
            Self::Bollinger(i) => i.validate(),
            Self::Atr(i) => i.validate(),
            Self::Adx(i) => i.validate(),
            Self::Roc(i) => i.validate(),
        }
    }

    /// Validate and box the configured indicator.
    pub fn build(&self) -> Result<Box<dyn Indicator>> {
        self.validate()?;
        let indicator: Box<dyn Indicator> = match self.clone() {
            Self::MovingAverage(i) => Box::new(i),
            Self::Rsi(i) => Box::new(i),
            Self::Macd(i) => Box::new(i),
            Self::Bollinger(i) => Box::new(i),
            Self::Atr(i) => Box::new(i),
            Self::Adx(i) => Box::new(i),
            Self::Roc(i) => Box::new(i),
        };
        Ok(indicator)
    }

    /// Decode a spec from a name and a JSON parameter object.
    ///
    /// # Errors
    /// `UnknownIndicator` for a name outside [`NAMES`](Self::NAMES),
    /// `InvalidParams` when the parameters do not decode.
    pub fn from_name(name: &str, params: serde_json::Value) -> Result<Self> {
        if !Self::NAMES.contains(&name) {
            return Err(IndicatorError::UnknownIndicator(name.to_string()));
        }
        let mut object = match params {
            serde_json::Value::Null => serde_json::Map::new(),
            serde_json::Value::Object(map) => map,
            other => {
                return Err(IndicatorError::InvalidParams(format!(
                    "{name}: expected a JSON object, got {other}"
                )))
            }
        };
        object.insert("indicator".to_string(), serde_json::Value::from(name));
        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| IndicatorError::InvalidParams(format!("{name}: {e}")))
    }

    /// Stable key identifying this exact configuration.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// Run one indicator pipeline.
pub fn run_indicator(spec: &IndicatorSpec, inputs: &IndicatorInputs<'_>) -> Result<IndicatorResult> {
    let indicator = spec.build()?;
    debug!(
        indicator = indicator.name(),
        bars = inputs.len(),
        chained = inputs.is_chained(),
        "running indicator"
    );
    indicator.compute(inputs)
}

/// Run an indicator by name with JSON parameters.
pub fn run_named(
    name: &str,
    params: serde_json::Value,
    inputs: &IndicatorInputs<'_>,
) -> Result<IndicatorResult> {
    let spec = IndicatorSpec::from_name(name, params)?;
    run_indicator(&spec, inputs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::BarSeries;
    use crate::moving_average::MovingAverageKind;
    use serde_json::json;

    fn bars() -> BarSeries {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + (i as f64 * 0.4).cos() * 3.0).collect();
        BarSeries::from_closes(&closes).unwrap()
    }

    #[test]
    fn spec_json_is_tagged() {
        let spec: IndicatorSpec = serde_json::from_value(json!({
            "indicator": "MovingAverage",
            "kind": "Exponential",
            "length": 5
        }))
        .unwrap();
        assert_eq!(
            spec,
            IndicatorSpec::MovingAverage(MovingAverageTrend::new(MovingAverageKind::Exponential, 5))
        );
        assert_eq!(spec.name(), "MovingAverage");
        assert!(spec.cache_key().starts_with(r#"{"indicator":"MovingAverage""#));
    }

    #[test]
    fn every_name_decodes_with_defaults() {
        for name in IndicatorSpec::NAMES {
            let spec = IndicatorSpec::from_name(name, serde_json::Value::Null).unwrap();
            assert_eq!(spec.name(), name);
            assert!(spec.build().is_ok(), "{name}");
        }
    }

    #[test]
    fn run_named_dispatches() {
        let bars = bars();
        let inputs = IndicatorInputs::new(&bars);
        let result = run_named("Rsi", json!({ "length": 7 }), &inputs).unwrap();
        assert_eq!(result.indicator(), "Rsi");
        assert_eq!(result.len(), bars.len());
    }

    #[test]
    fn unknown_name_and_bad_params() {
        let bars = bars();
        let inputs = IndicatorInputs::new(&bars);
        assert!(matches!(
            run_named("Ichimoku", json!({}), &inputs),
            Err(IndicatorError::UnknownIndicator(_))
        ));
        assert!(matches!(
            run_named("Rsi", json!({ "length": "long" }), &inputs),
            Err(IndicatorError::InvalidParams(_))
        ));
        assert!(matches!(
            run_named("Rsi", json!([1, 2]), &inputs),
            Err(IndicatorError::InvalidParams(_))
        ));
    }

    #[test]
    fn build_rejects_before_any_bar_is_read() {
        let spec = IndicatorSpec::Macd(Macd::new(30, 10, 9));
        assert!(spec.build().is_err());
        let empty = BarSeries::default();
        assert!(run_indicator(&spec, &IndicatorInputs::new(&empty)).is_err());
    }

    #[test]
    fn every_indicator_covers_every_bar() {
        let bars = bars();
        let inputs = IndicatorInputs::new(&bars);
        for name in IndicatorSpec::NAMES {
            let result = run_named(name, json!({}), &inputs).unwrap();
            assert_eq!(result.len(), bars.len(), "{name}");
            for channel in result.channels() {
                assert_eq!(channel.values.len(), bars.len(), "{name}.{}", channel.name);
                assert!(channel.values.iter().all(|v| v.is_finite()), "{name}.{}", channel.name);
            }
        }
    }

    #[test]
    fn empty_bars_give_empty_results() {
        let empty = BarSeries::default();
        let inputs = IndicatorInputs::new(&empty);
        for name in IndicatorSpec::NAMES {
            let result = run_named(name, json!({}), &inputs).unwrap();
            assert!(result.is_empty(), "{name}");
        }
    }
}
