// =============================================================================
// Runtime Configuration: engine settings with atomic save
// =============================================================================
//
// Which bars to load, which indicators to run over them, and whether the
// batch runs concurrently.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::{Bollinger, IndicatorSpec, Macd, MovingAverageTrend, Rsi};
use crate::moving_average::MovingAverageKind;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_bars_path() -> PathBuf {
    PathBuf::from("bars.json")
}

fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec::MovingAverage(MovingAverageTrend::new(MovingAverageKind::Simple, 20)),
        IndicatorSpec::Rsi(Rsi::default()),
        IndicatorSpec::Macd(Macd::default()),
        IndicatorSpec::Bollinger(Bollinger::default()),
    ]
}

// =============================================================================
// EngineConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// JSON array of bars, oldest first.
    #[serde(default = "default_bars_path")]
    pub bars_path: PathBuf,

    /// Indicators to run, in report order.
    #[serde(default = "default_indicators")]
    pub indicators: Vec<IndicatorSpec>,

    /// Run the batch on the blocking pool instead of one after another.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bars_path: default_bars_path(),
            indicators: default_indicators(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// Returns an error if the file cannot be read or parsed.  The caller
    /// (typically `main`) should decide whether to fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bars_path = %config.bars_path.display(),
            indicators = config.indicators.len(),
            parallel = config.parallel,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise engine config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "engine config saved (atomic)");
        Ok(())
    }

    /// Reject the first misconfigured indicator before any bar is loaded.
    pub fn validate(&self) -> Result<()> {
        for (i, spec) in self.indicators.iter().enumerate() {
            spec.validate()
                .with_context(|| format!("indicator #{i} ({}) is misconfigured", spec.name()))?;
        }
        Ok(())
    }
}
