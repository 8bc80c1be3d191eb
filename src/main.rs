// =============================================================================
// Aurora Indicators: Main Entry Point
// =============================================================================
//
// Loads a bar file, runs the configured indicators over it and logs one
// summary line per indicator.  Presentation beyond logs is left to callers of
// the library.
// =============================================================================

use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aurora_indicators::{Bar, BarSeries, EngineConfig, IndicatorEngine};

const CONFIG_ENV: &str = "AURORA_INDICATOR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "indicator_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let config = EngineConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, path = %config_path, "Failed to load config, using defaults");
        EngineConfig::default()
    });
    config.validate()?;

    // ── 2. Bars ──────────────────────────────────────────────────────────
    let bars = load_bars(&config.bars_path)?;
    info!(
        path = %config.bars_path.display(),
        bars = bars.len(),
        indicators = config.indicators.len(),
        "bars loaded"
    );

    // ── 3. Run ───────────────────────────────────────────────────────────
    let engine = IndicatorEngine::new(bars);
    let outcomes = if config.parallel {
        engine.run_batch(config.indicators.clone()).await
    } else {
        engine.run_sequential(&config.indicators)
    };

    // ── 4. Report ────────────────────────────────────────────────────────
    for outcome in &outcomes {
        if let Ok(result) = &outcome.result {
            let last_value = result.primary().last().copied();
            let last_signal = result.last_signal().unwrap_or_default();
            info!(
                indicator = result.indicator(),
                primary = result.primary_name(),
                last_value = ?last_value,
                signal = %last_signal,
                action = last_signal.action(),
                "indicator summary"
            );
        }
    }

    let stats = engine.cache_stats();
    info!(hits = stats.hits, misses = stats.misses, "done");
    Ok(())
}

fn load_bars(path: &Path) -> anyhow::Result<BarSeries> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bars from {}", path.display()))?;
    let bars: Vec<Bar> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse bars from {}", path.display()))?;
    BarSeries::ingest(bars).with_context(|| format!("invalid bar in {}", path.display()))
}
