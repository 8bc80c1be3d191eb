// =============================================================================
// Indicator Engine: batch execution over one shared bar series
// =============================================================================
//
// Each indicator recurrence is strictly sequential over bars, so parallelism
// exists only across independent indicator invocations.  The engine shares
// one immutable `BarSeries` behind an `Arc` and fans a batch out onto the
// blocking pool, one task per spec.
//
// Thread safety:
//   - The bar series is read-only; no lock is taken to read it.
//   - parking_lot::RwLock guards the result cache.
//   - Atomic counters for lock-free hit / miss tracking.
//
// Isolation: every spec in a batch yields its own `BatchOutcome`.  A
// configuration error or a panicking task is reported in that outcome only.
// Dropping the batch future abandons results that have not been collected;
// a task that is already running finishes its indicator and is discarded.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::error::{IndicatorError, Result};
use crate::indicators::{run_indicator, IndicatorSpec};
use crate::market_data::{BarSeries, Series};
use crate::pipeline::{IndicatorInputs, IndicatorResult};

/// Result of one spec in a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub spec: IndicatorSpec,
    pub result: Result<Arc<IndicatorResult>>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Cache counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Runs indicators over one immutable bar series.  Cheap to clone; clones
/// share the bars and the cache.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    bars: Arc<BarSeries>,
    cache: Arc<RwLock<HashMap<String, Arc<IndicatorResult>>>>,
    counters: Arc<Counters>,
}

impl IndicatorEngine {
    pub fn new(bars: impl Into<Arc<BarSeries>>) -> Self {
        Self {
            bars: bars.into(),
            cache: Arc::new(RwLock::new(HashMap::new())),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn bars(&self) -> &Arc<BarSeries> {
        &self.bars
    }

    /// Run `spec` over the raw bars, reusing a cached result for an identical
    /// configuration.
    pub fn run(&self, spec: &IndicatorSpec) -> Result<Arc<IndicatorResult>> {
        let key = spec.cache_key();
        if let Some(hit) = self.cache.read().get(&key) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            trace!(indicator = spec.name(), "indicator cache hit");
            return Ok(Arc::clone(hit));
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        let started = Instant::now();
        let result = Arc::new(run_indicator(spec, &IndicatorInputs::new(&self.bars))?);
        debug!(
            indicator = spec.name(),
            bars = result.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "indicator computed"
        );

        // A concurrent run of the same spec may have landed first; keep it.
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(key).or_insert(result)))
    }

    /// Run `spec` over an upstream series (e.g. another result's primary).
    /// Chained runs are not cached: the key would have to cover the source.
    pub fn run_chained(&self, spec: &IndicatorSpec, source: &Series) -> Result<IndicatorResult> {
        let inputs = IndicatorInputs::with_source(&self.bars, source)?;
        run_indicator(spec, &inputs)
    }

    /// Run every spec on the calling thread, in order.
    pub fn run_sequential(&self, specs: &[IndicatorSpec]) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = specs
            .iter()
            .map(|spec| BatchOutcome {
                spec: spec.clone(),
                result: self.run(spec),
            })
            .collect();
        log_batch(&outcomes, false);
        outcomes
    }

    /// Run every spec concurrently on the blocking pool.  Outcomes are
    /// returned in the order of `specs`.
    pub async fn run_batch(&self, specs: Vec<IndicatorSpec>) -> Vec<BatchOutcome> {
        let handles = specs.iter().cloned().map(|spec| {
            let engine = self.clone();
            tokio::task::spawn_blocking(move || engine.run(&spec))
        });
        let joined = join_all(handles).await;

        let outcomes: Vec<BatchOutcome> = specs
            .into_iter()
            .zip(joined)
            .map(|(spec, joined)| {
                let result = joined
                    .map_err(|e| IndicatorError::TaskFailed(format!("{}: {e}", spec.name())))
                    .and_then(|r| r);
                BatchOutcome { spec, result }
            })
            .collect();
        log_batch(&outcomes, true);
        outcomes
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            entries: self.cache.read().len(),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }
}

fn log_batch(outcomes: &[BatchOutcome], parallel: bool) {
    let mut failed = 0usize;
    for outcome in outcomes {
        if let Err(e) = &outcome.result {
            failed += 1;
            warn!(indicator = outcome.spec.name(), error = %e, "indicator failed");
        }
    }
    info!(
        total = outcomes.len(),
        failed,
        parallel,
        "indicator batch finished"
    );
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{Macd, Roc, Rsi};

    fn engine() -> IndicatorEngine {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.2).sin() * 10.0).collect();
        IndicatorEngine::new(BarSeries::from_closes(&closes).unwrap())
    }

    // ---- cache -------------------------------------------------------------

    #[test]
    fn repeated_spec_is_served_from_cache() {
        let engine = engine();
        let spec = IndicatorSpec::Rsi(Rsi::default());
        let first = engine.run(&spec).unwrap();
        let second = engine.run(&spec).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            engine.cache_stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
        engine.clear_cache();
        assert_eq!(engine.cache_stats().entries, 0);
    }

    #[test]
    fn failures_are_not_cached() {
        let engine = engine();
        let bad = IndicatorSpec::Roc(Roc::new(0));
        assert!(engine.run(&bad).is_err());
        assert_eq!(engine.cache_stats().entries, 0);
    }

    // ---- chaining ----------------------------------------------------------

    #[test]
    fn chained_run_uses_upstream_primary() {
        let engine = engine();
        let macd = engine.run(&IndicatorSpec::Macd(Macd::default())).unwrap();
        let rsi_of_macd = engine
            .run_chained(&IndicatorSpec::Rsi(Rsi::new(5)), macd.primary())
            .unwrap();
        assert_eq!(rsi_of_macd.len(), engine.bars().len());

        let direct = crate::indicators::rsi::rsi(macd.primary(), 5, Rsi::default().kind).unwrap();
        assert_eq!(rsi_of_macd.primary(), &direct);
    }

    #[test]
    fn chained_source_must_be_aligned() {
        let engine = engine();
        let short = Series::from(vec![1.0, 2.0]);
        assert!(matches!(
            engine.run_chained(&IndicatorSpec::Rsi(Rsi::default()), &short),
            Err(IndicatorError::LengthMismatch { .. })
        ));
    }

    // ---- batches -----------------------------------------------------------

    #[test]
    fn sequential_batch_isolates_failures() {
        let engine = engine();
        let outcomes = engine.run_sequential(&[
            IndicatorSpec::Rsi(Rsi::default()),
            IndicatorSpec::Macd(Macd::new(26, 12, 9)),
            IndicatorSpec::Roc(Roc::default()),
        ]);
        let ok: Vec<bool> = outcomes.iter().map(BatchOutcome::is_ok).collect();
        assert_eq!(ok, vec![true, false, true]);
    }

    #[tokio::test]
    async fn parallel_batch_matches_sequential() {
        let specs = vec![
            IndicatorSpec::Rsi(Rsi::default()),
            IndicatorSpec::Macd(Macd::default()),
            IndicatorSpec::Roc(Roc::new(0)),
            IndicatorSpec::Roc(Roc::default()),
        ];
        let parallel = engine().run_batch(specs.clone()).await;
        let sequential = engine().run_sequential(&specs);

        assert_eq!(parallel.len(), specs.len());
        for (p, s) in parallel.iter().zip(sequential.iter()) {
            assert_eq!(p.spec, s.spec);
            match (&p.result, &s.result) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(a), Err(b)) => assert_eq!(a, b),
                _ => panic!("outcome differs for {}", p.spec.name()),
            }
        }
    }
}
