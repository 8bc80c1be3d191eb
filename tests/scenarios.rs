use std::sync::Arc;

use aurora_indicators::indicators::{Bollinger, Macd, MovingAverageTrend, Rsi};
use aurora_indicators::moving_average;
use aurora_indicators::rolling::rolling;
use aurora_indicators::{
    run_named, BarSeries, IndicatorEngine, IndicatorError, IndicatorInputs, IndicatorSpec,
    MovingAverageKind, RollingStat, Signal,
};
use serde_json::json;

fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.35).sin() * 6.0 + i as f64 * 0.1)
        .collect()
}

// ---- end-to-end --------------------------------------------------------------

#[test]
fn sma_trend_flips_once_at_index_three() {
    let bars = BarSeries::from_closes(&[10.0, 11.0, 12.0, 11.0, 10.0]).unwrap();
    let result = run_named(
        "MovingAverage",
        json!({ "kind": "Simple", "length": 3 }),
        &IndicatorInputs::new(&bars),
    )
    .unwrap();

    let expected = [10.0, 10.5, 11.0, 34.0 / 3.0, 11.0];
    for (a, b) in result.primary().iter().zip(expected.iter()) {
        assert!((a - b).abs() < 1e-9, "got {a}, expected {b}");
    }

    let signals = result.signals();
    assert_eq!(
        signals,
        &[
            Signal::Neutral,
            Signal::Bullish,
            Signal::Bullish,
            Signal::Bearish,
            Signal::Bearish
        ]
    );
    let flips: Vec<usize> = (1..signals.len())
        .filter(|&i| signals[i - 1] == Signal::Bullish && signals[i] == Signal::Bearish)
        .collect();
    assert_eq!(flips, vec![3]);
}

#[test]
fn constant_closes_are_quiet() {
    let closes = [5.0; 10];
    let bars = BarSeries::from_closes(&closes).unwrap();

    for length in [1, 3, 7, 20] {
        let ema = moving_average::ema(&closes, length).unwrap();
        assert!(ema.iter().all(|&v| v == 5.0), "EMA({length})");

        let variance = rolling(&closes, length, RollingStat::Variance).unwrap();
        assert!(variance.iter().all(|&v| v == 0.0), "variance({length})");

        let spec = IndicatorSpec::MovingAverage(MovingAverageTrend::new(
            MovingAverageKind::Exponential,
            length,
        ));
        let result = aurora_indicators::run_indicator(&spec, &IndicatorInputs::new(&bars)).unwrap();
        assert!(result.signals().iter().all(|&s| s == Signal::Neutral));
    }
}

#[test]
fn empty_bar_series_is_valid() {
    let bars = BarSeries::default();
    let result = run_named("Macd", json!({}), &IndicatorInputs::new(&bars)).unwrap();
    assert!(result.is_empty());
    assert!(result.primary().is_empty());
    assert_eq!(result.last_signal(), None);
}

#[test]
fn non_finite_bar_is_rejected_at_ingest() {
    assert!(matches!(
        BarSeries::from_closes(&[1.0, f64::NAN, 3.0]),
        Err(IndicatorError::NonFiniteInput { index: 1, .. })
    ));
}

// ---- chaining ----------------------------------------------------------------

#[test]
fn rsi_over_macd_primary() {
    let bars = BarSeries::from_closes(&wave(80)).unwrap();
    let inputs = IndicatorInputs::new(&bars);
    let macd = run_named("Macd", json!({}), &inputs).unwrap();

    let chained = IndicatorInputs::with_source(&bars, macd.primary()).unwrap();
    let rsi = run_named("Rsi", json!({ "length": 9 }), &chained).unwrap();

    assert_eq!(rsi.len(), bars.len());
    assert!(rsi.primary().iter().all(|v| (0.0..=100.0).contains(v)));

    // Same as running the RSI formula directly over the MACD line.
    let direct = aurora_indicators::indicators::rsi::rsi(
        macd.primary(),
        9,
        MovingAverageKind::Wilder,
    )
    .unwrap();
    assert_eq!(rsi.primary(), &direct);
}

#[test]
fn bollinger_over_rsi_signal_line() {
    let bars = BarSeries::from_closes(&wave(60)).unwrap();
    let inputs = IndicatorInputs::new(&bars);
    let rsi = run_named("Rsi", json!({}), &inputs).unwrap();
    let signal_line = rsi.channel("Signal").unwrap();

    let chained = IndicatorInputs::with_source(&bars, signal_line).unwrap();
    let bands = run_named("Bollinger", json!({ "length": 10 }), &chained).unwrap();
    let upper = bands.channel("UpperBand").unwrap();
    let lower = bands.channel("LowerBand").unwrap();
    assert!(upper.iter().zip(lower.iter()).all(|(u, l)| u >= l));
}

// ---- determinism -------------------------------------------------------------

#[test]
fn rerun_is_byte_identical() {
    let bars = BarSeries::from_closes(&wave(120)).unwrap();
    let inputs = IndicatorInputs::new(&bars);
    for name in IndicatorSpec::NAMES {
        let a = run_named(name, json!({}), &inputs).unwrap();
        let b = run_named(name, json!({}), &inputs).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap(),
            "{name}"
        );
    }
}

#[test]
fn appending_bars_never_repaints_history() {
    let closes = wave(90);
    let full = BarSeries::from_closes(&closes).unwrap();
    let prefix = BarSeries::from_closes(&closes[..60]).unwrap();

    for name in IndicatorSpec::NAMES {
        let long = run_named(name, json!({}), &IndicatorInputs::new(&full)).unwrap();
        let short = run_named(name, json!({}), &IndicatorInputs::new(&prefix)).unwrap();
        for channel in short.channels() {
            let long_values = long.channel(&channel.name).unwrap();
            assert_eq!(&long_values[..60], channel.values.as_slice(), "{name}.{}", channel.name);
        }
        assert_eq!(&long.signals()[..60], short.signals(), "{name}");
    }
}

// ---- engine --------------------------------------------------------------------

#[tokio::test]
async fn batch_isolates_a_failing_indicator() {
    let bars = Arc::new(BarSeries::from_closes(&wave(100)).unwrap());
    let engine = IndicatorEngine::new(Arc::clone(&bars));

    let specs = vec![
        IndicatorSpec::Rsi(Rsi::default()),
        IndicatorSpec::Macd(Macd::new(20, 10, 9)),
        IndicatorSpec::Bollinger(Bollinger::default()),
        IndicatorSpec::Rsi(Rsi::default()),
    ];
    let outcomes = engine.run_batch(specs).await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(IndicatorError::InvalidParameter { param: "fast_length", .. })
    ));
    assert!(outcomes[2].is_ok());

    let first = outcomes[0].result.as_ref().unwrap();
    let repeat = outcomes[3].result.as_ref().unwrap();
    assert_eq!(first, repeat);
    assert_eq!(engine.cache_stats().entries, 2);
}

#[tokio::test]
async fn engine_results_match_direct_runs() {
    let bars = BarSeries::from_closes(&wave(70)).unwrap();
    let direct = run_named("Rsi", json!({}), &IndicatorInputs::new(&bars)).unwrap();

    let engine = IndicatorEngine::new(bars);
    let outcomes = engine
        .run_batch(vec![IndicatorSpec::Rsi(Rsi::default())])
        .await;
    assert_eq!(outcomes[0].result.as_ref().unwrap().as_ref(), &direct);
}
