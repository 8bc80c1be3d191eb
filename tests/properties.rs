use aurora_indicators::indicators::rsi::rsi;
use aurora_indicators::moving_average::{self, MovingAverageKind};
use aurora_indicators::rolling::{rolling, rolling_variance_around};
use aurora_indicators::{run_named, BarSeries, IndicatorInputs, IndicatorSpec, RollingStat};
use proptest::prelude::*;
use serde_json::json;

fn finite_series(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e4..1.0e4f64, 0..max_len)
}

/// Concatenated runs of constants, values near 1e6, and values near 0.
fn mixed_magnitude_series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            (-1.0e4..1.0e4f64, 1usize..30).prop_map(|(c, n)| vec![c; n]),
            prop::collection::vec(1.0e6..1.0e6 + 1.0e3f64, 1..40),
            prop::collection::vec(-1.0..1.0f64, 1..40),
        ],
        0..12,
    )
    .prop_map(|runs| runs.concat())
}

fn trailing(values: &[f64], i: usize, length: usize) -> &[f64] {
    &values[(i + 1).saturating_sub(length)..=i]
}

fn naive_variance_around(window: &[f64], mean: f64) -> f64 {
    window.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / window.len() as f64
}

fn naive_wma(window: &[f64], length: usize) -> f64 {
    let (mut num, mut den) = (0.0, 0.0);
    for (offset, &v) in window.iter().rev().enumerate() {
        let w = (length - offset) as f64;
        num += w * v;
        den += w;
    }
    num / den
}

fn naive_wma_series(values: &[f64], length: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| naive_wma(trailing(values, i, length), length))
        .collect()
}

fn close_enough(got: f64, expected: f64) -> bool {
    (got - expected).abs() <= 1e-9 + 1e-7 * expected.abs()
}

proptest! {
    #[test]
    fn rolling_average_matches_trailing_mean(
        values in finite_series(200),
        length in prop::sample::select(vec![1usize, 3, 20]),
    ) {
        let avg = rolling(&values, length, RollingStat::Average).unwrap();
        prop_assert_eq!(avg.len(), values.len());
        for i in 0..values.len() {
            let start = (i + 1).saturating_sub(length);
            let window = &values[start..=i];
            let expected = window.iter().sum::<f64>() / window.len() as f64;
            prop_assert!((avg[i] - expected).abs() < 1e-6, "index {}: {} vs {}", i, avg[i], expected);
        }
    }

    #[test]
    fn rolling_variance_matches_trailing_recomputation(
        values in mixed_magnitude_series(),
        length in prop::sample::select(vec![1usize, 3, 20]),
    ) {
        let var = rolling(&values, length, RollingStat::Variance).unwrap();
        let sd = rolling(&values, length, RollingStat::StdDev).unwrap();
        prop_assert_eq!(var.len(), values.len());
        for i in 0..values.len() {
            let window = trailing(&values, i, length);
            let mean = window.iter().sum::<f64>() / window.len() as f64;
            let expected = naive_variance_around(window, mean);
            prop_assert!(close_enough(var[i], expected), "index {}: {} vs {}", i, var[i], expected);
            prop_assert!(close_enough(sd[i], expected.sqrt()), "index {}: {} vs {}", i, sd[i], expected.sqrt());
            if window.iter().all(|&v| v == window[0]) {
                prop_assert_eq!(var[i], 0.0);
            }
        }
    }

    #[test]
    fn rolling_variance_around_matches_trailing_recomputation(
        values in mixed_magnitude_series(),
        length in prop::sample::select(vec![1usize, 3, 20]),
    ) {
        let means = moving_average::ema(&values, length).unwrap();
        let var = rolling_variance_around(&values, &means, length).unwrap();
        for i in 0..values.len() {
            let expected = naive_variance_around(trailing(&values, i, length), means[i]);
            prop_assert!(close_enough(var[i], expected), "index {}: {} vs {}", i, var[i], expected);
        }
    }

    #[test]
    fn wma_matches_trailing_recomputation(
        values in finite_series(200),
        length in prop::sample::select(vec![1usize, 3, 20]),
    ) {
        let out = moving_average::wma(&values, length).unwrap();
        let expected = naive_wma_series(&values, length);
        for i in 0..values.len() {
            prop_assert!((out[i] - expected[i]).abs() < 1e-6, "index {}: {} vs {}", i, out[i], expected[i]);
        }
    }

    #[test]
    fn hull_matches_composed_recomputation(
        values in finite_series(200),
        length in prop::sample::select(vec![1usize, 3, 20]),
    ) {
        let half = (length / 2).max(1);
        let root = ((length as f64).sqrt().round() as usize).max(1);
        let fast = naive_wma_series(&values, half);
        let slow = naive_wma_series(&values, length);
        let raw: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| 2.0 * f - s).collect();
        let expected = naive_wma_series(&raw, root);

        let out = moving_average::hull(&values, length).unwrap();
        for i in 0..values.len() {
            prop_assert!((out[i] - expected[i]).abs() < 1e-6, "index {}: {} vs {}", i, out[i], expected[i]);
        }
    }

    #[test]
    fn rolling_min_max_are_exact(
        values in finite_series(120),
        length in 1usize..15,
    ) {
        let mins = rolling(&values, length, RollingStat::Min).unwrap();
        let maxs = rolling(&values, length, RollingStat::Max).unwrap();
        for i in 0..values.len() {
            let window = &values[(i + 1).saturating_sub(length)..=i];
            prop_assert_eq!(mins[i], window.iter().cloned().fold(f64::INFINITY, f64::min));
            prop_assert_eq!(maxs[i], window.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
        }
    }

    #[test]
    fn ema_length_one_is_identity(values in finite_series(100)) {
        let out = moving_average::ema(&values, 1).unwrap();
        prop_assert_eq!(out.as_slice(), values.as_slice());
    }

    #[test]
    fn constant_series_stays_constant(
        c in -1.0e3..1.0e3f64,
        n in 1usize..60,
        length in 1usize..30,
    ) {
        let values = vec![c; n];
        for kind in [MovingAverageKind::Simple, MovingAverageKind::Exponential, MovingAverageKind::Weighted] {
            let out = moving_average::apply(kind, length, &values).unwrap();
            prop_assert!(out.iter().all(|&v| (v - c).abs() < 1e-9), "{:?}", kind);
        }
    }

    #[test]
    fn rsi_is_bounded(values in finite_series(150), length in 1usize..30) {
        let out = rsi(&values, length, MovingAverageKind::Wilder).unwrap();
        prop_assert_eq!(out.len(), values.len());
        prop_assert!(out.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn every_indicator_is_bar_aligned(closes in prop::collection::vec(1.0..500.0f64, 0..80)) {
        let bars = BarSeries::from_closes(&closes).unwrap();
        let inputs = IndicatorInputs::new(&bars);
        for name in IndicatorSpec::NAMES {
            let result = run_named(name, json!({}), &inputs).unwrap();
            prop_assert_eq!(result.signals().len(), closes.len());
            for channel in result.channels() {
                prop_assert_eq!(channel.values.len(), closes.len());
                prop_assert!(channel.values.iter().all(|v| v.is_finite()));
            }
        }
    }
}
