// =============================================================================
// Linearly weighted moving averages (WMA, Hull)
// =============================================================================
//
// Window values v_1 (oldest) .. v_k (newest), k = min(length, i + 1).
// Weights run length, length - 1, ... down to length - k + 1 (newest first),
// normalised by the sum of the weights actually used.
//
// Incremental update, valid both during warm-up and once full:
//   N' = N - S + length * x      (S = window sum before x is pushed)
// N is recomputed from the window once every `length` bars so rounding in the
// update never accumulates past one window.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;
use crate::rolling::{RollingStat, RollingWindow};

/// Linearly weighted average, newest value weighted `length`.
///
/// # Edge cases
/// - Fewer than `length` values: the weights actually used are renormalised,
///   so bar 0 returns the first value
/// - `length == 1`: identity
///
/// # Errors
/// `InvalidLength` when `length == 0`.
pub fn wma(series: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_length("wma", length)?;
    let mut window = RollingWindow::new(length, RollingStat::Sum)?;
    let top = length as f64;
    let mut numerator = 0.0_f64;

    let mut result = Series::with_capacity(series.len());
    for (i, &x) in series.iter().enumerate() {
        numerator = numerator - window.sum() + top * x;
        window.push(x);
        if (i + 1) % length == 0 {
            numerator = weighted_numerator(&series[(i + 1).saturating_sub(length)..=i], top);
        }

        let k = window.len() as f64;
        let weight_sum = k * (2.0 * top - k + 1.0) / 2.0;
        result.push(numerator / weight_sum);
    }
    Ok(result)
}

fn weighted_numerator(window: &[f64], top: f64) -> f64 {
    window
        .iter()
        .rev()
        .enumerate()
        .map(|(offset, &v)| (top - offset as f64) * v)
        .sum()
}

/// Hull MA: `WMA(2 * WMA(x, n / 2) - WMA(x, n), round(sqrt(n)))`.
///
/// Inner lengths are floored at 1, so `hull(x, 1)` is the identity.
pub fn hull(series: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_length("hull", length)?;
    let half = (length / 2).max(1);
    let root = ((length as f64).sqrt().round() as usize).max(1);

    let fast = wma(series, half)?;
    let slow = wma(series, length)?;
    let raw = fast.zip_with(&slow, "hull", |f, s| 2.0 * f - s)?;
    wma(&raw, root)
}
