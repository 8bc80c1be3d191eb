// =============================================================================
// Adaptive moving averages: EMA recursion with a per-bar alpha
// =============================================================================
//
// Kaufman (KAMA):
//   ER_t  = |x_t - x_{t-k}| / sum(|x_j - x_{j-1}|, last k bars),  k = min(length, t)
//   sc_t  = (ER_t * (fast - slow) + slow)^2
//   fast  = 2 / (2 + 1),  slow = 2 / (30 + 1)   (defaults)
//
// Chande VIDYA:
//   CMO_t   = (sum gains - sum losses) / (sum gains + sum losses), trailing `length`
//   alpha_t = 2 / (length + 1) * |CMO_t|
//
// Both efficiency measures default to 0 when their denominator is 0, which
// freezes the average instead of producing NaN on flat input.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;
use crate::moving_average::recursive::{ema_alpha, recurse};
use crate::rolling::{RollingStat, RollingWindow};

pub const KAMA_FAST_LENGTH: usize = 2;
pub const KAMA_SLOW_LENGTH: usize = 30;

/// Absolute bar-to-bar change, 0 on the first bar.
fn abs_changes(series: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    if !series.is_empty() {
        out.push(0.0);
    }
    out.extend(series.windows(2).map(|w| (w[1] - w[0]).abs()));
    out
}

/// Kaufman efficiency ratio in `[0, 1]`.
pub fn efficiency_ratio(series: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_length("efficiency ratio", length)?;
    let mut noise = RollingWindow::new(length, RollingStat::Sum)?;
    let changes = abs_changes(series);

    let x = Series::from(series);
    Ok(changes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let volatility = noise.push(c);
            let direction = (x[i] - x.lagged(i, length)).abs();
            if volatility > 0.0 {
                (direction / volatility).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .collect())
}

/// KAMA with the standard 2 / 30 fast and slow constants.
pub fn kama(series: &[f64], length: usize) -> Result<Series> {
    kaufman_adaptive(series, length, KAMA_FAST_LENGTH, KAMA_SLOW_LENGTH)
}

/// KAMA with custom fast / slow lengths.
pub fn kaufman_adaptive(
    series: &[f64],
    length: usize,
    fast_length: usize,
    slow_length: usize,
) -> Result<Series> {
    IndicatorError::check_length("kama fast", fast_length)?;
    IndicatorError::check_length("kama slow", slow_length)?;
    let er = efficiency_ratio(series, length)?;

    let fast = ema_alpha(fast_length);
    let slow = ema_alpha(slow_length);
    Ok(recurse(series, |i| {
        let sc = er[i] * (fast - slow) + slow;
        (sc * sc).clamp(0.0, 1.0)
    }))
}

/// Absolute Chande momentum over a trailing window, in `[0, 1]`.
fn abs_cmo(series: &[f64], length: usize) -> Result<Vec<f64>> {
    let mut gains = RollingWindow::new(length, RollingStat::Sum)?;
    let mut losses = RollingWindow::new(length, RollingStat::Sum)?;

    let mut out = Vec::with_capacity(series.len());
    let mut prev = series.first().copied().unwrap_or_default();
    for &x in series {
        let change = x - prev;
        prev = x;
        let up = gains.push(change.max(0.0));
        let down = losses.push((-change).max(0.0));
        let total = up + down;
        out.push(if total > 0.0 {
            ((up - down) / total).abs().min(1.0)
        } else {
            0.0
        });
    }
    Ok(out)
}

/// Variable Index Dynamic Average.
pub fn vidya(series: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_length("vidya", length)?;
    let cmo = abs_cmo(series, length)?;
    let alpha = ema_alpha(length);
    Ok(recurse(series, |i| alpha * cmo[i]))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- efficiency ratio --------------------------------------------------

    #[test]
    fn efficiency_ratio_is_one_on_straight_line() {
        let line: Vec<f64> = (0..20).map(|x| x as f64 * 2.0).collect();
        let er = efficiency_ratio(&line, 5).unwrap();
        assert_eq!(er[0], 0.0);
        for &v in &er[1..] {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn efficiency_ratio_is_low_on_noise() {
        let zigzag: Vec<f64> = (0..20).map(|x| if x % 2 == 0 { 1.0 } else { 2.0 }).collect();
        let er = efficiency_ratio(&zigzag, 10).unwrap();
        assert!(er[19] < 0.15, "got {}", er[19]);
    }

    // ---- kama --------------------------------------------------------------

    #[test]
    fn kama_tracks_strong_trend() {
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let out = kama(&data, 10).unwrap();
        assert_eq!(out.len(), data.len());
        assert_eq!(out[0], 100.0);
        assert!(out[49] > 140.0, "got {}", out[49]);
    }

    #[test]
    fn kama_constant_series() {
        assert!(kama(&[5.0; 30], 10).unwrap().iter().all(|&v| v == 5.0));
    }

    #[test]
    fn kama_rejects_zero_fast() {
        assert!(kaufman_adaptive(&[1.0, 2.0], 10, 0, 30).is_err());
    }

    // ---- vidya -------------------------------------------------------------

    #[test]
    fn vidya_constant_series() {
        assert!(vidya(&[3.0; 20], 9).unwrap().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn vidya_follows_monotonic_trend() {
        let data: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let out = vidya(&data, 9).unwrap();
        // |CMO| = 1 on a monotonic series, so VIDYA collapses to the EMA.
        let ema = crate::moving_average::recursive::ema(&data, 9).unwrap();
        for i in 0..data.len() {
            assert!((out[i] - ema[i]).abs() < 1e-9);
        }
    }
}
