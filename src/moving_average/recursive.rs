// =============================================================================
// Recursive (exponential-family) moving averages
// =============================================================================
//
//   result_0 = x_0
//   result_t = result_{t-1} + alpha_t * (x_t - result_{t-1})
//
// EMA:    alpha = 2 / (length + 1)
// Wilder: alpha = 1 / length
// DEMA / TEMA chain the EMA over its own output.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;

/// EMA smoothing factor for `length`.
pub fn ema_alpha(length: usize) -> f64 {
    2.0 / (length as f64 + 1.0)
}

/// Wilder smoothing factor for `length`.
pub fn wilder_alpha(length: usize) -> f64 {
    1.0 / length as f64
}

/// Apply the recursion with a fixed `alpha` in `(0, 1]`.
///
/// # Errors
/// `InvalidParameter` if `alpha` is non-finite or outside `(0, 1]`.
pub fn smooth(series: &[f64], alpha: f64) -> Result<Series> {
    if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
        return Err(IndicatorError::InvalidParameter {
            param: "alpha",
            value: alpha,
            reason: "must lie in (0, 1]",
        });
    }
    Ok(recurse(series, |_| alpha))
}

/// Apply the recursion with a per-bar `alpha_at(i)`.
///
/// Callers guarantee `alpha_at(i)` lies in `[0, 1]`; the seed ignores it.
pub(crate) fn recurse(series: &[f64], alpha_at: impl Fn(usize) -> f64) -> Series {
    let mut result = Series::with_capacity(series.len());
    let Some(&seed) = series.first() else {
        return result;
    };
    result.push(seed);

    // A constant input stays exactly constant; alpha = 1 reproduces the input.
    let mut prev = seed;
    for (i, &x) in series.iter().enumerate().skip(1) {
        let alpha = alpha_at(i);
        let value = if alpha >= 1.0 {
            x
        } else {
            prev + alpha * (x - prev)
        };
        result.push(value);
        prev = value;
    }
    result
}

/// Exponential moving average, `alpha = 2 / (length + 1)`.
///
/// # Edge cases
/// - Bar 0 is seeded with the first value
/// - `length == 1`: identity
///
/// # Errors
/// `InvalidLength` when `length == 0`.
pub fn ema(series: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_length("ema", length)?;
    smooth(series, ema_alpha(length))
}

/// Wilder's smoothing (RMA), `alpha = 1 / length`, i.e.
/// `(prev * (length - 1) + x) / length`.
///
/// Seeded and validated like [`ema`].
pub fn wilder(series: &[f64], length: usize) -> Result<Series> {
    IndicatorError::check_length("wilder", length)?;
    smooth(series, wilder_alpha(length))
}

/// Double EMA: `2 * EMA - EMA(EMA)`.
pub fn dema(series: &[f64], length: usize) -> Result<Series> {
    let e1 = ema(series, length)?;
    let e2 = ema(&e1, length)?;
    e1.zip_with(&e2, "dema", |a, b| 2.0 * a - b)
}

/// Triple EMA: `3 * EMA - 3 * EMA(EMA) + EMA(EMA(EMA))`.
pub fn tema(series: &[f64], length: usize) -> Result<Series> {
    let e1 = ema(series, length)?;
    let e2 = ema(&e1, length)?;
    let e3 = ema(&e2, length)?;
    Ok(e1
        .iter()
        .zip(e2.iter())
        .zip(e3.iter())
        .map(|((&a, &b), &c)| 3.0 * a - 3.0 * b + c)
        .collect())
}
