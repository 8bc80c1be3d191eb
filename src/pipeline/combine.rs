// =============================================================================
// Per-bar combinators
// =============================================================================
//
// Scalar arithmetic between bar-aligned series.  Divisions take an explicit
// default so no combination ever yields NaN or infinity.

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;

/// `numerator / denominator`, or `default` when the quotient is not finite.
pub fn safe_div(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        return default;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        default
    }
}

/// `a[i] - b[i]`.
pub fn difference(a: &[f64], b: &[f64]) -> Result<Series> {
    IndicatorError::check_aligned("difference", a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| x - y).collect())
}

/// `numerator[i] / denominator[i]`, `default` on a zero denominator.
pub fn ratio(numerator: &[f64], denominator: &[f64], default: f64) -> Result<Series> {
    IndicatorError::check_aligned("ratio", numerator.len(), denominator.len())?;
    Ok(numerator
        .iter()
        .zip(denominator.iter())
        .map(|(&n, &d)| safe_div(n, d, default))
        .collect())
}

/// `sum_k weight_k * series_k[i]`.
///
/// # Errors
/// `LengthMismatch` when the terms are not all the same length.
pub fn weighted_sum(terms: &[(f64, &[f64])]) -> Result<Series> {
    let Some((_, first)) = terms.first() else {
        return Ok(Series::new(Vec::new()));
    };
    let len = first.len();
    for (_, series) in terms {
        IndicatorError::check_aligned("weighted sum", len, series.len())?;
    }
    Ok((0..len)
        .map(|i| terms.iter().map(|(w, s)| w * s[i]).sum())
        .collect())
}

/// Clamp every value into `[lo, hi]`.
pub fn clamp(series: &[f64], lo: f64, hi: f64) -> Series {
    series.iter().map(|&v| v.max(lo).min(hi)).collect()
}
