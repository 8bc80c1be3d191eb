// =============================================================================
// Indicator Errors
// =============================================================================
//
// Only configuration problems surface as errors.  Degenerate arithmetic and
// cold-start bars are resolved inside each formula and never reach the caller.

use thiserror::Error;

/// Errors raised while building or running an indicator pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// A window or smoothing length of zero.
    #[error("invalid length for {context}: {length} (must be >= 1)")]
    InvalidLength { context: &'static str, length: usize },

    /// A floating-point parameter outside its domain.
    #[error("invalid parameter {param} = {value}: {reason}")]
    InvalidParameter {
        param: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Two series that must be bar-aligned have different lengths.
    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A bar field is NaN or infinite.
    #[error("non-finite {field} at bar {index}")]
    NonFiniteInput { index: usize, field: &'static str },

    /// Name dispatch found no such indicator.
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Parameters could not be decoded for the requested indicator.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The designated primary channel was never added to the result.
    #[error("missing channel: {0}")]
    MissingChannel(String),

    /// A batch worker panicked or was cancelled.
    #[error("indicator task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, IndicatorError>;

impl IndicatorError {
    /// Reject a zero length for the named stage.
    pub fn check_length(context: &'static str, length: usize) -> Result<usize> {
        if length == 0 {
            Err(IndicatorError::InvalidLength { context, length })
        } else {
            Ok(length)
        }
    }

    /// Reject a pair of lengths that are not equal.
    pub fn check_aligned(context: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(IndicatorError::LengthMismatch {
                context,
                expected,
                actual,
            })
        }
    }

    /// Reject a non-finite float parameter.
    pub fn check_finite(param: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(IndicatorError::InvalidParameter {
                param,
                value,
                reason: "must be finite",
            })
        }
    }
}
