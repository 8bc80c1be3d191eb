// =============================================================================
// Shared types used across the indicator core
// =============================================================================

use serde::{Deserialize, Serialize};

/// Categorical trade signal emitted once per bar.
///
/// `StrongBullish` / `StrongBearish` are only produced by rules that detect an
/// extreme (band crossings) or an emphasised crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

impl Default for Signal {
    fn default() -> Self {
        Self::Neutral
    }
}

impl Signal {
    /// Mirror the signal, used by rules where a falling series is bullish.
    pub fn inverted(self) -> Self {
        match self {
            Self::StrongBullish => Self::StrongBearish,
            Self::Bullish => Self::Bearish,
            Self::Neutral => Self::Neutral,
            Self::Bearish => Self::Bullish,
            Self::StrongBearish => Self::StrongBullish,
        }
    }

    pub fn is_bullish(self) -> bool {
        matches!(self, Self::StrongBullish | Self::Bullish)
    }

    pub fn is_bearish(self) -> bool {
        matches!(self, Self::StrongBearish | Self::Bearish)
    }

    /// +1.0 for bullish, -1.0 for bearish, 0.0 for neutral.
    pub fn direction(self) -> f64 {
        if self.is_bullish() {
            1.0
        } else if self.is_bearish() {
            -1.0
        } else {
            0.0
        }
    }

    /// The Buy / Sell / Hold equivalent of this signal.
    pub fn action(self) -> &'static str {
        if self.is_bullish() {
            "BUY"
        } else if self.is_bearish() {
            "SELL"
        } else {
            "HOLD"
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBullish => write!(f, "StrongBullish"),
            Self::Bullish => write!(f, "Bullish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Bearish => write!(f, "Bearish"),
            Self::StrongBearish => write!(f, "StrongBearish"),
        }
    }
}
