// =============================================================================
// Indicator Result Container
// =============================================================================
//
// Ordered named channels, one designated primary channel, and one signal per
// bar.  Every channel and the signal series share the bar count; the builder
// enforces this so a finished result can be chained without further checks.
// Deserialized results go through the same builder.

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::Series;
use crate::types::Signal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub values: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIndicatorResult")]
pub struct IndicatorResult {
    indicator: String,
    primary: usize,
    channels: Vec<Channel>,
    signals: Vec<Signal>,
}

impl IndicatorResult {
    pub fn builder(indicator: impl Into<String>, len: usize) -> IndicatorResultBuilder {
        IndicatorResultBuilder::new(indicator, len)
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// The chainable output.
    pub fn primary(&self) -> &Series {
        &self.channels[self.primary].values
    }

    pub fn primary_name(&self) -> &str {
        &self.channels[self.primary].name
    }

    pub fn channel(&self, name: &str) -> Option<&Series> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.values)
    }

    /// Like [`channel`](Self::channel) but reports a missing name as an error.
    pub fn require_channel(&self, name: &str) -> Result<&Series> {
        self.channel(name)
            .ok_or_else(|| IndicatorError::MissingChannel(name.to_string()))
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn last_signal(&self) -> Option<Signal> {
        self.signals.last().copied()
    }

    /// Number of bars covered.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Wire form of [`IndicatorResult`], validated on the way in.
#[derive(Deserialize)]
struct RawIndicatorResult {
    indicator: String,
    primary: usize,
    channels: Vec<Channel>,
    signals: Vec<Signal>,
}

impl TryFrom<RawIndicatorResult> for IndicatorResult {
    type Error = IndicatorError;

    fn try_from(raw: RawIndicatorResult) -> Result<Self> {
        let primary = raw
            .channels
            .get(raw.primary)
            .map(|c| c.name.clone())
            .ok_or_else(|| IndicatorError::MissingChannel(format!("#{}", raw.primary)))?;
        let mut builder = IndicatorResultBuilder::new(raw.indicator, raw.signals.len());
        for channel in raw.channels {
            builder = builder.channel(channel.name, channel.values)?;
        }
        builder.primary(primary).signals(raw.signals)?.build()
    }
}

/// Collects channels and signals, validating lengths as they arrive.
#[derive(Debug, Clone)]
pub struct IndicatorResultBuilder {
    indicator: String,
    len: usize,
    primary: Option<String>,
    channels: Vec<Channel>,
    signals: Option<Vec<Signal>>,
}

impl IndicatorResultBuilder {
    pub fn new(indicator: impl Into<String>, len: usize) -> Self {
        Self {
            indicator: indicator.into(),
            len,
            primary: None,
            channels: Vec::new(),
            signals: None,
        }
    }

    /// Append a channel.  The first channel is primary unless
    /// [`primary`](Self::primary) names another.
    pub fn channel(mut self, name: impl Into<String>, values: Series) -> Result<Self> {
        IndicatorError::check_aligned("result channel", self.len, values.len())?;
        let name = name.into();
        match self.channels.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.channels.push(Channel { name, values }),
        }
        Ok(self)
    }

    pub fn primary(mut self, name: impl Into<String>) -> Self {
        self.primary = Some(name.into());
        self
    }

    pub fn signals(mut self, signals: Vec<Signal>) -> Result<Self> {
        IndicatorError::check_aligned("result signals", self.len, signals.len())?;
        self.signals = Some(signals);
        Ok(self)
    }

    /// # Errors
    /// `MissingChannel` when there are no channels, the primary name is not a
    /// channel, or no signal series was supplied.
    pub fn build(self) -> Result<IndicatorResult> {
        let primary = match &self.primary {
            Some(name) => self
                .channels
                .iter()
                .position(|c| &c.name == name)
                .ok_or_else(|| IndicatorError::MissingChannel(name.clone()))?,
            None if self.channels.is_empty() => {
                return Err(IndicatorError::MissingChannel("primary".to_string()))
            }
            None => 0,
        };
        let signals = self
            .signals
            .ok_or_else(|| IndicatorError::MissingChannel("signals".to_string()))?;

        Ok(IndicatorResult {
            indicator: self.indicator,
            primary,
            channels: self.channels,
            signals,
        })
    }
}
