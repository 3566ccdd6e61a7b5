//! Shapes of the signals this crate consumes from external collaborators.
//!
//! Indicator math (moving averages, oscillators, ATR...) and regime detection
//! live outside this crate. They hand their verdicts over as these records.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::sentiment::SentimentClass;

/// One indicator family's verdict (trend, momentum, volatility or volume).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndicatorSignal {
    pub class: SentimentClass,
    pub confidence: f64,
    #[serde(default)]
    pub indicators: Vec<SubIndicator>,
}

impl IndicatorSignal {
    pub fn new(class: SentimentClass, confidence: f64) -> Self {
        Self {
            class,
            confidence,
            indicators: Vec::new(),
        }
    }

    pub fn with_indicator(mut self, indicator: SubIndicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    pub fn find(&self, name: &str) -> Option<&SubIndicator> {
        self.indicators
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubIndicator {
    pub name: String,
    pub class: SentimentClass,
    pub strength: f64,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityLevel {
    Low,
    Normal,
    High,
}

/// Everything the technical-indicator layer reports for one window of bars.
/// Missing families are simply left out of the fusion.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TechnicalSignals {
    pub trend: Option<IndicatorSignal>,
    pub momentum: Option<IndicatorSignal>,
    pub volatility: Option<IndicatorSignal>,
    pub volume: Option<IndicatorSignal>,
    pub volatility_level: Option<VolatilityLevel>,
}

impl TechnicalSignals {
    /// RSI reading from the momentum family, if the provider supplied one.
    pub fn rsi(&self) -> Option<f64> {
        self.momentum.as_ref()?.find("RSI")?.value
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Favorability {
    Favorable,
    Moderate,
    Cautious,
    Unfavorable,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityRegime {
    VeryLow,
    Low,
    Normal,
    High,
    VeryHigh,
}

/// Market regime as classified by an external regime detector.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegimeContext {
    pub favorability: Favorability,
    pub trending: bool,
    pub trend_direction: SentimentClass,
    #[serde(default)]
    pub adx: Option<f64>,
    pub volatility: VolatilityRegime,
}
