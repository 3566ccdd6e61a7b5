use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::domain::{ClassScores, RiskLevel, SentimentClass, Signal, Timeframe};

/// Inputs fused by the sentiment aggregator.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Component {
    Trend,
    Momentum,
    Volatility,
    Volume,
    Smc,
}

/// One weighted vote in the final verdict.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Factor {
    pub component: Component,
    pub class: SentimentClass,
    pub confidence: f64,
    pub weight: f64,
    /// weight * confidence
    pub contribution: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SentimentResult {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub class: SentimentClass,
    pub confidence: f64,
    pub risk: RiskLevel,
    pub scores: ClassScores,
    /// Highest of the three class scores before confidence scoring
    pub raw_score: f64,
    /// Ranked by contribution, largest first
    pub factors: Vec<Factor>,
    /// Ranked by priority
    pub insights: Vec<String>,
    pub smc_signal: Signal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regime_warning: Option<String>,
    pub price: f64,
    /// Timestamp of the last bar in the evaluated window
    pub timestamp_ms: i64,
}

impl SentimentResult {
    pub fn confidence_label(&self) -> &'static str {
        confidence_label(self.confidence)
    }

    /// Sum of factor contributions, capped at 1.
    pub fn signal_strength(&self) -> f64 {
        self.factors
            .iter()
            .map(|f| f.contribution)
            .sum::<f64>()
            .min(1.0)
    }

    pub fn summary(&self) -> String {
        let strength = if self.confidence > 0.75 {
            "high"
        } else if self.confidence > 0.60 {
            "moderate"
        } else {
            "low"
        };

        let mut text = format!(
            "{} sentiment with {} confidence ({:.0}%). Risk level: {}.",
            self.class,
            strength,
            self.confidence * 100.0,
            self.risk
        );
        if let Some(first) = self.insights.first() {
            text.push_str(" Key insight: ");
            text.push_str(first);
        }
        text
    }
}

pub fn confidence_label(confidence: f64) -> &'static str {
    match confidence {
        c if c >= 0.85 => "VERY HIGH",
        c if c >= 0.70 => "HIGH",
        c if c >= 0.55 => "MODERATE",
        c if c >= 0.40 => "LOW",
        _ => "VERY LOW",
    }
}
