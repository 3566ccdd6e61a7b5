use serde::{Deserialize, Serialize};

use crate::domain::VolatilityLevel;

/// Component weights of the sentiment fusion. Defaults sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub trend_weight: f64,
    pub momentum_weight: f64,
    pub volatility_weight: f64,
    pub volume_weight: f64,
    pub smc_weight: f64,

    // Symmetric thresholds
    pub bullish_threshold: f64,
    pub bearish_threshold: f64,

    // Below this confidence the result carries a risk flag
    pub risk_confidence_floor: f64,

    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub max_insights: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            trend_weight: 0.20,
            momentum_weight: 0.20,
            volatility_weight: 0.10,
            volume_weight: 0.15,
            smc_weight: 0.35,
            bullish_threshold: 0.35,
            bearish_threshold: 0.35,
            risk_confidence_floor: 0.60,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            max_insights: 5,
        }
    }
}

/// Sub-score weights and lookup tables of the confidence scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub raw_strength: f64,
    pub agreement: f64,
    pub clarity: f64,
    pub volatility: f64,
    pub volume: f64,

    // Used when there are no contributing factors at all
    pub empty_factor_score: f64,

    pub volatility_normal: f64,
    pub volatility_low: f64,
    pub volatility_high: f64,
    pub volatility_missing: f64,

    pub volume_confirms: f64,
    pub volume_neutral: f64,
    pub volume_diverges: f64,
}

impl ConfidenceWeights {
    pub fn volatility_score(&self, level: Option<VolatilityLevel>) -> f64 {
        match level {
            Some(VolatilityLevel::Normal) => self.volatility_normal,
            Some(VolatilityLevel::Low) => self.volatility_low,
            Some(VolatilityLevel::High) => self.volatility_high,
            None => self.volatility_missing,
        }
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            raw_strength: 0.30,
            agreement: 0.25,
            clarity: 0.20,
            volatility: 0.15,
            volume: 0.10,
            empty_factor_score: 0.5,
            volatility_normal: 0.9,
            volatility_low: 0.7,
            volatility_high: 0.5,
            volatility_missing: 0.7,
            volume_confirms: 1.0,
            volume_neutral: 0.6,
            volume_diverges: 0.3,
        }
    }
}
