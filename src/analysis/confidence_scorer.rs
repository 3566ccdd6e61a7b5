use serde::Serialize;

use crate::config::ConfidenceWeights;
use crate::domain::{SentimentClass, TechnicalSignals};
use crate::models::Factor;
use crate::utils::maths_utils::{clamp_unit, weighted_average};

/// The five sub-scores behind a confidence value, kept for diagnostics.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBreakdown {
    pub raw_strength: f64,
    pub agreement: f64,
    pub clarity: f64,
    pub volatility: f64,
    pub volume: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    weights: ConfidenceWeights,
}

impl ConfidenceScorer {
    pub fn new(weights: &ConfidenceWeights) -> Self {
        Self {
            weights: weights.clone(),
        }
    }

    /// Weighted blend of signal strength, factor agreement, factor clarity,
    /// volatility regime and volume confirmation. Always within [0, 1].
    pub fn score(
        &self,
        class: SentimentClass,
        raw_score: f64,
        factors: &[Factor],
        signals: &TechnicalSignals,
    ) -> ConfidenceBreakdown {
        let w = &self.weights;

        let raw_strength = clamp_unit(raw_score);
        let (agreement, clarity) = if factors.is_empty() {
            (w.empty_factor_score, w.empty_factor_score)
        } else {
            let total = factors.len() as f64;
            let agreeing = factors.iter().filter(|f| f.class == class).count() as f64;
            let neutral = factors
                .iter()
                .filter(|f| f.class == SentimentClass::Neutral)
                .count() as f64;
            (agreeing / total, 1.0 - neutral / total)
        };
        let volatility = w.volatility_score(signals.volatility_level);
        let volume = match signals.volume.as_ref().map(|v| v.class) {
            Some(volume_class) if volume_class == class => w.volume_confirms,
            Some(SentimentClass::Neutral) | None => w.volume_neutral,
            Some(_) => w.volume_diverges,
        };

        let confidence = clamp_unit(weighted_average(
            &[
                (raw_strength, w.raw_strength),
                (agreement, w.agreement),
                (clarity, w.clarity),
                (volatility, w.volatility),
                (volume, w.volume),
            ],
            0.0,
        ));

        ConfidenceBreakdown {
            raw_strength,
            agreement,
            clarity,
            volatility,
            volume,
            confidence,
        }
    }
}
