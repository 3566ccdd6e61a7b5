use serde::{Deserialize, Serialize};

use crate::domain::Favorability;

/// Regime-aware adjustments. Both switches ship disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeSettings {
    /// Scale confidence by the favorability multiplier
    pub use_confidence_multiplier: bool,
    /// Halve confidence and attach a warning outside `allowed`
    pub filter_by_regime: bool,
    pub allowed: Vec<Favorability>,
    pub filtered_confidence_factor: f64,

    pub favorable_multiplier: f64,
    pub moderate_multiplier: f64,
    pub cautious_multiplier: f64,
    pub unfavorable_multiplier: f64,
}

impl RegimeSettings {
    pub fn multiplier(&self, favorability: Favorability) -> f64 {
        match favorability {
            Favorability::Favorable => self.favorable_multiplier,
            Favorability::Moderate => self.moderate_multiplier,
            Favorability::Cautious => self.cautious_multiplier,
            Favorability::Unfavorable => self.unfavorable_multiplier,
        }
    }
}

impl Default for RegimeSettings {
    fn default() -> Self {
        Self {
            use_confidence_multiplier: false,
            filter_by_regime: false,
            allowed: vec![Favorability::Favorable, Favorability::Moderate],
            filtered_confidence_factor: 0.5,
            favorable_multiplier: 1.0,
            moderate_multiplier: 0.7,
            cautious_multiplier: 0.4,
            unfavorable_multiplier: 0.0,
        }
    }
}
