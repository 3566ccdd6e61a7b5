use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Timeframe;

/// Multi-timeframe confluence settings. D1 is the primary frame, H4 secondary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MtfConfig {
    pub weights: BTreeMap<Timeframe, f64>,
    // Weight for any timeframe missing from `weights`
    pub fallback_weight: f64,
    pub alignment_threshold: f64,
    pub alignment_bonus: f64,
    pub strong_confluence_threshold: f64,
    pub max_suggestions: usize,
    // Evaluate timeframes on the rayon pool; results are identical either way
    pub parallel: bool,
}

impl MtfConfig {
    pub fn weight_for(&self, timeframe: Timeframe) -> f64 {
        self.weights
            .get(&timeframe)
            .copied()
            .unwrap_or(self.fallback_weight)
    }
}

impl Default for MtfConfig {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (Timeframe::M15, 0.10),
                (Timeframe::H1, 0.20),
                (Timeframe::H4, 0.30),
                (Timeframe::D1, 0.40),
            ]),
            fallback_weight: 0.25,
            alignment_threshold: 0.70,
            alignment_bonus: 0.15,
            strong_confluence_threshold: 0.70,
            max_suggestions: 5,
            parallel: true,
        }
    }
}
