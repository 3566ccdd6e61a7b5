//! Analysis and computation configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::regime::RegimeSettings;
use super::sentiment::{ConfidenceWeights, SentimentConfig};
use super::smc::SmcConfig;
use super::timeframes::MtfConfig;

/// The Master Analysis Configuration
///
/// Every numeric constant used by the detectors and fusing stages lives in one
/// of these sub-groups. Missing fields in a JSON override fall back to the
/// defaults, so a file only needs to name what it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub smc: SmcConfig,
    pub sentiment: SentimentConfig,
    pub confidence: ConfidenceWeights,
    pub regime: RegimeSettings,
    pub mtf: MtfConfig,
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse analysis config")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("Invalid config in {}", path.display()))
    }
}
