//! Configuration module for the sentiment analyser.

pub mod analysis;
pub mod regime;
pub mod sentiment;
pub mod smc;
pub mod timeframes;

mod debug; // Private: use crate::config::PRINT_* not crate::config::debug::PRINT_*
pub use debug::{PRINT_CONFLUENCE, PRINT_SIGNAL_FUSION, PRINT_SWING_DETECTION, PRINT_ZONE_DETECTION};

// Re-export commonly used items
pub use analysis::AnalysisConfig;
pub use regime::RegimeSettings;
pub use sentiment::{ConfidenceWeights, SentimentConfig};
pub use smc::{
    DEFAULT_LIQUIDITY_TOLERANCE, DEFAULT_OB_IMPULSE_MULTIPLIER, DEFAULT_OB_MIN_BODY_RATIO,
    DEFAULT_SWING_LOOKBACK, SmcConfig,
};
pub use timeframes::MtfConfig;
