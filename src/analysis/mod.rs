// Detectors and signal fusion, leaves first
pub mod structure_detector;
pub mod zone_detector;
pub mod smc_signal;
pub mod confidence_scorer;
pub mod sentiment_engine;
pub mod multi_timeframe;

pub mod error;
pub mod indicators;

// Re-export commonly used types
pub use confidence_scorer::{ConfidenceBreakdown, ConfidenceScorer};
pub use error::AnalysisError;
pub use indicators::{IndicatorProvider, NoIndicators, StaticIndicators};
pub use multi_timeframe::MultiTimeframeAnalyzer;
pub use sentiment_engine::SentimentEngine;
pub use smc_signal::{SmcAnalysis, SmcAnalyzer};
pub use structure_detector::StructureDetector;
pub use zone_detector::ZoneDetector;
