use thiserror::Error;

use crate::domain::Timeframe;

/// Failures of the analysis entry points. Thin data never lands here: it
/// degrades to an undefined structure and a neutral, low-confidence verdict.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no bars to analyse for {symbol} {timeframe}")]
    EmptySeries { symbol: String, timeframe: Timeframe },

    #[error("no timeframe with data to analyse for {symbol}")]
    NoTimeframeData { symbol: String },
}
