// Domain types and value objects
pub mod candle;
pub mod sentiment;
pub mod signals;
pub mod timeframe;

// Re-export commonly used types
pub use candle::{Candle, CandleType};
pub use sentiment::{
    ClassScores, RiskLevel, SentimentClass, Signal, SignalComponent, VoteSource,
};
pub use signals::{
    Favorability, IndicatorSignal, RegimeContext, SubIndicator, TechnicalSignals,
    VolatilityLevel, VolatilityRegime,
};
pub use timeframe::Timeframe;
