// Analysis records
// Plain serializable data: everything here is produced by src/analysis and carries no behaviour beyond accessors

pub mod confluence;
pub mod sentiment_result;
pub mod structure;
pub mod timeseries;
pub mod zones;

// Re-export key types for convenience
pub use confluence::{ClassCounts, ConfluenceResult, DominantSentiment, TimeframeAlignment};
pub use sentiment_result::{Component, Factor, SentimentResult, confidence_label};
pub use structure::{
    MarketStructureState, StructureAnalysis, StructureEvent, StructureEventKind, StructureLabel,
    SwingKind, SwingPoint, SwingPoints, TrendState,
};
pub use timeseries::OhlcvTimeSeries;
pub use zones::{
    FairValueGap, FibLevels, LiquidityKind, LiquidityZone, OrderBlock, PremiumDiscount,
    PremiumDiscountZone, PriceZone, StopHuntEvent, ZoneAnalysis, ZoneBias,
};
