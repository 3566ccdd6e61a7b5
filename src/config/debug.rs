//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so debug
//! builds stay quiet. Every flag is further gated by `cfg(debug_assertions)`.

/// Emit swing counts and the classified structure for every analysed window.
pub const PRINT_SWING_DETECTION: bool = false;

/// Emit per-window counts of order blocks, gaps, liquidity zones and stop hunts.
pub const PRINT_ZONE_DETECTION: bool = false;

/// Emit the class scores, confidence sub-scores and risk flags of each fusion.
pub const PRINT_SIGNAL_FUSION: bool = false;

/// Emit alignment and dominance details of multi-timeframe confluence.
pub const PRINT_CONFLUENCE: bool = false;
