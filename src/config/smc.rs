//! Smart-money-concepts detector settings.
//!
//! The tolerance constants here are empirically chosen; they carry no meaning
//! beyond what the detectors do with them.

use serde::{Deserialize, Serialize};

/// Bars either side of a candidate swing point
pub const DEFAULT_SWING_LOOKBACK: usize = 5;

/// Minimum body/range ratio of the candle that becomes an order block
pub const DEFAULT_OB_MIN_BODY_RATIO: f64 = 0.6;

/// Reaction candle body must exceed this multiple of the order-block body
pub const DEFAULT_OB_IMPULSE_MULTIPLIER: f64 = 1.5;

/// Relative tolerance for treating two swing prices as the same level (0.1%)
pub const DEFAULT_LIQUIDITY_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmcConfig {
    pub swing_lookback_left: usize,
    pub swing_lookback_right: usize,

    // Order blocks
    pub ob_min_body_ratio: f64,
    pub ob_impulse_multiplier: f64,
    pub ob_volume_multiplier: f64,
    pub ob_volume_window: usize,
    pub ob_base_strength: f64,
    pub ob_volume_boost: f64,
    pub ob_max_retained: usize,
    // Fractional distance from price at which an active block counts as "being tested"
    pub ob_proximity_pct: f64,

    // Fair value gaps (minimum size as a fraction of the middle candle's close)
    pub fvg_min_size_pct: f64,
    pub fvg_max_retained: usize,

    // Liquidity
    pub liquidity_tolerance: f64,
    pub liquidity_min_touches: usize,
    pub liquidity_strength_divisor: f64,
    pub stop_hunt_wick_ratio: f64,
    pub stop_hunt_max_retained: usize,

    pub structure_events_retained: usize,

    // Synthesizer vote weights
    pub structure_weight: f64,
    pub order_block_weight: f64,
    pub premium_discount_weight: f64,
}

impl Default for SmcConfig {
    fn default() -> Self {
        Self {
            swing_lookback_left: DEFAULT_SWING_LOOKBACK,
            swing_lookback_right: DEFAULT_SWING_LOOKBACK,
            ob_min_body_ratio: DEFAULT_OB_MIN_BODY_RATIO,
            ob_impulse_multiplier: DEFAULT_OB_IMPULSE_MULTIPLIER,
            ob_volume_multiplier: 1.5,
            ob_volume_window: 5,
            ob_base_strength: 0.8,
            ob_volume_boost: 1.5,
            ob_max_retained: 10,
            ob_proximity_pct: 0.002,
            fvg_min_size_pct: 0.0,
            fvg_max_retained: 10,
            liquidity_tolerance: DEFAULT_LIQUIDITY_TOLERANCE,
            liquidity_min_touches: 2,
            liquidity_strength_divisor: 5.0,
            stop_hunt_wick_ratio: 0.6,
            stop_hunt_max_retained: 5,
            structure_events_retained: 5,
            structure_weight: 0.25,
            order_block_weight: 0.20,
            premium_discount_weight: 0.20,
        }
    }
}
