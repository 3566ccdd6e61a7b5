use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::domain::SentimentClass;

/// Direction of an order block, gap or stop hunt.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ZoneBias {
    Bullish,
    Bearish,
}

impl ZoneBias {
    pub fn as_class(&self) -> SentimentClass {
        match self {
            ZoneBias::Bullish => SentimentClass::Bullish,
            ZoneBias::Bearish => SentimentClass::Bearish,
        }
    }
}

// ----------------------------------------------------------------------------
// Order blocks
// ----------------------------------------------------------------------------

/// The body of the last opposing candle before a strong move.
/// Invariant: `price_low <= price_high`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct OrderBlock {
    pub price_low: f64,
    pub price_high: f64,
    pub timestamp_ms: i64,
    pub kind: ZoneBias,
    /// 0.8 base, boosted by 1.5 on heavy volume
    pub strength: f64,
    /// Later bars that traded back into the block
    pub tested_count: usize,
    /// Set on detection; retests do not clear it
    pub active: bool,
}

impl OrderBlock {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.price_low && price <= self.price_high
    }

    /// Distance from `price` to the nearest edge, 0 inside the block.
    pub fn distance_to(&self, price: f64) -> f64 {
        if self.contains(price) {
            0.0
        } else if price < self.price_low {
            self.price_low - price
        } else {
            price - self.price_high
        }
    }
}

// ----------------------------------------------------------------------------
// Fair value gaps
// ----------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FairValueGap {
    pub price_low: f64,
    pub price_high: f64,
    pub timestamp_ms: i64,
    pub kind: ZoneBias,
    pub filled_fraction: f64,
    pub active: bool,
}

impl FairValueGap {
    pub fn new(price_low: f64, price_high: f64, timestamp_ms: i64, kind: ZoneBias) -> Self {
        Self {
            price_low,
            price_high,
            timestamp_ms,
            kind,
            filled_fraction: 0.0,
            active: true,
        }
    }

    pub fn size(&self) -> f64 {
        self.price_high - self.price_low
    }

    /// Apply one close to the fill state.
    ///
    /// Strictly inside the gap the penetration (measured up from `price_low`)
    /// is recorded; at or beyond either boundary the gap is filled for good.
    /// `filled_fraction` never decreases and an inactive gap never reopens.
    pub fn update_fill(&mut self, close: f64) {
        if !self.active {
            return;
        }

        if close > self.price_low && close < self.price_high {
            let penetration = (close - self.price_low) / self.size();
            self.filled_fraction = self.filled_fraction.max(penetration);
        } else {
            self.filled_fraction = 1.0;
            self.active = false;
        }
    }
}

// ----------------------------------------------------------------------------
// Liquidity
// ----------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LiquidityKind {
    Support,
    Resistance,
}

/// Price level touched by several swing points (equal highs / equal lows).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LiquidityZone {
    pub price: f64,
    pub kind: LiquidityKind,
    pub strength: f64,
    pub touch_count: usize,
}

/// A wick through a liquidity level that closed back on the original side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StopHuntEvent {
    pub kind: ZoneBias,
    pub zone_price: f64,
    /// High of the wick for a bearish hunt, low for a bullish one
    pub wick_extreme: f64,
    pub close: f64,
    pub timestamp_ms: i64,
}

// ----------------------------------------------------------------------------
// Premium / discount
// ----------------------------------------------------------------------------

pub const FIB_PREMIUM_HIGH: f64 = 0.236;
pub const FIB_PREMIUM_LOW: f64 = 0.382;
pub const FIB_EQUILIBRIUM: f64 = 0.5;
pub const FIB_DISCOUNT_HIGH: f64 = 0.618;
pub const FIB_DISCOUNT_LOW: f64 = 0.764;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceZone {
    Premium,
    Equilibrium,
    Discount,
}

impl PriceZone {
    pub fn bias(&self) -> SentimentClass {
        match self {
            PriceZone::Premium => SentimentClass::Bearish,
            PriceZone::Discount => SentimentClass::Bullish,
            PriceZone::Equilibrium => SentimentClass::Neutral,
        }
    }
}

/// Retracement levels, measured down from the swing high.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FibLevels {
    pub high: f64,
    pub premium_high: f64,
    pub premium_low: f64,
    pub equilibrium: f64,
    pub discount_high: f64,
    pub discount_low: f64,
    pub low: f64,
}

impl FibLevels {
    pub fn from_range(swing_low: f64, swing_high: f64) -> Self {
        let range = swing_high - swing_low;
        Self {
            high: swing_high,
            premium_high: swing_high - range * FIB_PREMIUM_HIGH,
            premium_low: swing_high - range * FIB_PREMIUM_LOW,
            equilibrium: swing_high - range * FIB_EQUILIBRIUM,
            discount_high: swing_high - range * FIB_DISCOUNT_HIGH,
            discount_low: swing_high - range * FIB_DISCOUNT_LOW,
            low: swing_low,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PremiumDiscountZone {
    pub zone: PriceZone,
    pub bias: SentimentClass,
    /// Where the close sits in the range, 0 = swing low, 1 = swing high
    pub position: f64,
    pub levels: FibLevels,
    pub current_price: f64,
}

impl PremiumDiscountZone {
    /// The three zones as `(zone, lower, upper)` bands, low to high.
    /// Adjacent bands share their boundary, so together they cover
    /// `[swing_low, swing_high]` exactly.
    pub fn bands(&self) -> [(PriceZone, f64, f64); 3] {
        let l = &self.levels;
        [
            (PriceZone::Discount, l.low, l.discount_high),
            (PriceZone::Equilibrium, l.discount_high, l.premium_low),
            (PriceZone::Premium, l.premium_low, l.high),
        ]
    }
}

/// Premium/discount state of the window. An explicit status instead of a
/// guess when no swing range exists.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PremiumDiscount {
    #[default]
    InsufficientData,
    Active(PremiumDiscountZone),
}

impl PremiumDiscount {
    pub fn zone(&self) -> Option<PriceZone> {
        match self {
            PremiumDiscount::Active(pd) => Some(pd.zone),
            PremiumDiscount::InsufficientData => None,
        }
    }

    pub fn bias(&self) -> SentimentClass {
        match self {
            PremiumDiscount::Active(pd) => pd.bias,
            PremiumDiscount::InsufficientData => SentimentClass::Neutral,
        }
    }
}

/// Full output of the zone detector for one window.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ZoneAnalysis {
    /// Most recent first
    pub order_blocks: Vec<OrderBlock>,
    /// Most recent first
    pub fair_value_gaps: Vec<FairValueGap>,
    pub liquidity_zones: Vec<LiquidityZone>,
    /// Oldest first
    pub stop_hunts: Vec<StopHuntEvent>,
    pub premium_discount: PremiumDiscount,
}

impl ZoneAnalysis {
    pub fn active_order_blocks(&self, kind: ZoneBias) -> usize {
        self.order_blocks
            .iter()
            .filter(|ob| ob.active && ob.kind == kind)
            .count()
    }
}
