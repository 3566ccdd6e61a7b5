use crate::config::{PRINT_ZONE_DETECTION, SmcConfig};
use crate::models::{
    FairValueGap, FibLevels, LiquidityKind, LiquidityZone, OhlcvTimeSeries, OrderBlock,
    PremiumDiscount, PremiumDiscountZone, PriceZone, StopHuntEvent, SwingPoint, SwingPoints,
    ZoneAnalysis, ZoneBias,
};
use crate::utils::Retained;
use crate::utils::maths_utils::{clamp_unit, get_max, get_min, mean, relative_diff};

/// Order blocks, fair value gaps, liquidity, stop hunts and the
/// premium/discount partition of one window.
#[derive(Debug, Clone)]
pub struct ZoneDetector {
    config: SmcConfig,
}

impl ZoneDetector {
    pub fn new(config: &SmcConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// `swings` must come from the same series.
    pub fn analyze(&self, series: &OhlcvTimeSeries, swings: &SwingPoints) -> ZoneAnalysis {
        let order_blocks = detect_order_blocks(series, &self.config);
        let fair_value_gaps = detect_fair_value_gaps(series, &self.config);
        let liquidity_zones = detect_liquidity_zones(swings, &self.config);
        let stop_hunts = detect_stop_hunts(series, &liquidity_zones, &self.config);
        let premium_discount = match series.last_close() {
            Some(close) => premium_discount(swings, close),
            None => PremiumDiscount::InsufficientData,
        };

        #[cfg(debug_assertions)]
        if PRINT_ZONE_DETECTION {
            log::info!(
                "{} {}: {} order blocks, {} FVGs, {} liquidity zones, {} stop hunts, premium/discount {:?}",
                series.symbol,
                series.timeframe,
                order_blocks.len(),
                fair_value_gaps.len(),
                liquidity_zones.len(),
                stop_hunts.len(),
                premium_discount.zone()
            );
        }

        ZoneAnalysis {
            order_blocks,
            fair_value_gaps,
            liquidity_zones,
            stop_hunts,
            premium_discount,
        }
    }
}

// ----------------------------------------------------------------------------
// Order blocks
// ----------------------------------------------------------------------------

/// Two-candle reversal: a decisive candle followed by a larger opposing one.
/// Returns at most `ob_max_retained` blocks, most recent first.
pub fn detect_order_blocks(series: &OhlcvTimeSeries, config: &SmcConfig) -> Vec<OrderBlock> {
    let n = series.klines();
    if n < 3 {
        return Vec::new();
    }

    let window = config.ob_volume_window;
    let mut found: Vec<(usize, OrderBlock)> = Vec::new();

    for i in 1..n - 1 {
        let current = series.get_candle(i);
        let next = series.get_candle(i + 1);

        let Some(body_ratio) = current.body_ratio() else {
            continue;
        };
        if body_ratio < config.ob_min_body_ratio {
            continue;
        }

        let kind = if current.is_bearish() && next.is_bullish() {
            ZoneBias::Bullish
        } else if current.is_bullish() && next.is_bearish() {
            ZoneBias::Bearish
        } else {
            continue;
        };
        if next.body() <= current.body() * config.ob_impulse_multiplier {
            continue;
        }

        let mut strength = config.ob_base_strength;
        // Needs a full trailing window that does not reach back to bar 0
        if window > 0
            && i > window
            && let Some(avg_volume) = mean(&series.volumes[i - window..i])
            && current.volume > avg_volume * config.ob_volume_multiplier
        {
            strength *= config.ob_volume_boost;
        }

        let (price_low, price_high) = current.body_range();
        found.push((
            i,
            OrderBlock {
                price_low,
                price_high,
                timestamp_ms: current.timestamp_ms,
                kind,
                strength,
                tested_count: 0,
                active: true,
            },
        ));
    }

    found.sort_by(|a, b| b.1.timestamp_ms.cmp(&a.1.timestamp_ms));
    found.truncate(config.ob_max_retained);

    found
        .into_iter()
        .map(|(i, mut block)| {
            block.tested_count = count_retests(series, i, &block);
            block
        })
        .collect()
}

/// Bars after the reaction candle that trade back into the block. Informational
/// only: a retested or even closed-through block stays active and keeps voting.
fn count_retests(series: &OhlcvTimeSeries, index: usize, block: &OrderBlock) -> usize {
    ((index + 2)..series.klines())
        .filter(|&j| series.get_candle(j).overlaps(block.price_low, block.price_high))
        .count()
}

// ----------------------------------------------------------------------------
// Fair value gaps
// ----------------------------------------------------------------------------

/// Three-candle imbalances, fill state evaluated against the latest close.
/// Most recent first.
pub fn detect_fair_value_gaps(series: &OhlcvTimeSeries, config: &SmcConfig) -> Vec<FairValueGap> {
    let n = series.klines();
    let Some(last_close) = series.last_close() else {
        return Vec::new();
    };
    if n < 3 {
        return Vec::new();
    }

    let highs = &series.high_prices;
    let lows = &series.low_prices;
    let mut gaps = Vec::new();

    for i in 1..n - 1 {
        let candidate = if lows[i] > highs[i - 1] && lows[i] > highs[i + 1] {
            Some((highs[i - 1].max(highs[i + 1]), lows[i], ZoneBias::Bullish))
        } else if highs[i] < lows[i - 1] && highs[i] < lows[i + 1] {
            Some((highs[i], lows[i - 1].min(lows[i + 1]), ZoneBias::Bearish))
        } else {
            None
        };

        let Some((price_low, price_high, kind)) = candidate else {
            continue;
        };
        let size = price_high - price_low;
        if size <= 0.0 || size < config.fvg_min_size_pct * series.close_prices[i] {
            continue;
        }

        let mut gap = FairValueGap::new(price_low, price_high, series.timestamps_ms[i], kind);
        gap.update_fill(last_close);
        gaps.push(gap);
    }

    gaps.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    gaps.truncate(config.fvg_max_retained);
    gaps
}

// ----------------------------------------------------------------------------
// Liquidity
// ----------------------------------------------------------------------------

/// Equal highs become resistance, equal lows support.
pub fn detect_liquidity_zones(swings: &SwingPoints, config: &SmcConfig) -> Vec<LiquidityZone> {
    let mut zones = cluster_swings(&swings.highs, LiquidityKind::Resistance, config);
    zones.extend(cluster_swings(&swings.lows, LiquidityKind::Support, config));
    zones
}

fn cluster_swings(
    points: &[SwingPoint],
    kind: LiquidityKind,
    config: &SmcConfig,
) -> Vec<LiquidityZone> {
    let tolerance = config.liquidity_tolerance;
    let mut zones: Vec<LiquidityZone> = Vec::new();

    for (i, first) in points.iter().enumerate() {
        for second in &points[i + 1..] {
            let level = (first.price + second.price) / 2.0;
            if relative_diff(first.price, second.price, level) >= tolerance {
                continue;
            }

            let touches = points
                .iter()
                .filter(|p| relative_diff(p.price, level, level) < tolerance)
                .count();
            let already_known = zones
                .iter()
                .any(|z| relative_diff(z.price, level, level) < tolerance);

            if touches >= config.liquidity_min_touches && !already_known {
                zones.push(LiquidityZone {
                    price: level,
                    kind,
                    strength: (touches as f64 / config.liquidity_strength_divisor).min(1.0),
                    touch_count: touches,
                });
            }
            // First matching partner settles this swing
            break;
        }
    }

    zones
}

/// Wicks through a liquidity level that close back on the original side.
/// Returns the most recent `stop_hunt_max_retained`, oldest first.
pub fn detect_stop_hunts(
    series: &OhlcvTimeSeries,
    zones: &[LiquidityZone],
    config: &SmcConfig,
) -> Vec<StopHuntEvent> {
    let mut hunts = Retained::with_capacity(config.stop_hunt_max_retained);
    if zones.is_empty() {
        return hunts.into_vec();
    }

    for bar in series.candles() {
        for zone in zones {
            let event = match zone.kind {
                LiquidityKind::Resistance => {
                    let swept = bar.high > zone.price && bar.close < zone.price;
                    let rejected = bar
                        .upper_rejection_ratio()
                        .is_some_and(|r| r > config.stop_hunt_wick_ratio);
                    (swept && rejected).then_some((ZoneBias::Bearish, bar.high))
                }
                LiquidityKind::Support => {
                    let swept = bar.low < zone.price && bar.close > zone.price;
                    let rejected = bar
                        .lower_rejection_ratio()
                        .is_some_and(|r| r > config.stop_hunt_wick_ratio);
                    (swept && rejected).then_some((ZoneBias::Bullish, bar.low))
                }
            };

            if let Some((kind, wick_extreme)) = event {
                hunts.push(StopHuntEvent {
                    kind,
                    zone_price: zone.price,
                    wick_extreme,
                    close: bar.close,
                    timestamp_ms: bar.timestamp_ms,
                });
            }
        }
    }

    hunts.into_vec()
}

// ----------------------------------------------------------------------------
// Premium / discount
// ----------------------------------------------------------------------------

/// Classifies `close` against the Fibonacci partition of the widest swing range.
pub fn premium_discount(swings: &SwingPoints, close: f64) -> PremiumDiscount {
    let highs: Vec<f64> = swings.highs.iter().map(|s| s.price).collect();
    let lows: Vec<f64> = swings.lows.iter().map(|s| s.price).collect();
    let (swing_high, swing_low) = (get_max(&highs), get_min(&lows));

    let (Some(high), Some(low)) = (swing_high, swing_low) else {
        return PremiumDiscount::InsufficientData;
    };
    let range = high - low;
    if range <= 0.0 {
        return PremiumDiscount::InsufficientData;
    }

    let levels = FibLevels::from_range(low, high);
    let zone = if close > levels.premium_low {
        PriceZone::Premium
    } else if close < levels.discount_high {
        PriceZone::Discount
    } else {
        PriceZone::Equilibrium
    };

    PremiumDiscount::Active(PremiumDiscountZone {
        zone,
        bias: zone.bias(),
        position: clamp_unit((close - low) / range),
        levels,
        current_price: close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, SentimentClass, Timeframe};
    use crate::models::SwingKind;

    fn series(candles: &[Candle]) -> OhlcvTimeSeries {
        OhlcvTimeSeries::from_candles("EURUSD", Timeframe::H1, candles).unwrap()
    }

    fn doji(i: i64, price: f64, volume: f64) -> Candle {
        Candle::new(i * 3_600_000, price, price + 0.0002, price - 0.0002, price, volume)
    }

    fn swing(index: usize, price: f64, kind: SwingKind) -> SwingPoint {
        SwingPoint {
            index,
            price,
            kind,
            timestamp_ms: index as i64,
        }
    }

    fn reversal_bars(down_volume: f64) -> Vec<Candle> {
        let mut bars: Vec<Candle> = (0..6).map(|i| doji(i, 1.1000, 100.0)).collect();
        bars.push(Candle::new(6 * 3_600_000, 1.1000, 1.1003, 1.0948, 1.0950, down_volume));
        bars.push(Candle::new(7 * 3_600_000, 1.0950, 1.1032, 1.0949, 1.1030, 120.0));
        bars.extend((8..12).map(|i| doji(i, 1.1030, 100.0)));
        bars
    }

    #[test]
    fn bullish_order_block_from_reversal() {
        let config = SmcConfig::default();
        let blocks = detect_order_blocks(&series(&reversal_bars(100.0)), &config);

        assert_eq!(blocks.len(), 1);
        let ob = blocks[0];
        assert_eq!(ob.kind, ZoneBias::Bullish);
        assert_eq!((ob.price_low, ob.price_high), (1.0950, 1.1000));
        assert!((ob.strength - 0.8).abs() < 1e-12);
        assert!(ob.active);
        assert_eq!(ob.tested_count, 0);
    }

    #[test]
    fn heavy_volume_boosts_strength() {
        let config = SmcConfig::default();
        let blocks = detect_order_blocks(&series(&reversal_bars(400.0)), &config);
        assert_eq!(blocks.len(), 1);
        assert!((blocks[0].strength - 1.2).abs() < 1e-12);
    }

    #[test]
    fn boost_needs_bars_before_the_window() {
        // Down candle at index 5: its trailing window would start at bar 0
        let mut bars: Vec<Candle> = (0..5).map(|i| doji(i, 1.1000, 100.0)).collect();
        bars.push(Candle::new(5 * 3_600_000, 1.1000, 1.1003, 1.0948, 1.0950, 400.0));
        bars.push(Candle::new(6 * 3_600_000, 1.0950, 1.1032, 1.0949, 1.1030, 120.0));
        bars.extend((7..10).map(|i| doji(i, 1.1030, 100.0)));

        let blocks = detect_order_blocks(&series(&bars), &SmcConfig::default());
        assert_eq!(blocks.len(), 1);
        assert!((blocks[0].strength - 0.8).abs() < 1e-12);
    }

    #[test]
    fn retested_block_keeps_voting_after_close_through() {
        let mut bars = reversal_bars(100.0);
        bars.push(Candle::new(12 * 3_600_000, 1.1030, 1.1031, 1.0990, 1.1000, 100.0));
        bars.push(Candle::new(13 * 3_600_000, 1.1000, 1.1001, 1.0930, 1.0940, 100.0));
        bars.push(doji(14, 1.0940, 100.0));
        let series = series(&bars);

        let blocks = detect_order_blocks(&series, &SmcConfig::default());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tested_count, 2);
        assert!(blocks[0].active);

        let zones = ZoneDetector::new(&SmcConfig::default()).analyze(&series, &SwingPoints::default());
        assert_eq!(zones.active_order_blocks(ZoneBias::Bullish), 1);
    }

    #[test]
    fn bearish_order_block_from_reversal() {
        let mut bars: Vec<Candle> = (0..6).map(|i| doji(i, 1.1000, 100.0)).collect();
        bars.push(Candle::new(6 * 3_600_000, 1.1000, 1.1052, 1.0997, 1.1050, 100.0));
        bars.push(Candle::new(7 * 3_600_000, 1.1050, 1.1051, 1.0968, 1.0970, 100.0));
        bars.extend((8..12).map(|i| doji(i, 1.0970, 100.0)));

        let blocks = detect_order_blocks(&series(&bars), &SmcConfig::default());
        assert_eq!(blocks.len(), 1);
        let ob = blocks[0];
        assert_eq!(ob.kind, ZoneBias::Bearish);
        assert_eq!((ob.price_low, ob.price_high), (1.1000, 1.1050));
        assert_eq!(ob.timestamp_ms, 6 * 3_600_000);
        assert_eq!(ob.tested_count, 0);
    }

    #[test]
    fn order_blocks_keep_ten_newest() {
        let h = 3_600_000;
        let bars: Vec<Candle> = (0..12i64)
            .flat_map(|k| {
                let i = 3 * k;
                [
                    doji(i, 1.1000, 100.0),
                    Candle::new((i + 1) * h, 1.1000, 1.1003, 1.0948, 1.0950, 100.0),
                    Candle::new((i + 2) * h, 1.0950, 1.1032, 1.0949, 1.1030, 100.0),
                ]
            })
            .collect();

        let blocks = detect_order_blocks(&series(&bars), &SmcConfig::default());
        assert_eq!(blocks.len(), 10);
        assert_eq!(blocks[0].timestamp_ms, 34 * h);
        assert_eq!(blocks[9].timestamp_ms, 7 * h);
        assert!(blocks.windows(2).all(|w| w[0].timestamp_ms > w[1].timestamp_ms));
    }

    #[test]
    fn bullish_gap_is_partially_filled() {
        let bars = vec![
            Candle::new(0, 10.0, 10.5, 9.8, 10.4, 1.0),
            Candle::new(1, 11.2, 11.8, 11.0, 11.6, 1.0),
            Candle::new(2, 10.6, 10.7, 10.2, 10.3, 1.0),
            Candle::new(3, 10.3, 10.9, 10.3, 10.85, 1.0),
        ];
        let gaps = detect_fair_value_gaps(&series(&bars), &SmcConfig::default());

        assert_eq!(gaps.len(), 1);
        let gap = gaps[0];
        assert_eq!(gap.kind, ZoneBias::Bullish);
        assert_eq!((gap.price_low, gap.price_high), (10.7, 11.0));
        assert!(gap.active);
        assert!((gap.filled_fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn minimum_gap_size_filters_small_gaps() {
        let bars = vec![
            Candle::new(0, 10.0, 10.5, 9.8, 10.4, 1.0),
            Candle::new(1, 11.2, 11.8, 11.0, 11.6, 1.0),
            Candle::new(2, 10.6, 10.7, 10.2, 10.3, 1.0),
        ];
        let config = SmcConfig {
            fvg_min_size_pct: 0.05,
            ..Default::default()
        };
        assert!(detect_fair_value_gaps(&series(&bars), &config).is_empty());
    }

    #[test]
    fn gap_already_closed_through_is_inactive() {
        let bars = vec![
            Candle::new(0, 10.0, 10.5, 9.8, 10.4, 1.0),
            Candle::new(1, 11.2, 11.8, 11.0, 11.6, 1.0),
            Candle::new(2, 10.6, 10.7, 10.2, 10.3, 1.0),
        ];
        let gaps = detect_fair_value_gaps(&series(&bars), &SmcConfig::default());

        assert_eq!(gaps.len(), 1);
        assert!(!gaps[0].active);
        assert_eq!(gaps[0].filled_fraction, 1.0);
    }

    #[test]
    fn bearish_gap_below_both_neighbours() {
        let bars = vec![
            Candle::new(0, 11.5, 11.6, 11.0, 11.1, 1.0),
            Candle::new(1, 10.3, 10.4, 9.6, 9.7, 1.0),
            Candle::new(2, 10.7, 11.2, 10.6, 11.1, 1.0),
            Candle::new(3, 10.9, 10.95, 10.4, 10.45, 1.0),
        ];
        let gaps = detect_fair_value_gaps(&series(&bars), &SmcConfig::default());

        assert_eq!(gaps.len(), 1);
        let gap = gaps[0];
        assert_eq!(gap.kind, ZoneBias::Bearish);
        assert_eq!((gap.price_low, gap.price_high), (10.4, 10.6));
        assert_eq!(gap.timestamp_ms, 1);
        assert!(gap.active);
        assert!((gap.filled_fraction - 0.25).abs() < 1e-9);
    }

    #[test]
    fn gaps_keep_ten_newest() {
        // Alternating high and low bars: every interior bar is a gap
        let bars: Vec<Candle> = (0..25)
            .map(|i| {
                if i % 2 == 0 {
                    Candle::new(i, 9.5, 10.0, 9.0, 9.5, 1.0)
                } else {
                    Candle::new(i, 11.5, 12.0, 11.0, 11.5, 1.0)
                }
            })
            .collect();
        let gaps = detect_fair_value_gaps(&series(&bars), &SmcConfig::default());

        assert_eq!(gaps.len(), 10);
        assert_eq!(gaps[0].timestamp_ms, 23);
        assert_eq!(gaps[9].timestamp_ms, 14);
        assert_eq!(gaps[0].kind, ZoneBias::Bullish);
        assert_eq!(gaps[1].kind, ZoneBias::Bearish);
    }

    #[test]
    fn equal_highs_form_one_resistance_zone() {
        let swings = SwingPoints {
            highs: vec![
                swing(5, 1.1000, SwingKind::High),
                swing(15, 1.10005, SwingKind::High),
                swing(25, 1.0980, SwingKind::High),
                swing(35, 1.09995, SwingKind::High),
            ],
            lows: vec![swing(10, 1.0900, SwingKind::Low), swing(20, 1.0800, SwingKind::Low)],
        };
        let zones = detect_liquidity_zones(&swings, &SmcConfig::default());

        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].kind, LiquidityKind::Resistance);
        assert_eq!(zones[0].touch_count, 3);
        assert!((zones[0].strength - 0.6).abs() < 1e-12);
    }

    #[test]
    fn wick_through_resistance_is_a_stop_hunt() {
        let zone = LiquidityZone {
            price: 1.1000,
            kind: LiquidityKind::Resistance,
            strength: 0.4,
            touch_count: 2,
        };
        let bars = vec![
            Candle::new(0, 1.0980, 1.0990, 1.0975, 1.0985, 1.0),
            Candle::new(1, 1.0985, 1.1020, 1.0980, 1.0988, 1.0),
        ];
        let hunts = detect_stop_hunts(&series(&bars), &[zone], &SmcConfig::default());
        assert_eq!(hunts.len(), 1);
        assert_eq!(hunts[0].kind, ZoneBias::Bearish);
        assert_eq!(hunts[0].wick_extreme, 1.1020);
    }

    #[test]
    fn equal_lows_are_support_and_get_swept() {
        let swings = SwingPoints {
            highs: vec![swing(5, 1.1000, SwingKind::High), swing(15, 1.1100, SwingKind::High)],
            lows: vec![
                swing(10, 1.0900, SwingKind::Low),
                swing(20, 1.0800, SwingKind::Low),
                swing(30, 1.09005, SwingKind::Low),
            ],
        };
        let config = SmcConfig::default();
        let zones = detect_liquidity_zones(&swings, &config);

        assert_eq!(zones.len(), 1);
        let zone = zones[0];
        assert_eq!(zone.kind, LiquidityKind::Support);
        assert_eq!(zone.touch_count, 2);
        assert!((zone.strength - 0.4).abs() < 1e-12);
        assert!((zone.price - 1.090025).abs() < 1e-12);

        let bars = vec![
            Candle::new(0, 1.0920, 1.0930, 1.0910, 1.0915, 1.0),
            Candle::new(1, 1.0915, 1.0920, 1.0880, 1.0918, 1.0),
        ];
        let hunts = detect_stop_hunts(&series(&bars), &zones, &config);
        assert_eq!(hunts.len(), 1);
        assert_eq!(hunts[0].kind, ZoneBias::Bullish);
        assert_eq!(hunts[0].wick_extreme, 1.0880);
        assert_eq!(hunts[0].timestamp_ms, 1);
    }

    #[test]
    fn stop_hunts_keep_five_most_recent() {
        let zone = LiquidityZone {
            price: 1.1000,
            kind: LiquidityKind::Resistance,
            strength: 0.4,
            touch_count: 2,
        };
        let bars: Vec<Candle> = (0..8)
            .map(|i| Candle::new(i, 1.0985, 1.1020, 1.0980, 1.0988, 1.0))
            .collect();
        let hunts = detect_stop_hunts(&series(&bars), &[zone], &SmcConfig::default());

        let stamps: Vec<i64> = hunts.iter().map(|h| h.timestamp_ms).collect();
        assert_eq!(stamps, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn premium_discount_classification() {
        let swings = SwingPoints {
            highs: vec![swing(3, 200.0, SwingKind::High), swing(9, 180.0, SwingKind::High)],
            lows: vec![swing(6, 100.0, SwingKind::Low)],
        };

        let PremiumDiscount::Active(pd) = premium_discount(&swings, 190.0) else {
            panic!("expected an active range");
        };
        assert_eq!(pd.zone, PriceZone::Premium);
        assert_eq!(pd.bias, SentimentClass::Bearish);
        assert!((pd.position - 0.9).abs() < 1e-12);

        assert_eq!(premium_discount(&swings, 120.0).zone(), Some(PriceZone::Discount));
        assert_eq!(premium_discount(&swings, 150.0).zone(), Some(PriceZone::Equilibrium));
        assert_eq!(
            premium_discount(&SwingPoints::default(), 150.0),
            PremiumDiscount::InsufficientData
        );
    }
}
