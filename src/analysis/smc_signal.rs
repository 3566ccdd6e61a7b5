use serde::Serialize;

use crate::config::SmcConfig;
use crate::domain::{ClassScores, SentimentClass, Signal, SignalComponent, VoteSource};
use crate::models::{OhlcvTimeSeries, StructureAnalysis, ZoneAnalysis, ZoneBias};

use super::structure_detector::StructureDetector;
use super::zone_detector::ZoneDetector;

/// Everything the structural detectors found, plus the fused SMC vote.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SmcAnalysis {
    pub structure: StructureAnalysis,
    pub zones: ZoneAnalysis,
    pub signal: Signal,
}

/// Runs both detectors over a window and fuses their verdicts.
#[derive(Debug, Clone)]
pub struct SmcAnalyzer {
    structure: StructureDetector,
    zones: ZoneDetector,
    structure_weight: f64,
    order_block_weight: f64,
    premium_discount_weight: f64,
}

impl SmcAnalyzer {
    pub fn new(config: &SmcConfig) -> Self {
        Self {
            structure: StructureDetector::new(config),
            zones: ZoneDetector::new(config),
            structure_weight: config.structure_weight,
            order_block_weight: config.order_block_weight,
            premium_discount_weight: config.premium_discount_weight,
        }
    }

    pub fn analyze(&self, series: &OhlcvTimeSeries) -> SmcAnalysis {
        let structure = self.structure.analyze(series);
        let zones = self.zones.analyze(series, &structure.swings);
        let signal = self.synthesize(&structure, &zones);

        SmcAnalysis {
            structure,
            zones,
            signal,
        }
    }

    /// Weighted vote of structure trend, net active order-block bias and
    /// premium/discount bias. The confidence is the winning side's summed
    /// weight, so it tops out at the sum of the three weights rather than 1.
    pub fn synthesize(&self, structure: &StructureAnalysis, zones: &ZoneAnalysis) -> Signal {
        let mut components = Vec::new();

        let trend_class = structure.state.trend.as_class();
        if trend_class.is_directional() {
            components.push(SignalComponent {
                source: VoteSource::Structure,
                class: trend_class,
                weight: self.structure_weight,
            });
        }

        let bullish_blocks = zones.active_order_blocks(ZoneBias::Bullish);
        let bearish_blocks = zones.active_order_blocks(ZoneBias::Bearish);
        let block_class = match bullish_blocks.cmp(&bearish_blocks) {
            std::cmp::Ordering::Greater => Some(SentimentClass::Bullish),
            std::cmp::Ordering::Less => Some(SentimentClass::Bearish),
            std::cmp::Ordering::Equal => None,
        };
        if let Some(class) = block_class {
            components.push(SignalComponent {
                source: VoteSource::OrderBlocks,
                class,
                weight: self.order_block_weight,
            });
        }

        let zone_class = zones.premium_discount.bias();
        if zone_class.is_directional() {
            components.push(SignalComponent {
                source: VoteSource::PremiumDiscount,
                class: zone_class,
                weight: self.premium_discount_weight,
            });
        }

        let mut scores = ClassScores::default();
        for c in &components {
            scores.add(c.class, c.weight);
        }

        let (class, confidence) = if scores.bullish > scores.bearish {
            (SentimentClass::Bullish, scores.bullish)
        } else if scores.bearish > scores.bullish {
            (SentimentClass::Bearish, scores.bearish)
        } else {
            (SentimentClass::Neutral, 0.0)
        };

        Signal {
            class,
            confidence,
            components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        FibLevels, MarketStructureState, OrderBlock, PremiumDiscount, PremiumDiscountZone,
        PriceZone, TrendState,
    };

    fn structure(trend: TrendState) -> StructureAnalysis {
        StructureAnalysis {
            state: MarketStructureState {
                trend,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn block(kind: ZoneBias, active: bool) -> OrderBlock {
        OrderBlock {
            price_low: 1.0,
            price_high: 1.1,
            timestamp_ms: 0,
            kind,
            strength: 0.8,
            tested_count: 0,
            active,
        }
    }

    fn pd(zone: PriceZone) -> PremiumDiscount {
        PremiumDiscount::Active(PremiumDiscountZone {
            zone,
            bias: zone.bias(),
            position: 0.5,
            levels: FibLevels::from_range(1.0, 2.0),
            current_price: 1.5,
        })
    }

    #[test]
    fn bullish_structure_outweighs_premium() {
        let analyzer = SmcAnalyzer::new(&SmcConfig::default());
        let zones = ZoneAnalysis {
            premium_discount: pd(PriceZone::Premium),
            ..Default::default()
        };
        let signal = analyzer.synthesize(&structure(TrendState::Bullish), &zones);
        assert_eq!(signal.class, SentimentClass::Bullish);
        assert!((signal.confidence - 0.25).abs() < 1e-12);
        let sources: Vec<VoteSource> = signal.components.iter().map(|c| c.source).collect();
        assert_eq!(sources, vec![VoteSource::Structure, VoteSource::PremiumDiscount]);
    }

    #[test]
    fn all_votes_agree() {
        let analyzer = SmcAnalyzer::new(&SmcConfig::default());
        let zones = ZoneAnalysis {
            order_blocks: vec![
                block(ZoneBias::Bearish, true),
                block(ZoneBias::Bearish, true),
                block(ZoneBias::Bullish, true),
                block(ZoneBias::Bullish, false),
            ],
            premium_discount: pd(PriceZone::Premium),
            ..Default::default()
        };
        let signal = analyzer.synthesize(&structure(TrendState::Bearish), &zones);
        assert_eq!(signal.class, SentimentClass::Bearish);
        assert!((signal.confidence - 0.65).abs() < 1e-12);
    }

    #[test]
    fn tie_or_silence_is_neutral() {
        let analyzer = SmcAnalyzer::new(&SmcConfig::default());
        let silent = analyzer.synthesize(&structure(TrendState::Undefined), &ZoneAnalysis::default());
        assert_eq!(silent.class, SentimentClass::Neutral);
        assert_eq!(silent.confidence, 0.0);

        let zones = ZoneAnalysis {
            order_blocks: vec![block(ZoneBias::Bearish, true)],
            premium_discount: pd(PriceZone::Discount),
            ..Default::default()
        };
        let tied = analyzer.synthesize(&structure(TrendState::Neutral), &zones);
        assert_eq!(tied.class, SentimentClass::Neutral);
        assert_eq!(tied.confidence, 0.0);
    }
}
