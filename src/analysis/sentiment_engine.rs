use crate::config::{AnalysisConfig, PRINT_SIGNAL_FUSION, RegimeSettings, SentimentConfig};
use crate::domain::{
    ClassScores, Favorability, IndicatorSignal, RegimeContext, RiskLevel, SentimentClass,
    TechnicalSignals, VolatilityLevel, VolatilityRegime,
};
use crate::models::{Component, Factor, OhlcvTimeSeries, PriceZone, SentimentResult};
use crate::utils::maths_utils::clamp_unit;

use super::confidence_scorer::ConfidenceScorer;
use super::error::AnalysisError;
use super::smc_signal::{SmcAnalysis, SmcAnalyzer};

/// Outcome of the weighted vote, before confidence scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub class: SentimentClass,
    pub scores: ClassScores,
    pub raw_score: f64,
    /// Largest contribution first
    pub factors: Vec<Factor>,
}

/// Single-timeframe pipeline: detectors, SMC vote, fusion with the external
/// indicator families, confidence, risk and insights.
#[derive(Debug, Clone)]
pub struct SentimentEngine {
    smc: SmcAnalyzer,
    scorer: ConfidenceScorer,
    config: SentimentConfig,
    regime: RegimeSettings,
    ob_proximity_pct: f64,
}

impl Default for SentimentEngine {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl SentimentEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            smc: SmcAnalyzer::new(&config.smc),
            scorer: ConfidenceScorer::new(&config.confidence),
            config: config.sentiment.clone(),
            regime: config.regime.clone(),
            ob_proximity_pct: config.smc.ob_proximity_pct,
        }
    }

    pub fn analyze(
        &self,
        series: &OhlcvTimeSeries,
        signals: &TechnicalSignals,
        regime: Option<&RegimeContext>,
    ) -> Result<SentimentResult, AnalysisError> {
        self.analyze_detailed(series, signals, regime)
            .map(|(result, _)| result)
    }

    /// Like [`SentimentEngine::analyze`], also handing back the raw detector output.
    pub fn analyze_detailed(
        &self,
        series: &OhlcvTimeSeries,
        signals: &TechnicalSignals,
        regime: Option<&RegimeContext>,
    ) -> Result<(SentimentResult, SmcAnalysis), AnalysisError> {
        let (Some(price), Some(timestamp_ms)) = (series.last_close(), series.last_timestamp_ms())
        else {
            return Err(AnalysisError::EmptySeries {
                symbol: series.symbol.clone(),
                timeframe: series.timeframe,
            });
        };

        let smc = self.smc.analyze(series);
        let aggregate = self.aggregate(signals, &smc);
        let breakdown =
            self.scorer
                .score(aggregate.class, aggregate.raw_score, &aggregate.factors, signals);

        let mut confidence = breakdown.confidence;
        if self.regime.use_confidence_multiplier
            && let Some(ctx) = regime
        {
            confidence *= self.regime.multiplier(ctx.favorability);
        }

        let risk = self.assess_risk(confidence, signals, &aggregate.factors);
        let insights = self.insights(aggregate.class, signals, &smc, regime, price);

        let mut regime_warning = None;
        if self.regime.filter_by_regime
            && let Some(ctx) = regime
            && !self.regime.allowed.contains(&ctx.favorability)
        {
            regime_warning = Some(format!(
                "Current regime ({}) is not in allowed trading regimes",
                ctx.favorability
            ));
            confidence *= self.regime.filtered_confidence_factor;
        }
        let confidence = clamp_unit(confidence);

        #[cfg(debug_assertions)]
        if PRINT_SIGNAL_FUSION {
            log::info!(
                "{} {}: scores bull {:.3} bear {:.3} neutral {:.3} -> {} | sub-scores {:?} -> confidence {:.3}, risk {}",
                series.symbol,
                series.timeframe,
                aggregate.scores.bullish,
                aggregate.scores.bearish,
                aggregate.scores.neutral,
                aggregate.class,
                breakdown,
                confidence,
                risk
            );
        }

        let result = SentimentResult {
            symbol: series.symbol.clone(),
            timeframe: series.timeframe,
            class: aggregate.class,
            confidence,
            risk,
            scores: aggregate.scores,
            raw_score: aggregate.raw_score,
            factors: aggregate.factors,
            insights,
            smc_signal: smc.signal.clone(),
            regime_warning,
            price,
            timestamp_ms,
        };
        Ok((result, smc))
    }

    /// Weighted vote over the indicator families that are present plus the
    /// SMC signal, which always votes.
    pub fn aggregate(&self, signals: &TechnicalSignals, smc: &SmcAnalysis) -> Aggregate {
        let c = &self.config;
        let families: [(Component, Option<&IndicatorSignal>, f64); 4] = [
            (Component::Trend, signals.trend.as_ref(), c.trend_weight),
            (Component::Momentum, signals.momentum.as_ref(), c.momentum_weight),
            (Component::Volatility, signals.volatility.as_ref(), c.volatility_weight),
            (Component::Volume, signals.volume.as_ref(), c.volume_weight),
        ];

        let mut factors: Vec<Factor> = families
            .into_iter()
            .filter_map(|(component, signal, weight)| {
                signal.map(|s| factor(component, s.class, s.confidence, weight))
            })
            .collect();
        factors.push(factor(
            Component::Smc,
            smc.signal.class,
            smc.signal.confidence,
            c.smc_weight,
        ));

        let mut scores = ClassScores::default();
        for f in &factors {
            scores.add(f.class, f.contribution);
        }

        let class = if scores.bullish > scores.bearish && scores.bullish >= c.bullish_threshold {
            SentimentClass::Bullish
        } else if scores.bearish > scores.bullish && scores.bearish >= c.bearish_threshold {
            SentimentClass::Bearish
        } else {
            SentimentClass::Neutral
        };

        // Stable: equal contributions keep their voting order
        factors.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

        Aggregate {
            class,
            raw_score: scores.max(),
            scores,
            factors,
        }
    }

    fn assess_risk(
        &self,
        confidence: f64,
        signals: &TechnicalSignals,
        factors: &[Factor],
    ) -> RiskLevel {
        let mut flags = 0;
        if confidence < self.config.risk_confidence_floor {
            flags += 1;
        }
        if signals.volatility_level == Some(VolatilityLevel::High) {
            flags += 1;
        }

        let bullish = factors
            .iter()
            .filter(|f| f.class == SentimentClass::Bullish)
            .count();
        let bearish = factors
            .iter()
            .filter(|f| f.class == SentimentClass::Bearish)
            .count();
        if bullish.abs_diff(bearish) <= 1 {
            flags += 1;
        }

        RiskLevel::from_flag_count(flags)
    }

    /// Fixed-priority list of observations, capped at `max_insights`.
    fn insights(
        &self,
        class: SentimentClass,
        signals: &TechnicalSignals,
        smc: &SmcAnalysis,
        regime: Option<&RegimeContext>,
        price: f64,
    ) -> Vec<String> {
        let mut insights = Vec::new();

        if let Some(ctx) = regime {
            insights.extend(regime_insights(ctx));
        }

        let trend = smc.structure.state.trend;
        if smc.structure.state.is_defined() {
            if trend.as_class() == class {
                insights.push(format!("Market structure confirms {} bias", class.lowercase()));
            } else {
                insights.push(format!(
                    "Market structure shows {} bias, conflicting with {} sentiment",
                    trend.as_class().lowercase(),
                    class.lowercase()
                ));
            }
        }

        if let Some(ob) = smc.zones.order_blocks.iter().find(|ob| ob.active) {
            let kind = ob.kind.as_class().lowercase();
            let near = price > 0.0 && ob.distance_to(price) / price <= self.ob_proximity_pct;
            if near {
                insights.push(format!(
                    "Price testing active {kind} order block at {:.5}-{:.5}",
                    ob.price_low, ob.price_high
                ));
            } else {
                insights.push(format!(
                    "Active {kind} order block at {:.5}-{:.5}",
                    ob.price_low, ob.price_high
                ));
            }
        }

        match (smc.zones.premium_discount.zone(), class) {
            (Some(PriceZone::Premium), SentimentClass::Bearish) => {
                insights.push("Price in premium zone - favorable for shorts".to_string())
            }
            (Some(PriceZone::Discount), SentimentClass::Bullish) => {
                insights.push("Price in discount zone - favorable for longs".to_string())
            }
            (Some(PriceZone::Equilibrium), _) => {
                insights.push("Price at equilibrium - waiting for direction".to_string())
            }
            _ => {}
        }

        if let Some(rsi) = signals.rsi() {
            if rsi > self.config.rsi_overbought {
                insights.push(format!("RSI overbought at {rsi:.1} - watch for reversal"));
            } else if rsi < self.config.rsi_oversold {
                insights.push(format!("RSI oversold at {rsi:.1} - watch for bounce"));
            }
        }

        if let Some(volume) = &signals.volume {
            if volume.class == class {
                insights.push("Volume confirms price action".to_string());
            } else {
                insights.push("Volume divergence detected - proceed with caution".to_string());
            }
        }

        insights.truncate(self.config.max_insights);
        insights
    }
}

fn factor(component: Component, class: SentimentClass, confidence: f64, weight: f64) -> Factor {
    let confidence = clamp_unit(confidence);
    Factor {
        component,
        class,
        confidence,
        weight,
        contribution: weight * confidence,
    }
}

fn regime_insights(ctx: &RegimeContext) -> Vec<String> {
    let mut out = Vec::new();

    out.push(
        match ctx.favorability {
            Favorability::Favorable => "FAVORABLE market regime - ideal trading conditions",
            Favorability::Moderate => "MODERATE market regime - trade with caution",
            Favorability::Cautious => "CAUTIOUS regime - consider reducing exposure",
            Favorability::Unfavorable => "UNFAVORABLE regime - avoid trading or use minimal size",
        }
        .to_string(),
    );

    if ctx.trending {
        let direction = ctx.trend_direction.lowercase();
        out.push(match ctx.adx {
            Some(adx) => format!("Strong {direction} trend detected (ADX: {adx:.1})"),
            None => format!("Strong {direction} trend detected"),
        });
    } else {
        out.push("Market is ranging - trend-following strategies may struggle".to_string());
    }

    match ctx.volatility {
        VolatilityRegime::VeryHigh => {
            out.push("VERY HIGH volatility - reduce position size".to_string())
        }
        VolatilityRegime::High => out.push("HIGH volatility - reduce position size".to_string()),
        VolatilityRegime::VeryLow => {
            out.push("Very low volatility - potential breakout ahead".to_string())
        }
        VolatilityRegime::Low | VolatilityRegime::Normal => {}
    }

    out
}
