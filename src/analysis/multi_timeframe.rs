use std::collections::BTreeMap;

use rayon::prelude::*;
use strum::IntoEnumIterator;

use crate::config::{AnalysisConfig, MtfConfig, PRINT_CONFLUENCE};
use crate::domain::{ClassScores, RiskLevel, SentimentClass, Timeframe};
use crate::models::{
    ClassCounts, ConfluenceResult, DominantSentiment, OhlcvTimeSeries, SentimentResult,
    TimeframeAlignment,
};
use crate::utils::maths_utils::weighted_average;

use super::error::AnalysisError;
use super::indicators::IndicatorProvider;
use super::sentiment_engine::SentimentEngine;

/// Runs the single-timeframe pipeline on every supplied timeframe and fuses
/// the verdicts into one confluence result.
#[derive(Debug, Clone)]
pub struct MultiTimeframeAnalyzer {
    engine: SentimentEngine,
    config: MtfConfig,
}

impl Default for MultiTimeframeAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl MultiTimeframeAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            engine: SentimentEngine::new(config),
            config: config.mtf.clone(),
        }
    }

    /// Empty series are skipped. Every timeframe is independent, so they may run
    /// on the rayon pool; fusion starts only once all of them are back.
    pub fn analyze(
        &self,
        symbol: &str,
        series: &BTreeMap<Timeframe, OhlcvTimeSeries>,
        provider: &dyn IndicatorProvider,
    ) -> Result<ConfluenceResult, AnalysisError> {
        let jobs: Vec<(Timeframe, &OhlcvTimeSeries)> = series
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(tf, s)| (*tf, s))
            .collect();

        let run = |(timeframe, bars): (Timeframe, &OhlcvTimeSeries)| {
            let signals = provider.technical_signals(timeframe, bars);
            let regime = provider.regime(timeframe, bars);
            self.engine
                .analyze(bars, &signals, regime.as_ref())
                .map(|result| (timeframe, result))
        };
        let keep = |outcome: Result<(Timeframe, SentimentResult), AnalysisError>| match outcome {
            Ok(pair) => Some(pair),
            Err(e) => {
                log::error!("Skipping timeframe for {}: {}", symbol, e);
                None
            }
        };

        let results: BTreeMap<Timeframe, SentimentResult> = if self.config.parallel {
            jobs.into_par_iter().map(run).filter_map(keep).collect()
        } else {
            jobs.into_iter().map(run).filter_map(keep).collect()
        };

        self.fuse(symbol, results)
    }

    /// Fuses already computed per-timeframe results.
    pub fn fuse(
        &self,
        symbol: &str,
        results: BTreeMap<Timeframe, SentimentResult>,
    ) -> Result<ConfluenceResult, AnalysisError> {
        if results.is_empty() {
            return Err(AnalysisError::NoTimeframeData {
                symbol: symbol.to_string(),
            });
        }

        let alignment = calculate_alignment(&results, self.config.alignment_threshold);
        let dominant = dominant_sentiment(&results, &self.config);
        let overall_confidence = self.overall_confidence(&results, &alignment);
        let suggestions = self.suggestions(&results, &alignment, &dominant);

        #[cfg(debug_assertions)]
        if PRINT_CONFLUENCE {
            log::info!(
                "{symbol}: alignment {:.2} ({:?}), dominant {} {:.3}, overall {:.3}",
                alignment.score,
                alignment.counts,
                dominant.class,
                dominant.score,
                overall_confidence
            );
        }

        Ok(ConfluenceResult {
            symbol: symbol.to_string(),
            timeframe_results: results,
            alignment,
            dominant,
            overall_confidence,
            suggestions,
        })
    }

    /// Weighted mean confidence plus the alignment bonus, capped at 1.
    fn overall_confidence(
        &self,
        results: &BTreeMap<Timeframe, SentimentResult>,
        alignment: &TimeframeAlignment,
    ) -> f64 {
        let pairs: Vec<(f64, f64)> = results
            .iter()
            .map(|(tf, r)| (r.confidence, self.config.weight_for(*tf)))
            .collect();
        let base = weighted_average(&pairs, 0.0);
        (base + alignment.score * self.config.alignment_bonus).min(1.0)
    }

    fn suggestions(
        &self,
        results: &BTreeMap<Timeframe, SentimentResult>,
        alignment: &TimeframeAlignment,
        dominant: &DominantSentiment,
    ) -> Vec<String> {
        let class = dominant.class;
        let mut out = Vec::new();

        if alignment.aligned && dominant.score > self.config.strong_confluence_threshold {
            out.push(format!(
                "Strong {} confluence across all timeframes",
                class.lowercase()
            ));
            match class {
                SentimentClass::Bullish => out.push(
                    "Consider long positions with higher timeframe confirmation".to_string(),
                ),
                SentimentClass::Bearish => out.push(
                    "Consider short positions with higher timeframe confirmation".to_string(),
                ),
                SentimentClass::Neutral => {}
            }
        } else if !alignment.aligned {
            out.push("Mixed signals across timeframes - wait for clearer direction".to_string());
            out.push("Consider reducing position size due to lack of confluence".to_string());
        }

        if let (Some(d1), Some(h4)) = (results.get(&Timeframe::D1), results.get(&Timeframe::H4))
            && d1.class == class
            && h4.class == class
        {
            out.push(format!("Higher timeframes confirm {} bias", class.lowercase()));
        }

        let entry = results
            .get(&Timeframe::M15)
            .or_else(|| results.get(&Timeframe::H1));
        if let Some(lower) = entry
            && lower.class == class
        {
            out.push("Lower timeframe provides good entry timing".to_string());
        }

        if results.values().any(|r| r.risk == RiskLevel::High) {
            out.push("High risk detected on some timeframes - use tight stops".to_string());
        }

        out.truncate(self.config.max_suggestions);
        out
    }
}

/// Share of timeframes reporting the most common class. Ties go to the class
/// enumerated first (bullish, bearish, neutral).
pub fn calculate_alignment(
    results: &BTreeMap<Timeframe, SentimentResult>,
    threshold: f64,
) -> TimeframeAlignment {
    let mut counts = ClassCounts::default();
    for r in results.values() {
        counts.add(r.class);
    }

    let total = counts.total();
    let mut dominant = SentimentClass::Bullish;
    let mut best = 0;
    for class in SentimentClass::iter() {
        if counts.get(class) > best {
            best = counts.get(class);
            dominant = class;
        }
    }

    let score = if total > 0 {
        best as f64 / total as f64
    } else {
        0.0
    };

    TimeframeAlignment {
        aligned: total > 0 && score >= threshold,
        score,
        dominant,
        counts,
        timeframe_count: total,
    }
}

/// Per-class sums of `weight * confidence`, normalised by the weights of the
/// timeframes actually present.
pub fn dominant_sentiment(
    results: &BTreeMap<Timeframe, SentimentResult>,
    config: &MtfConfig,
) -> DominantSentiment {
    let mut raw = ClassScores::default();
    let mut total_weight = 0.0;
    for (tf, r) in results {
        let weight = config.weight_for(*tf);
        raw.add(r.class, weight * r.confidence);
        total_weight += weight;
    }
    let all_scores = raw.scaled(total_weight);

    let mut class = SentimentClass::Bullish;
    let mut score = f64::NEG_INFINITY;
    for candidate in SentimentClass::iter() {
        if all_scores.get(candidate) > score {
            score = all_scores.get(candidate);
            class = candidate;
        }
    }

    let agreeing: Vec<(f64, f64)> = results
        .iter()
        .filter(|(_, r)| r.class == class)
        .map(|(tf, r)| (r.confidence, config.weight_for(*tf)))
        .collect();

    DominantSentiment {
        class,
        score: score.max(0.0),
        all_scores,
        agreeing_confidence: weighted_average(&agreeing, 0.0),
    }
}
