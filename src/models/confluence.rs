use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ClassScores, SentimentClass, Timeframe};

use super::sentiment_result::SentimentResult;

/// How many timeframes reported each class.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

impl ClassCounts {
    pub fn add(&mut self, class: SentimentClass) {
        match class {
            SentimentClass::Bullish => self.bullish += 1,
            SentimentClass::Bearish => self.bearish += 1,
            SentimentClass::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, class: SentimentClass) -> usize {
        match class {
            SentimentClass::Bullish => self.bullish,
            SentimentClass::Bearish => self.bearish,
            SentimentClass::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.bullish + self.bearish + self.neutral
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeframeAlignment {
    pub aligned: bool,
    /// Share of timeframes reporting the modal class
    pub score: f64,
    pub dominant: SentimentClass,
    pub counts: ClassCounts,
    pub timeframe_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DominantSentiment {
    pub class: SentimentClass,
    /// Winning class score, normalised by the weights of the timeframes present
    pub score: f64,
    pub all_scores: ClassScores,
    /// Weighted mean confidence of the timeframes that agree with `class`
    pub agreeing_confidence: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfluenceResult {
    pub symbol: String,
    pub timeframe_results: BTreeMap<Timeframe, SentimentResult>,
    pub alignment: TimeframeAlignment,
    pub dominant: DominantSentiment,
    pub overall_confidence: f64,
    pub suggestions: Vec<String>,
}

impl ConfluenceResult {
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} sentiment with {:.0}% confidence. ",
            self.dominant.class,
            self.overall_confidence * 100.0
        );
        if self.alignment.aligned {
            text.push_str(&format!(
                "All timeframes aligned ({:.0}% agreement). ",
                self.alignment.score * 100.0
            ));
        } else {
            text.push_str(&format!(
                "Mixed signals ({:.0}% agreement). ",
                self.alignment.score * 100.0
            ));
        }
        if let Some(first) = self.suggestions.first() {
            text.push_str(first);
        }
        text.trim_end().to_string()
    }

    /// One line per timeframe, ascending duration.
    pub fn timeframe_lines(&self) -> Vec<String> {
        self.timeframe_results
            .iter()
            .map(|(timeframe, result)| {
                format!(
                    "{:>4}: {} ({:.0}%, risk {})",
                    timeframe.short_name(),
                    result.class,
                    result.confidence * 100.0,
                    result.risk
                )
            })
            .collect()
    }
}
