use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Directional verdict. Iteration order (Bullish, Bearish, Neutral) is the
/// tie-break order wherever a "first class reaching the max" rule applies.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentClass {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl SentimentClass {
    pub fn is_directional(&self) -> bool {
        !matches!(self, SentimentClass::Neutral)
    }

    pub fn lowercase(&self) -> &'static str {
        match self {
            SentimentClass::Bullish => "bullish",
            SentimentClass::Bearish => "bearish",
            SentimentClass::Neutral => "neutral",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// 0 flags -> LOW, 1 -> MEDIUM, 2+ -> HIGH
    pub fn from_flag_count(flags: usize) -> Self {
        match flags {
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

/// Per-class accumulated scores of a fusing stage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassScores {
    pub bullish: f64,
    pub bearish: f64,
    pub neutral: f64,
}

impl ClassScores {
    pub fn add(&mut self, class: SentimentClass, amount: f64) {
        match class {
            SentimentClass::Bullish => self.bullish += amount,
            SentimentClass::Bearish => self.bearish += amount,
            SentimentClass::Neutral => self.neutral += amount,
        }
    }

    pub fn get(&self, class: SentimentClass) -> f64 {
        match class {
            SentimentClass::Bullish => self.bullish,
            SentimentClass::Bearish => self.bearish,
            SentimentClass::Neutral => self.neutral,
        }
    }

    pub fn max(&self) -> f64 {
        self.bullish.max(self.bearish).max(self.neutral)
    }

    pub fn scaled(&self, divisor: f64) -> Self {
        if divisor > 0.0 {
            Self {
                bullish: self.bullish / divisor,
                bearish: self.bearish / divisor,
                neutral: self.neutral / divisor,
            }
        } else {
            *self
        }
    }
}

/// Output of every fusing stage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Signal {
    pub class: SentimentClass,
    pub confidence: f64,
    /// Weighted votes that produced the verdict, in the order they were cast.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<SignalComponent>,
}

impl Signal {
    pub fn neutral() -> Self {
        Self {
            class: SentimentClass::Neutral,
            confidence: 0.0,
            components: Vec::new(),
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Detector behind one SMC vote.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VoteSource {
    Structure,
    OrderBlocks,
    PremiumDiscount,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignalComponent {
    pub source: VoteSource,
    pub class: SentimentClass,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_labels_serialize_upper_case() {
        assert_eq!(SentimentClass::Bullish.to_string(), "BULLISH");
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }

    #[test]
    fn vote_sources_serialize_snake_case() {
        let json = serde_json::to_string(&VoteSource::PremiumDiscount).unwrap();
        assert_eq!(json, "\"premium_discount\"");
        assert_eq!(VoteSource::OrderBlocks.to_string(), "order_blocks");
    }

    #[test]
    fn risk_from_flags() {
        assert_eq!(RiskLevel::from_flag_count(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_flag_count(1), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_flag_count(3), RiskLevel::High);
    }
}
