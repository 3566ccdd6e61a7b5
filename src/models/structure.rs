use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::domain::SentimentClass;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SwingKind {
    High,
    Low,
}

/// A local extremum confirmed by a symmetric lookback window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    /// Index into the analysed series
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
    pub timestamp_ms: i64,
}

/// All swing points of a window, each list in index order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SwingPoints {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

impl SwingPoints {
    /// Highs and lows merged by index. At equal index the high comes first.
    pub fn merged(&self) -> Vec<SwingPoint> {
        let mut all: Vec<SwingPoint> = self.highs.iter().chain(self.lows.iter()).copied().collect();
        // Stable sort keeps the high before the low on a shared index
        all.sort_by_key(|s| s.index);
        all
    }

    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendState {
    Bullish,
    Bearish,
    Neutral,
    #[default]
    Undefined,
}

impl TrendState {
    /// Directional vote of the structure; `Undefined` votes like `Neutral`.
    pub fn as_class(&self) -> SentimentClass {
        match self {
            TrendState::Bullish => SentimentClass::Bullish,
            TrendState::Bearish => SentimentClass::Bearish,
            TrendState::Neutral | TrendState::Undefined => SentimentClass::Neutral,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StructureLabel {
    HigherHighsHigherLows,
    LowerHighsLowerLows,
    Consolidation,
    #[default]
    InsufficientData,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MarketStructureState {
    pub trend: TrendState,
    pub label: StructureLabel,
    /// Up to the last three swing highs, oldest first
    pub recent_highs: Vec<SwingPoint>,
    /// Up to the last three swing lows, oldest first
    pub recent_lows: Vec<SwingPoint>,
}

impl MarketStructureState {
    pub fn undefined() -> Self {
        Self::default()
    }

    pub fn is_defined(&self) -> bool {
        self.trend != TrendState::Undefined
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StructureEventKind {
    #[strum(serialize = "BOS")]
    BreakOfStructure,
    #[strum(serialize = "ChOCh")]
    ChangeOfCharacter,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StructureEvent {
    pub kind: StructureEventKind,
    pub direction: SentimentClass,
    /// Kind of the swing that triggered the event
    pub swing_kind: SwingKind,
    pub price: f64,
    pub timestamp_ms: i64,
}

/// Full output of the structure detector for one window.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StructureAnalysis {
    pub swings: SwingPoints,
    pub state: MarketStructureState,
    /// Most recent breaks of structure, oldest first
    pub breaks: Vec<StructureEvent>,
    /// Most recent changes of character, oldest first
    pub changes: Vec<StructureEvent>,
}

impl StructureAnalysis {
    pub fn latest_break(&self) -> Option<&StructureEvent> {
        self.breaks.last()
    }

    pub fn latest_change(&self) -> Option<&StructureEvent> {
        self.changes.last()
    }
}
