//! Seam to the external indicator and regime layers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{RegimeContext, TechnicalSignals, Timeframe};
use crate::models::OhlcvTimeSeries;

/// Supplies pre-computed indicator verdicts for a window of bars.
/// Shared across worker threads during multi-timeframe analysis.
pub trait IndicatorProvider: Sync {
    fn technical_signals(&self, timeframe: Timeframe, series: &OhlcvTimeSeries) -> TechnicalSignals;

    fn regime(&self, _timeframe: Timeframe, _series: &OhlcvTimeSeries) -> Option<RegimeContext> {
        None
    }
}

/// Structure-only analysis: every indicator family is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicators;

impl IndicatorProvider for NoIndicators {
    fn technical_signals(&self, _timeframe: Timeframe, _series: &OhlcvTimeSeries) -> TechnicalSignals {
        TechnicalSignals::default()
    }
}

/// Fixed per-timeframe tables, e.g. read from a bar file next to the bars.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StaticIndicators {
    pub signals: BTreeMap<Timeframe, TechnicalSignals>,
    pub regimes: BTreeMap<Timeframe, RegimeContext>,
}

impl StaticIndicators {
    pub fn with_signals(mut self, timeframe: Timeframe, signals: TechnicalSignals) -> Self {
        self.signals.insert(timeframe, signals);
        self
    }

    pub fn with_regime(mut self, timeframe: Timeframe, regime: RegimeContext) -> Self {
        self.regimes.insert(timeframe, regime);
        self
    }
}

impl IndicatorProvider for StaticIndicators {
    fn technical_signals(&self, timeframe: Timeframe, _series: &OhlcvTimeSeries) -> TechnicalSignals {
        self.signals.get(&timeframe).cloned().unwrap_or_default()
    }

    fn regime(&self, timeframe: Timeframe, _series: &OhlcvTimeSeries) -> Option<RegimeContext> {
        self.regimes.get(&timeframe).cloned()
    }
}
