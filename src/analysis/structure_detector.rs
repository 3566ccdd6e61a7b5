use itertools::Itertools;

use crate::config::{PRINT_SWING_DETECTION, SmcConfig};
use crate::domain::SentimentClass;
use crate::models::{
    MarketStructureState, OhlcvTimeSeries, StructureAnalysis, StructureEvent, StructureEventKind,
    StructureLabel, SwingKind, SwingPoint, SwingPoints, TrendState,
};
use crate::utils::Retained;

const RECENT_SWINGS: usize = 3;

/// Swing points, trend classification and BOS/ChOCh events for one window.
#[derive(Debug, Clone)]
pub struct StructureDetector {
    pub lookback_left: usize,
    pub lookback_right: usize,
    pub events_retained: usize,
}

impl StructureDetector {
    pub fn new(config: &SmcConfig) -> Self {
        Self {
            lookback_left: config.swing_lookback_left,
            lookback_right: config.swing_lookback_right,
            events_retained: config.structure_events_retained,
        }
    }

    pub fn analyze(&self, series: &OhlcvTimeSeries) -> StructureAnalysis {
        let swings = detect_swing_points(series, self.lookback_left, self.lookback_right);
        let state = classify_structure(&swings);
        let (breaks, changes) = detect_structure_events(&swings, state.trend, self.events_retained);

        #[cfg(debug_assertions)]
        if PRINT_SWING_DETECTION {
            log::info!(
                "{} {}: {} swing highs, {} swing lows -> {} ({}), {} BOS, {} ChOCh",
                series.symbol,
                series.timeframe,
                swings.highs.len(),
                swings.lows.len(),
                state.trend,
                state.label,
                breaks.len(),
                changes.len()
            );
        }

        StructureAnalysis {
            swings,
            state,
            breaks,
            changes,
        }
    }
}

/// Marks index `i` as a swing high when its high is strictly above every other
/// high in `[i - left, i + right]` (swing low: strictly below every other low).
/// Ties disqualify the bar. Only interior indices with a full window qualify.
pub fn detect_swing_points(series: &OhlcvTimeSeries, left: usize, right: usize) -> SwingPoints {
    let n = series.klines();
    let mut swings = SwingPoints::default();
    if n < left + right + 1 {
        return swings;
    }

    for i in left..n - right {
        let window = (i - left)..=(i + right);

        let high = series.high_prices[i];
        let is_swing_high = window
            .clone()
            .filter(|&j| j != i)
            .all(|j| series.high_prices[j] < high);
        if is_swing_high {
            swings.highs.push(SwingPoint {
                index: i,
                price: high,
                kind: SwingKind::High,
                timestamp_ms: series.timestamps_ms[i],
            });
        }

        let low = series.low_prices[i];
        let is_swing_low = window
            .filter(|&j| j != i)
            .all(|j| series.low_prices[j] > low);
        if is_swing_low {
            swings.lows.push(SwingPoint {
                index: i,
                price: low,
                kind: SwingKind::Low,
                timestamp_ms: series.timestamps_ms[i],
            });
        }
    }

    swings
}

fn last_n(points: &[SwingPoint], n: usize) -> Vec<SwingPoint> {
    points[points.len().saturating_sub(n)..].to_vec()
}

fn rising_pairs(points: &[SwingPoint]) -> usize {
    points
        .iter()
        .tuple_windows()
        .filter(|(a, b)| b.price > a.price)
        .count()
}

/// Trend from the last three swing highs and lows.
pub fn classify_structure(swings: &SwingPoints) -> MarketStructureState {
    if swings.highs.len() < 2 || swings.lows.len() < 2 {
        return MarketStructureState::undefined();
    }

    let recent_highs = last_n(&swings.highs, RECENT_SWINGS);
    let recent_lows = last_n(&swings.lows, RECENT_SWINGS);
    let higher_highs = rising_pairs(&recent_highs);
    let higher_lows = rising_pairs(&recent_lows);

    let (trend, label) = if higher_highs >= 2 && higher_lows >= 2 {
        (TrendState::Bullish, StructureLabel::HigherHighsHigherLows)
    } else if higher_highs == 0 && higher_lows == 0 {
        (TrendState::Bearish, StructureLabel::LowerHighsLowerLows)
    } else {
        (TrendState::Neutral, StructureLabel::Consolidation)
    };

    MarketStructureState {
        trend,
        label,
        recent_highs,
        recent_lows,
    }
}

/// Breaks of structure and changes of character over the merged swing
/// sequence. Returns `(breaks, changes)`, each the most recent `retained`
/// events, oldest first. An undefined structure yields no events.
pub fn detect_structure_events(
    swings: &SwingPoints,
    trend: TrendState,
    retained: usize,
) -> (Vec<StructureEvent>, Vec<StructureEvent>) {
    let mut breaks = Retained::with_capacity(retained);
    let mut changes = Retained::with_capacity(retained);
    if trend == TrendState::Undefined {
        return (breaks.into_vec(), changes.into_vec());
    }

    let merged = swings.merged();
    let mut last_high: Option<f64> = None;
    let mut last_low: Option<f64> = None;
    let mut previous: Option<&SwingPoint> = None;

    for swing in &merged {
        let break_direction = match (trend, swing.kind) {
            (TrendState::Bullish, SwingKind::High) => last_high
                .filter(|&prior| swing.price > prior)
                .map(|_| SentimentClass::Bullish),
            (TrendState::Bearish, SwingKind::Low) => last_low
                .filter(|&prior| swing.price < prior)
                .map(|_| SentimentClass::Bearish),
            _ => None,
        };
        if let Some(direction) = break_direction {
            breaks.push(StructureEvent {
                kind: StructureEventKind::BreakOfStructure,
                direction,
                swing_kind: swing.kind,
                price: swing.price,
                timestamp_ms: swing.timestamp_ms,
            });
        }

        if let Some(prev) = previous
            && prev.kind != swing.kind
        {
            let direction = match swing.kind {
                SwingKind::High => SentimentClass::Bullish,
                SwingKind::Low => SentimentClass::Bearish,
            };
            changes.push(StructureEvent {
                kind: StructureEventKind::ChangeOfCharacter,
                direction,
                swing_kind: swing.kind,
                price: swing.price,
                timestamp_ms: swing.timestamp_ms,
            });
        }

        match swing.kind {
            SwingKind::High => last_high = Some(swing.price),
            SwingKind::Low => last_low = Some(swing.price),
        }
        previous = Some(swing);
    }

    (breaks.into_vec(), changes.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, Timeframe};

    /// One bar per mid price, +-0.5 wicks, flat body.
    fn series_from_mids(mids: &[f64]) -> OhlcvTimeSeries {
        let candles: Vec<Candle> = mids
            .iter()
            .enumerate()
            .map(|(i, &m)| Candle::new(i as i64 * 60_000, m, m + 0.5, m - 0.5, m, 100.0))
            .collect();
        OhlcvTimeSeries::from_candles("TEST", Timeframe::M1, &candles).unwrap()
    }

    fn point(index: usize, price: f64, kind: SwingKind) -> SwingPoint {
        SwingPoint {
            index,
            price,
            kind,
            timestamp_ms: index as i64,
        }
    }

    #[test]
    fn swings_require_strict_extremes() {
        let series = series_from_mids(&[10.0, 12.0, 10.0, 12.0, 12.0, 10.0, 11.0]);
        let swings = detect_swing_points(&series, 1, 1);
        // index 1 is a strict high; 3 and 4 tie with each other
        assert_eq!(swings.highs.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1]);
        assert_eq!(swings.lows.iter().map(|s| s.index).collect::<Vec<_>>(), vec![2, 5]);
    }

    #[test]
    fn short_series_has_no_swings() {
        let series = series_from_mids(&[1.0, 2.0, 1.0]);
        assert!(detect_swing_points(&series, 5, 5).is_empty());
    }

    #[test]
    fn rising_zigzag_is_bullish() {
        let series = series_from_mids(&[10.0, 12.0, 10.0, 13.0, 11.0, 14.0, 12.0, 15.0, 13.0]);
        let detector = StructureDetector {
            lookback_left: 1,
            lookback_right: 1,
            events_retained: 5,
        };
        let analysis = detector.analyze(&series);

        assert_eq!(analysis.swings.highs.len(), 4);
        assert_eq!(analysis.swings.lows.len(), 3);
        assert_eq!(analysis.state.trend, TrendState::Bullish);
        assert_eq!(analysis.state.label, StructureLabel::HigherHighsHigherLows);
        assert_eq!(analysis.state.recent_highs.len(), 3);

        // every high after the first breaks the one before it
        assert_eq!(analysis.breaks.len(), 3);
        assert!(analysis.breaks.iter().all(|e| e.direction == SentimentClass::Bullish));
        assert_eq!(analysis.latest_break().map(|e| e.price), Some(15.5));

        // six alternations, only the last five kept
        assert_eq!(analysis.changes.len(), 5);
        assert_eq!(analysis.changes[0].price, 13.5);
        assert_eq!(analysis.latest_change().map(|e| e.direction), Some(SentimentClass::Bullish));
    }

    #[test]
    fn classification_branches() {
        let falling = SwingPoints {
            highs: vec![point(1, 15.0, SwingKind::High), point(5, 14.0, SwingKind::High)],
            lows: vec![point(3, 10.0, SwingKind::Low), point(7, 9.0, SwingKind::Low)],
        };
        let state = classify_structure(&falling);
        assert_eq!(state.trend, TrendState::Bearish);
        assert_eq!(state.label, StructureLabel::LowerHighsLowerLows);

        let mixed = SwingPoints {
            highs: vec![point(1, 15.0, SwingKind::High), point(5, 16.0, SwingKind::High)],
            lows: vec![point(3, 10.0, SwingKind::Low), point(7, 9.0, SwingKind::Low)],
        };
        assert_eq!(classify_structure(&mixed).trend, TrendState::Neutral);

        let sparse = SwingPoints {
            highs: vec![point(1, 15.0, SwingKind::High)],
            lows: vec![point(3, 10.0, SwingKind::Low), point(7, 9.0, SwingKind::Low)],
        };
        let state = classify_structure(&sparse);
        assert_eq!(state.trend, TrendState::Undefined);
        assert_eq!(state.label, StructureLabel::InsufficientData);
    }

    #[test]
    fn bearish_breaks_compare_lows_only() {
        let swings = SwingPoints {
            highs: vec![point(2, 20.0, SwingKind::High), point(6, 19.0, SwingKind::High)],
            lows: vec![
                point(4, 15.0, SwingKind::Low),
                point(8, 14.0, SwingKind::Low),
                point(9, 14.5, SwingKind::Low),
            ],
        };
        let (breaks, changes) = detect_structure_events(&swings, TrendState::Bearish, 5);
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].price, 14.0);
        assert_eq!(breaks[0].direction, SentimentClass::Bearish);
        // H L H L L: three alternations
        assert_eq!(changes.len(), 3);

        let (breaks, changes) = detect_structure_events(&swings, TrendState::Undefined, 5);
        assert!(breaks.is_empty() && changes.is_empty());
    }
}
