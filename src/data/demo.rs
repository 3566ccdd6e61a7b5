//! Deterministic synthetic bars for trying the CLI without a data feed.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::domain::{Candle, IndicatorSignal, SentimentClass, TechnicalSignals, Timeframe};

use super::bar_file::BarFile;

pub const DEMO_SYMBOL: &str = "EURUSD";
pub const DEMO_BARS_PER_TIMEFRAME: usize = 200;
// 2024-01-01 00:00 UTC
pub const DEMO_START_MS: i64 = 1_704_067_200_000;

/// (timeframe, drift per bar, swing amplitude, swing period in bars)
const DEMO_SHAPES: [(Timeframe, f64, f64, f64); 4] = [
    (Timeframe::M15, -0.00002, 0.0008, 24.0),
    (Timeframe::H1, 0.00005, 0.0015, 20.0),
    (Timeframe::H4, 0.00010, 0.0030, 18.0),
    (Timeframe::D1, 0.00020, 0.0060, 16.0),
];

/// Oscillating drift around `base`, one bar per step. Wicks are a fixed
/// fraction of the swing amplitude so swing points stay well defined.
pub fn synthetic_bars(
    timeframe: Timeframe,
    base: f64,
    drift: f64,
    amplitude: f64,
    period: f64,
    count: usize,
) -> Vec<Candle> {
    let interval = timeframe.interval_ms();
    let mut candles = Vec::with_capacity(count);
    let mut open = base;

    for i in 0..count {
        let step = i as f64;
        let close = base * (1.0 + drift * step + amplitude * (TAU * step / period).sin());
        let wick = base * amplitude * 0.15;
        let high = open.max(close) + wick;
        let low = open.min(close) - wick;
        let volume = 1_000.0 + 250.0 * (TAU * step / 7.0).cos().abs();

        candles.push(Candle::new(
            DEMO_START_MS + i as i64 * interval,
            open,
            high,
            low,
            close,
            volume,
        ));
        open = close;
    }

    candles
}

pub fn demo_bar_file(bars_per_timeframe: usize) -> BarFile {
    let mut timeframes = BTreeMap::new();
    let mut indicators = BTreeMap::new();

    for (timeframe, drift, amplitude, period) in DEMO_SHAPES {
        let candles = synthetic_bars(timeframe, 1.1000, drift, amplitude, period, bars_per_timeframe);

        // A stand-in trend verdict so the fused output has more than the SMC vote
        let class = if drift > 0.0 {
            SentimentClass::Bullish
        } else {
            SentimentClass::Bearish
        };
        indicators.insert(
            timeframe,
            TechnicalSignals {
                trend: Some(IndicatorSignal::new(class, 0.6)),
                ..Default::default()
            },
        );
        timeframes.insert(timeframe, candles);
    }

    BarFile {
        symbol: DEMO_SYMBOL.to_string(),
        timeframes,
        indicators,
        regimes: BTreeMap::new(),
    }
}
