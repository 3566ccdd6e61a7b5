use serde::Serialize;

use crate::data::validator::{ValidationError, validate_candles};
use crate::domain::{Candle, Timeframe};

// ============================================================================
// OhlcvTimeSeries: validated, column-oriented bar series for one symbol/timeframe
// ============================================================================

/// Only constructible through [`OhlcvTimeSeries::from_candles`], so every
/// series reaching the detectors has strictly increasing timestamps and
/// consistent OHLC values.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OhlcvTimeSeries {
    pub symbol: String,
    pub timeframe: Timeframe,

    pub timestamps_ms: Vec<i64>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    pub volumes: Vec<f64>,
}

impl OhlcvTimeSeries {
    pub fn from_candles(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        candles: &[Candle],
    ) -> Result<Self, ValidationError> {
        validate_candles(candles)?;

        Ok(OhlcvTimeSeries {
            symbol: symbol.into(),
            timeframe,
            timestamps_ms: candles.iter().map(|c| c.timestamp_ms).collect(),
            open_prices: candles.iter().map(|c| c.open).collect(),
            high_prices: candles.iter().map(|c| c.high).collect(),
            low_prices: candles.iter().map(|c| c.low).collect(),
            close_prices: candles.iter().map(|c| c.close).collect(),
            volumes: candles.iter().map(|c| c.volume).collect(),
        })
    }

    pub fn get_candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.timestamps_ms[idx],
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn candles(&self) -> impl Iterator<Item = Candle> + '_ {
        (0..self.klines()).map(|i| self.get_candle(i))
    }

    pub fn klines(&self) -> usize {
        self.close_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close_prices.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.close_prices.last().copied()
    }

    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.timestamps_ms.last().copied()
    }

    /// Copy of the most recent `count` bars (the whole series if shorter).
    pub fn most_recent(&self, count: usize) -> OhlcvTimeSeries {
        let start = self.klines().saturating_sub(count);
        OhlcvTimeSeries {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            timestamps_ms: self.timestamps_ms[start..].to_vec(),
            open_prices: self.open_prices[start..].to_vec(),
            high_prices: self.high_prices[start..].to_vec(),
            low_prices: self.low_prices[start..].to_vec(),
            close_prices: self.close_prices[start..].to_vec(),
            volumes: self.volumes[start..].to_vec(),
        }
    }
}
