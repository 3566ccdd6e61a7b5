use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
    Doji,
}

/// A single OHLCV bar. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Candle {
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // Unlike the chart view, a flat body is its own type here: order-block
    // detection needs strictly down or strictly up candles.
    pub fn get_type(&self) -> CandleType {
        if self.close > self.open {
            CandleType::Bullish
        } else if self.close < self.open {
            CandleType::Bearish
        } else {
            CandleType::Doji
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.get_type() == CandleType::Bullish
    }

    pub fn is_bearish(&self) -> bool {
        self.get_type() == CandleType::Bearish
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        if self.close >= self.open {
            (self.open, self.close)
        } else {
            (self.close, self.open)
        }
    }

    /// Absolute body size.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full high-to-low range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Body as a fraction of the full range. `None` for a zero-range bar.
    pub fn body_ratio(&self) -> Option<f64> {
        let range = self.range();
        if range > 0.0 {
            Some(self.body() / range)
        } else {
            None
        }
    }

    /// Distance from the high down to the close, as a fraction of the range.
    pub fn upper_rejection_ratio(&self) -> Option<f64> {
        let range = self.range();
        if range > 0.0 {
            Some((self.high - self.close) / range)
        } else {
            None
        }
    }

    /// Distance from the low up to the close, as a fraction of the range.
    pub fn lower_rejection_ratio(&self) -> Option<f64> {
        let range = self.range();
        if range > 0.0 {
            Some((self.close - self.low) / range)
        } else {
            None
        }
    }

    /// True if the bar traded anywhere inside `[low, high]`.
    pub fn overlaps(&self, low: f64, high: f64) -> bool {
        self.low <= high && self.high >= low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candle_type_and_body() {
        let down = Candle::new(0, 1.1000, 1.1010, 1.0940, 1.0950, 100.0);
        assert_eq!(down.get_type(), CandleType::Bearish);
        assert!((down.body() - 0.0050).abs() < 1e-12);
        assert_eq!(down.body_range(), (1.0950, 1.1000));

        let flat = Candle::new(0, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert_eq!(flat.get_type(), CandleType::Doji);
        assert_eq!(flat.body_ratio(), None);
    }

    #[test]
    fn rejection_ratios() {
        let pin = Candle::new(0, 10.0, 14.0, 9.5, 10.0, 1.0);
        let upper = pin.upper_rejection_ratio().unwrap();
        assert!((upper - 4.0 / 4.5).abs() < 1e-12);
        let lower = pin.lower_rejection_ratio().unwrap();
        assert!((lower - 0.5 / 4.5).abs() < 1e-12);
    }
}
