//! Boundary validation of raw bars.
//!
//! The detectors assume validated input and never re-check it; anything that
//! fails here is surfaced to the caller instead of being analysed.

use thiserror::Error;

use crate::domain::Candle;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("bar series is empty")]
    Empty,

    #[error("bar {index}: timestamp {current} is not after previous timestamp {previous}")]
    NonIncreasingTimestamp {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("bar {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: &'static str },

    #[error("bar {index}: {field} must be positive, got {value}")]
    NonPositivePrice {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("bar {index}: volume must not be negative, got {value}")]
    NegativeVolume { index: usize, value: f64 },

    #[error("bar {index}: inconsistent OHLC ({reason})")]
    InconsistentOhlc { index: usize, reason: &'static str },
}

pub fn validate_candles(candles: &[Candle]) -> Result<(), ValidationError> {
    if candles.is_empty() {
        return Err(ValidationError::Empty);
    }

    for (index, candle) in candles.iter().enumerate() {
        validate_candle(index, candle)?;

        if index > 0 {
            let previous = candles[index - 1].timestamp_ms;
            if candle.timestamp_ms <= previous {
                return Err(ValidationError::NonIncreasingTimestamp {
                    index,
                    previous,
                    current: candle.timestamp_ms,
                });
            }
        }
    }

    Ok(())
}

fn validate_candle(index: usize, candle: &Candle) -> Result<(), ValidationError> {
    let prices = [
        ("open", candle.open),
        ("high", candle.high),
        ("low", candle.low),
        ("close", candle.close),
    ];

    for (field, value) in prices {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { index, field });
        }
        if value <= 0.0 {
            return Err(ValidationError::NonPositivePrice {
                index,
                field,
                value,
            });
        }
    }

    if !candle.volume.is_finite() {
        return Err(ValidationError::NonFinite {
            index,
            field: "volume",
        });
    }
    if candle.volume < 0.0 {
        return Err(ValidationError::NegativeVolume {
            index,
            value: candle.volume,
        });
    }

    let reason = if candle.high < candle.low {
        Some("high < low")
    } else if candle.high < candle.open.max(candle.close) {
        Some("high below body")
    } else if candle.low > candle.open.min(candle.close) {
        Some("low above body")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError::InconsistentOhlc { index, reason }),
        None => Ok(()),
    }
}
