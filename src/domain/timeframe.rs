use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::utils::TimeUtils;

/// Bar granularity. Variant order is ascending duration, which is also the
/// iteration order of any `BTreeMap<Timeframe, _>`.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
    MN1,
}

impl Timeframe {
    pub fn interval_ms(&self) -> i64 {
        match self {
            Timeframe::M1 => TimeUtils::MS_IN_MIN,
            Timeframe::M5 => TimeUtils::MS_IN_5_MIN,
            Timeframe::M15 => TimeUtils::MS_IN_15_MIN,
            Timeframe::M30 => TimeUtils::MS_IN_30_MIN,
            Timeframe::H1 => TimeUtils::MS_IN_H,
            Timeframe::H4 => TimeUtils::MS_IN_4_H,
            Timeframe::D1 => TimeUtils::MS_IN_D,
            Timeframe::W1 => TimeUtils::MS_IN_W,
            Timeframe::MN1 => TimeUtils::MS_IN_1_M,
        }
    }

    /// Binance-style shorthand (`15m`, `4h`, ...), handy for log lines.
    pub fn short_name(&self) -> &'static str {
        TimeUtils::interval_to_string(self.interval_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(Timeframe::from_str("H4").unwrap(), Timeframe::H4);
        assert_eq!(Timeframe::from_str("m15").unwrap(), Timeframe::M15);
        assert!(Timeframe::from_str("H3").is_err());
    }

    #[test]
    fn ordering_follows_duration() {
        let durations: Vec<i64> = Timeframe::iter().map(|tf| tf.interval_ms()).collect();
        assert!(durations.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Timeframe::H1.short_name(), "1h");
        assert_eq!(Timeframe::D1.to_string(), "D1");
    }
}
