use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::StaticIndicators;
use crate::domain::{Candle, RegimeContext, TechnicalSignals, Timeframe};
use crate::models::OhlcvTimeSeries;

/// On-disk input of the CLI: bars per timeframe, optionally with the
/// indicator verdicts and regimes computed for them upstream.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BarFile {
    pub symbol: String,
    pub timeframes: BTreeMap<Timeframe, Vec<Candle>>,
    #[serde(default)]
    pub indicators: BTreeMap<Timeframe, TechnicalSignals>,
    #[serde(default)]
    pub regimes: BTreeMap<Timeframe, RegimeContext>,
}

/// Validated content of a [`BarFile`], ready for analysis.
#[derive(Debug, Clone)]
pub struct LoadedBars {
    pub symbol: String,
    pub series: BTreeMap<Timeframe, OhlcvTimeSeries>,
    pub indicators: StaticIndicators,
}

impl BarFile {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse bar file")
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open bar file: {:?}", path))?;
        let reader = BufReader::new(file);
        let bars = serde_json::from_reader(reader)
            .context(format!("Failed to deserialize bar file: {:?}", path))?;
        Ok(bars)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .context(format!("Failed to serialize bar file to: {}", path.display()))
    }

    /// Validates every non-empty timeframe. Empty ones are dropped with a
    /// warning; a malformed one fails the whole file.
    pub fn into_series(self) -> Result<LoadedBars> {
        let mut series = BTreeMap::new();

        for (timeframe, candles) in self.timeframes {
            if candles.is_empty() {
                log::warn!("{} {}: no bars, skipping", self.symbol, timeframe);
                continue;
            }

            let ts = OhlcvTimeSeries::from_candles(self.symbol.clone(), timeframe, &candles)
                .with_context(|| format!("Invalid bars for {} {}", self.symbol, timeframe))?;

            let gaps = count_gaps(&ts);
            if gaps > 0 {
                log::warn!(
                    "{} {}: {} of {} bar spacings differ from {}",
                    self.symbol,
                    timeframe,
                    gaps,
                    ts.klines() - 1,
                    timeframe.short_name()
                );
            }
            series.insert(timeframe, ts);
        }

        Ok(LoadedBars {
            symbol: self.symbol,
            series,
            indicators: StaticIndicators {
                signals: self.indicators,
                regimes: self.regimes,
            },
        })
    }
}

/// Consecutive bars whose spacing is not exactly one interval.
fn count_gaps(series: &OhlcvTimeSeries) -> usize {
    let interval = series.timeframe.interval_ms();
    series
        .timestamps_ms
        .windows(2)
        .filter(|w| w[1] - w[0] != interval)
        .count()
}
