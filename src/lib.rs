#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use analysis::{
    AnalysisError, IndicatorProvider, MultiTimeframeAnalyzer, NoIndicators, SentimentEngine,
    SmcAnalyzer, StaticIndicators,
};
pub use config::AnalysisConfig;
pub use data::{BarFile, ValidationError};
pub use domain::{Candle, RegimeContext, SentimentClass, TechnicalSignals, Timeframe};
pub use models::{ConfluenceResult, OhlcvTimeSeries, SentimentResult};

use std::path::PathBuf;

use anyhow::{Context, Result};
// CLI argument parsing
use clap::Parser;

use crate::utils::epoch_ms_to_utc;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON bar file: symbol, bars per timeframe, optional indicator verdicts and regimes
    #[arg(long, short)]
    pub input: PathBuf,

    /// JSON file overriding the default analysis configuration
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Analyse a single timeframe instead of multi-timeframe confluence
    #[arg(long, short)]
    pub timeframe: Option<Timeframe>,

    /// Print a human readable summary instead of JSON
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}

/// Runs the analysis the CLI asked for and renders the output.
/// This is the public API for the binary to call
pub fn run(cli: &Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    let bars = BarFile::load_from_path(&cli.input)?.into_series()?;
    log::info!(
        "Loaded {} timeframe(s) for {} from {}",
        bars.series.len(),
        bars.symbol,
        cli.input.display()
    );

    match cli.timeframe {
        Some(timeframe) => {
            let series = bars.series.get(&timeframe).with_context(|| {
                format!("No bars for {} in {}", timeframe, cli.input.display())
            })?;
            let signals = bars.indicators.technical_signals(timeframe, series);
            let regime = bars.indicators.regime(timeframe, series);
            let result = SentimentEngine::new(&config).analyze(series, &signals, regime.as_ref())?;

            if cli.summary {
                Ok(format!(
                    "{} {} @ {} ({:.5})\n{}\nConfidence {}, signal strength {:.2}",
                    result.symbol,
                    timeframe,
                    epoch_ms_to_utc(result.timestamp_ms),
                    result.price,
                    result.summary(),
                    result.confidence_label(),
                    result.signal_strength()
                ))
            } else {
                serde_json::to_string_pretty(&result).context("Failed to serialize sentiment result")
            }
        }
        None => {
            let result =
                MultiTimeframeAnalyzer::new(&config).analyze(&bars.symbol, &bars.series, &bars.indicators)?;

            if cli.summary {
                let mut lines = vec![format!("{}: {}", result.symbol, result.summary())];
                lines.extend(result.timeframe_lines());
                lines.extend(result.suggestions.iter().map(|s| format!("  - {s}")));
                Ok(lines.join("\n"))
            } else {
                serde_json::to_string_pretty(&result).context("Failed to serialize confluence result")
            }
        }
    }
}
