use anyhow::Result;
use std::path::PathBuf;

use smc_sentiment::data::demo::{DEMO_BARS_PER_TIMEFRAME, demo_bar_file};

const DEMO_OUTPUT_PATH: &str = "demo_bars.json";

fn main() -> Result<()> {
    build_demo_bars()
}

fn build_demo_bars() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEMO_OUTPUT_PATH));

    let file = demo_bar_file(DEMO_BARS_PER_TIMEFRAME);
    file.save_to_path(&output_path)?;

    println!(
        "✅ Demo bars written to {:?}: {} with {} timeframes of {} bars.",
        output_path,
        file.symbol,
        file.timeframes.len(),
        DEMO_BARS_PER_TIMEFRAME
    );
    Ok(())
}
