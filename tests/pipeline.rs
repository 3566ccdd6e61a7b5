use std::path::PathBuf;

use smc_sentiment::data::demo::{DEMO_SYMBOL, demo_bar_file};
use smc_sentiment::{AnalysisConfig, BarFile, Cli, MultiTimeframeAnalyzer, Timeframe, run};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("smc_sentiment_{}_{}.json", name, std::process::id()))
}

fn analyzer(parallel: bool) -> MultiTimeframeAnalyzer {
    let mut config = AnalysisConfig::default();
    config.mtf.parallel = parallel;
    MultiTimeframeAnalyzer::new(&config)
}

#[test]
fn repeated_runs_are_identical() {
    let bars = demo_bar_file(120).into_series().unwrap();
    let analyzer = analyzer(true);

    let first = analyzer
        .analyze(&bars.symbol, &bars.series, &bars.indicators)
        .unwrap();
    let second = analyzer
        .analyze(&bars.symbol, &bars.series, &bars.indicators)
        .unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(first.timeframe_results.len(), 4);
    assert!((0.0..=1.0).contains(&first.overall_confidence));
}

#[test]
fn parallel_and_sequential_agree() {
    let bars = demo_bar_file(120).into_series().unwrap();

    let parallel = analyzer(true)
        .analyze(&bars.symbol, &bars.series, &bars.indicators)
        .unwrap();
    let sequential = analyzer(false)
        .analyze(&bars.symbol, &bars.series, &bars.indicators)
        .unwrap();

    assert_eq!(
        serde_json::to_value(&parallel).unwrap(),
        serde_json::to_value(&sequential).unwrap()
    );
}

#[test]
fn bar_file_survives_disk() {
    let path = temp_path("roundtrip");
    let original = demo_bar_file(30);
    original.save_to_path(&path).unwrap();
    let loaded = BarFile::load_from_path(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.symbol, DEMO_SYMBOL);
    assert_eq!(loaded.indicators, original.indicators);
    for (timeframe, candles) in &original.timeframes {
        let reloaded = &loaded.timeframes[timeframe];
        assert_eq!(reloaded.len(), candles.len());
        for (a, b) in candles.iter().zip(reloaded) {
            assert_eq!(a.timestamp_ms, b.timestamp_ms);
            assert!((a.close - b.close).abs() < 1e-12);
            assert!((a.volume - b.volume).abs() < 1e-9);
        }
    }
}

#[test]
fn missing_bar_file_is_an_error() {
    let err = BarFile::load_from_path(&temp_path("does_not_exist")).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to open bar file"));
}

#[test]
fn cli_renders_summary_and_json() {
    let path = temp_path("cli");
    demo_bar_file(80).save_to_path(&path).unwrap();

    let mut cli = Cli {
        input: path.clone(),
        config: None,
        timeframe: None,
        summary: true,
    };
    let summary = run(&cli).unwrap();
    assert!(summary.starts_with("EURUSD: "));
    assert!(summary.contains("\n  4h: "));

    cli.summary = false;
    let json: serde_json::Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();
    assert_eq!(json["symbol"], "EURUSD");
    assert_eq!(json["timeframe_results"].as_object().map(|m| m.len()), Some(4));

    cli.timeframe = Some(Timeframe::H1);
    let json: serde_json::Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();
    assert_eq!(json["timeframe"], "H1");
    assert!(json["factors"].as_array().is_some_and(|f| !f.is_empty()));

    cli.summary = true;
    let summary = run(&cli).unwrap();
    assert!(summary.starts_with("EURUSD H1 @ "));
    assert!(summary.contains("\nConfidence "));
    assert!(summary.contains(", signal strength "));

    cli.timeframe = Some(Timeframe::W1);
    let err = run(&cli).unwrap_err();
    assert!(err.to_string().contains("No bars for W1"));

    std::fs::remove_file(&path).ok();
}
