use clap::Parser;

use smc_sentiment::{Cli, run};

fn main() -> anyhow::Result<()> {
    // A. Init Logging (RUST_LOG wins over the Info default)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Analyse and print
    let output = run(&args)?;
    println!("{output}");
    Ok(())
}
