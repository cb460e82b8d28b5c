use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use toyhist_common::{Config, LoggingConfig};
use toyhist_core::{print_summary, run, RunOptions};

#[derive(Parser)]
#[command(name = "toyhist", about = "Download the toy histogram dataset and write signal/data/bkg histograms")]
struct Cli {
    /// Output histogram file
    #[arg(value_name = "OUTFILE")]
    output: PathBuf,
}

fn init_tracing(cfg: &LoggingConfig) {
    let level: tracing::Level = cfg.level.parse().unwrap_or_else(|_| {
        eprintln!("warning: unknown log level '{}', using warn", cfg.level);
        tracing::Level::WARN
    });
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("warning: ignoring config {}: {e}", Config::config_path().display());
        Config::default()
    });
    init_tracing(&config.logging);

    let opts = RunOptions::from_config(&config, &cli.output);
    let histograms = run(&opts)
        .with_context(|| format!("failed to prepare {}", opts.output.display()))?;
    print_summary(&opts.output, &histograms);
    Ok(())
}
