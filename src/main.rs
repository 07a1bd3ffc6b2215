use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use tracegen::{cli, replay, report, Sampler};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = cli::Args::parse();
    let config = args.trace_config();
    let sampler = Sampler::new(&config).context("Refusing to start")?;

    let stats = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            tracing::info!(input = %path.display(), "replaying capture");
            replay::replay_reader(sampler, BufReader::new(file))?
        }
        None => {
            tracing::info!("replaying capture from stdin");
            replay::replay_reader(sampler, io::stdin().lock())?
        }
    };

    if !args.quiet {
        report::print_summary(&stats);
    }
    Ok(())
}
