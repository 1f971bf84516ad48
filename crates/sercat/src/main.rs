mod cli;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sercat_core::pipeline;

fn main() -> Result<()> {
    // The reconstructed byte stream goes to stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Replay { input, output } => {
            info!(?input, ?output, "starting replay");

            let bytes_copied = replay(input, output)?;

            info!(bytes_copied, "replay finished");

            Ok(())
        }
    }
}

fn replay(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<u64> {
    let stdin = io::stdin();
    let input: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(stdin.lock()),
    };

    let stdout = io::stdout();
    let mut output: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(stdout.lock()),
    };

    pipeline::replay(input, &mut output)
}
