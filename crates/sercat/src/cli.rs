use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sercat", about = "Replay logic analyzer serial captures as raw bytes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a serial capture export into the original byte stream.
    Replay {
        /// Path to the capture export; reads stdin when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Path to write the reconstructed bytes; writes stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
