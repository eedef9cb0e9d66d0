use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// EVM-compatible indexer for a WBFT consensus chain.
#[derive(Debug, Parser)]
#[command(name = "wbft-indexer", version, about)]
pub struct Cli {
    /// Path to a TOML config file. Defaults to the platform-conventional
    /// `confy` location for `wbft-indexer` if omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs continuous ingestion, recovering any pre-existing gaps first.
    Run {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        rpc: Option<String>,
        #[arg(long)]
        start_height: Option<u64>,
    },
    /// Backfills a specific `[start, end]` height range and exits.
    Repair {
        #[arg(long)]
        start: u64,
        #[arg(long)]
        end: u64,
    },
    /// Prints a snapshot of store and metrics state to stdout as JSON.
    DumpDiagnostics,
}
