use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::board::BoardFormat;

#[derive(Parser, Debug)]
#[command(
    name = "contributors",
    about = "Rank contributors across the framework and skeleton repositories",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, env = "CONTRIBUTORS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the cache directory
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Ignore a fresh cache entry and fetch from GitHub
    #[arg(long)]
    pub no_cache: bool,

    /// Remove the cached board before running
    #[arg(long)]
    pub clear_cache: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: BoardFormat,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Where to write the configuration file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
