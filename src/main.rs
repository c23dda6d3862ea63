use anyhow::{Context, Result};
use clap::Parser;
use contributors_board::cli::{Cli, Commands};
use contributors_board::error::UserFriendly;
use contributors_board::{Board, Config, ContributorAggregator};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Init { ref output }) => {
            info!("Writing default configuration");
            init_command(output.clone())
        }
        None => show_board(&cli),
    };

    if let Err(e) = result.user_friendly() {
        e.display();
        std::process::exit(1);
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn show_board(cli: &Cli) -> Result<()> {
    info!("Loading configuration");
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(dir) = &cli.cache_dir {
        config.cache.cache_dir = Some(dir.clone());
    }

    let aggregator = ContributorAggregator::from_config(&config)?;

    if cli.clear_cache {
        info!("Clearing cache");
        aggregator.cache().clear().context("Failed to clear cache")?;
    }

    let contributors = if cli.no_cache {
        aggregator.refresh()
    } else {
        aggregator.fetch_contributors()
    };

    if contributors.is_empty() {
        warn!("Contributor data is unavailable");
    }

    let output = Board::new(&contributors).render(cli.format)?;
    println!("{}", output);

    Ok(())
}

fn init_command(output: Option<PathBuf>) -> Result<()> {
    let config_path = match output {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    if config_path.exists() {
        warn!("Configuration already exists at {:?}", config_path);
        println!("Configuration file already exists at: {:?}", config_path);
        println!("Please remove it first if you want to regenerate.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let config_str =
        toml::to_string_pretty(&Config::default()).context("Failed to serialize config")?;

    std::fs::write(&config_path, config_str)
        .with_context(|| format!("Failed to write config to {:?}", config_path))?;

    println!("✓ Configuration created at: {:?}", config_path);

    Ok(())
}
