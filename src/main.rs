//! Storefront Harvest CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use storefront_harvest::cli::{Cli, Command};
use storefront_harvest::commands::{execute_listing, execute_merge, execute_scrape};
use storefront_harvest::infrastructure::{init_logging_with_config, ConfigManager, ConfigOverrides};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let manager = ConfigManager::resolve(cli.config.as_deref())?;
    let mut config = manager.load_config().await?;

    let (delay_seconds, site_base) = match &cli.command {
        Command::Scrape(args) => (args.delay, args.site_base.clone()),
        Command::Merge(_) | Command::Listing(_) => (None, None),
    };
    ConfigOverrides {
        delay_seconds,
        site_base,
        log_level: cli.log_level.clone(),
    }
    .apply(&mut config);

    init_logging_with_config(&config.logging)?;
    debug!("Using configuration from {}", manager.config_path().display());

    match cli.command {
        Command::Scrape(args) => execute_scrape(args, &config).await,
        Command::Merge(args) => execute_merge(args).await,
        Command::Listing(args) => execute_listing(args, &config).await,
    }
}
