//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Storefront Harvest - extract product details and reconcile product datasets.
#[derive(Debug, Parser)]
#[command(name = "storefront-harvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "STOREFRONT_HARVEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract product details for every URL in a CSV file
    Scrape(ScrapeArgs),

    /// Merge newly extracted details into a base dataset
    Merge(MergeArgs),

    /// Build a base dataset from a collection/listing page
    Listing(ListingArgs),
}

/// Arguments for the scrape command.
#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// CSV file containing product URLs
    pub input: PathBuf,

    /// Column holding the product URLs
    #[arg(long, default_value = "URL")]
    pub url_column: String,

    /// Output CSV file path
    #[arg(long, default_value = "product_details.csv")]
    pub output_csv: PathBuf,

    /// Base delay between requests in seconds (random jitter is added)
    #[arg(long)]
    pub delay: Option<f64>,

    /// Origin used for structured product endpoints, e.g. https://www.example.com
    #[arg(long)]
    pub site_base: Option<String>,
}

/// Arguments for the merge command.
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Base product data CSV
    pub base: PathBuf,

    /// CSV with newly extracted details
    pub incoming: PathBuf,

    /// Path to save the merged data
    #[arg(long, default_value = "merged_product_data.csv")]
    pub output: PathBuf,

    /// Join column present in both files
    #[arg(long, default_value = "URL")]
    pub key: String,
}

/// Arguments for the listing command.
#[derive(Debug, Args)]
pub struct ListingArgs {
    /// Listing page: a local HTML file or an http(s) URL
    pub source: String,

    /// Output CSV file path
    #[arg(long, default_value = "product_listing.csv")]
    pub output: PathBuf,

    /// Brand label stamped on every row
    #[arg(long)]
    pub brand: Option<String>,

    /// Origin for resolving relative links; defaults to the source URL
    #[arg(long)]
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scrape_defaults() {
        let cli = Cli::parse_from(["storefront-harvest", "scrape", "urls.csv"]);
        match cli.command {
            Command::Scrape(args) => {
                assert_eq!(args.input, PathBuf::from("urls.csv"));
                assert_eq!(args.url_column, "URL");
                assert_eq!(args.output_csv, PathBuf::from("product_details.csv"));
                assert_eq!(args.delay, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "storefront-harvest",
            "merge",
            "base.csv",
            "new.csv",
            "--output",
            "out.csv",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Merge(args) => {
                assert_eq!(args.output, PathBuf::from("out.csv"));
                assert_eq!(args.key, "URL");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
