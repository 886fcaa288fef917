//! `listing`: build a base dataset from a collection page

#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use scraper::Html;
use tracing::info;
use url::Url;

use crate::cli::ListingArgs;
use crate::domain::dataset::Dataset;
use crate::domain::services::page_fetcher::{FetchKind, PageFetcher};
use crate::infrastructure::parsing::{ContextualParser, ListingParseContext};
use crate::infrastructure::{write_dataset, AppConfig, HttpClient, ProductListParser};

/// Parses one listing page (local file or URL) into index/name/price/link rows
pub async fn execute_listing(args: ListingArgs, config: &AppConfig) -> Result<()> {
    let is_remote = args.source.starts_with("http://") || args.source.starts_with("https://");

    let body = if is_remote {
        let client = HttpClient::with_config(config.http.clone())?;
        client.fetch(&args.source, FetchKind::Document).await?
    } else {
        tokio::fs::read_to_string(&args.source)
            .await
            .with_context(|| format!("Failed to read listing page {}", args.source))?
    };

    let base_url = listing_base_url(&args, is_remote, config)?;
    let context = ListingParseContext::new(&base_url).with_brand(args.brand.clone());
    let parser = ProductListParser::with_config(&config.selectors.listing)
        .context("Invalid listing selectors in configuration")?;

    let dataset = parse_listing(&parser, &body, &context)?;
    info!("Found {} products on {}", dataset.len(), args.source);
    write_dataset(&args.output, &dataset)?;

    println!("Saved {} products to {}", dataset.len(), args.output.display());
    Ok(())
}

/// `--base-url`, else the remote source's origin, else the configured site
fn listing_base_url(args: &ListingArgs, is_remote: bool, config: &AppConfig) -> Result<String> {
    if let Some(base) = args.base_url.as_deref().filter(|b| !b.trim().is_empty()) {
        return Ok(base.trim_end_matches('/').to_string());
    }
    if is_remote {
        let url = Url::parse(&args.source).with_context(|| format!("Invalid listing URL {}", args.source))?;
        return Ok(url.origin().ascii_serialization());
    }
    config
        .site
        .base_url
        .clone()
        .ok_or_else(|| anyhow!("A local listing page needs --base-url or site.base_url in the configuration"))
}

fn parse_listing(parser: &ProductListParser, body: &str, context: &ListingParseContext) -> Result<Dataset> {
    let document = Html::parse_document(body);
    Ok(parser.parse_with_context(&document, context)?)
}
