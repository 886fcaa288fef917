//! `scrape`: batch product detail extraction over a CSV of URLs

#![allow(clippy::uninlined_format_args)]

use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::application::{BatchError, BatchReport, BatchRunner, ExtractionChain};
use crate::cli::ScrapeArgs;
use crate::domain::dataset::Dataset;
use crate::infrastructure::{partial_output_path, read_dataset, write_dataset, AppConfig, HttpClient, ProductDetailParser};

/// Runs the extraction chain over every URL of `args.input` and writes the
/// results. Interrupted runs save what was collected to `partial_<output>`.
pub async fn execute_scrape(args: ScrapeArgs, config: &AppConfig) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file not found: {}", args.input.display());
    }
    let input = read_dataset(&args.input)?;
    info!("Loaded {} rows from {}", input.len(), args.input.display());

    let fetcher = HttpClient::with_config(config.http.clone())?;
    let parser = ProductDetailParser::with_config(&config.selectors.product_page)
        .context("Invalid product page selectors in configuration")?;
    let chain = ExtractionChain::new(fetcher, parser).with_site_base(config.site.base_url.clone());
    let runner = BatchRunner::new(chain, config.pacing.clone()).with_url_column(&args.url_column);

    let cancel = CancellationToken::new();
    let listener = spawn_interrupt_listener(cancel.clone());
    let result = runner.run(&input, &cancel).await;
    listener.abort();

    match result {
        Ok(report) => {
            print_summary(&report);
            save_with_fallback(&args.output_csv, &report.dataset)
        }
        Err(BatchError::Cancelled { partial, total }) => {
            let path = partial_output_path(&args.output_csv);
            write_dataset(&path, &partial.dataset)?;
            bail!(
                "Interrupted after {} of {} rows; partial results saved to {}",
                partial.dataset.len(),
                total,
                path.display()
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn spawn_interrupt_listener(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, stopping after the current request");
                cancel.cancel();
            }
            Err(e) => error!("Failed to listen for interrupt signal: {}", e),
        }
    })
}

/// Writes `dataset` to `output`; on failure tries `partial_<output>` so the
/// run's work is not lost, then reports the original error.
fn save_with_fallback(output: &Path, dataset: &Dataset) -> Result<()> {
    let Err(err) = write_dataset(output, dataset) else {
        return Ok(());
    };

    error!("Saving results failed: {:#}", err);
    let partial = partial_output_path(output);
    match write_dataset(&partial, dataset) {
        Ok(()) => Err(err.context(format!("Results saved to {} instead", partial.display()))),
        Err(partial_err) => {
            error!("Saving partial results failed as well: {:#}", partial_err);
            Err(err)
        }
    }
}

fn print_summary(report: &BatchReport) {
    println!(
        "Processed {} products: {} complete, {} partial, {} failed, {} skipped",
        report.processed(),
        report.complete,
        report.partial,
        report.failed,
        report.skipped
    );
}
