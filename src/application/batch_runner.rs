//! Sequential batch extraction over an input dataset
//!
//! Items are processed one at a time with a pacing delay between them.
//! Per-item failures become output rows; only a missing URL column or
//! cancellation stops the batch.

#![allow(clippy::uninlined_format_args)]

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::extraction_chain::ExtractionChain;
use super::pacing::Pacer;
use crate::domain::dataset::Dataset;
use crate::domain::outcome::ExtractionOutcome;
use crate::domain::product::{ProductField, CANONICAL_COLUMNS, ERROR_SENTINEL};
use crate::domain::services::page_fetcher::PageFetcher;
use crate::infrastructure::config::PacingConfig;

pub const DEFAULT_URL_COLUMN: &str = "URL";

/// Rows produced by a batch plus per-outcome counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub dataset: Dataset,
    pub complete: usize,
    pub partial: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchReport {
    fn new(columns: Vec<String>) -> Self {
        Self {
            dataset: Dataset::new(columns),
            complete: 0,
            partial: 0,
            failed: 0,
            skipped: 0,
        }
    }

    /// Items that went through the extraction chain
    pub fn processed(&self) -> usize {
        self.complete + self.partial + self.failed
    }

    fn record(&mut self, outcome: &ExtractionOutcome, row: Vec<String>) {
        match outcome {
            ExtractionOutcome::Complete(_) => self.complete += 1,
            ExtractionOutcome::Partial { .. } => self.partial += 1,
            ExtractionOutcome::Failed { .. } => self.failed += 1,
        }
        self.dataset.push_row(row);
    }
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Column '{column}' not found in the input. Available columns: {}", .available.join(", "))]
    MissingUrlColumn { column: String, available: Vec<String> },

    #[error("Batch cancelled with {} of {total} rows collected", .partial.dataset.len())]
    Cancelled { partial: Box<BatchReport>, total: usize },
}

/// Drives the extraction chain over every row of an input dataset
pub struct BatchRunner<F> {
    chain: ExtractionChain<F>,
    pacing: PacingConfig,
    url_column: String,
}

impl<F: PageFetcher> BatchRunner<F> {
    pub fn new(chain: ExtractionChain<F>, pacing: PacingConfig) -> Self {
        Self {
            chain,
            pacing,
            url_column: DEFAULT_URL_COLUMN.to_string(),
        }
    }

    pub fn with_url_column(mut self, url_column: &str) -> Self {
        self.url_column = url_column.to_string();
        self
    }

    /// Canonical columns followed by input columns not already produced
    pub fn output_columns(&self, input: &Dataset) -> Vec<String> {
        let mut columns: Vec<String> = CANONICAL_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        for column in input.columns() {
            if *column != self.url_column && !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        columns
    }

    /// Processes every row; stops early only when `cancel` fires
    pub async fn run(&self, input: &Dataset, cancel: &CancellationToken) -> Result<BatchReport, BatchError> {
        let url_index = input
            .column_index(&self.url_column)
            .ok_or_else(|| BatchError::MissingUrlColumn {
                column: self.url_column.clone(),
                available: input.columns().to_vec(),
            })?;

        let columns = self.output_columns(input);
        let passthrough: Vec<usize> = columns[CANONICAL_COLUMNS.len()..]
            .iter()
            .filter_map(|column| input.column_index(column))
            .collect();

        let total = input.len();
        let mut report = BatchReport::new(columns);
        let mut pacer = Pacer::new(&self.pacing);

        for (index, row) in input.rows().iter().enumerate() {
            let url = row[url_index].trim();
            if !is_http_url(url) {
                warn!("Skipping invalid URL at row {}: '{}'", index + 1, url);
                report.skipped += 1;
                continue;
            }

            if cancel.is_cancelled() {
                return Err(cancelled(report, total));
            }
            if let Some(delay) = pacer.delay_before_next() {
                tokio::select! {
                    () = cancel.cancelled() => return Err(cancelled(report, total)),
                    () = tokio::time::sleep(delay) => {}
                }
            }

            info!("Processing URL {}/{}: {}", index + 1, total, url);
            let outcome = tokio::select! {
                () = cancel.cancelled() => return Err(cancelled(report, total)),
                outcome = self.chain.extract(url) => outcome,
            };

            let output_row = outcome_row(&outcome, url, row, &passthrough);
            report.record(&outcome, output_row);
        }

        info!(
            "Batch finished: {} complete, {} partial, {} failed, {} skipped",
            report.complete, report.partial, report.failed, report.skipped
        );
        Ok(report)
    }
}

fn cancelled(report: BatchReport, total: usize) -> BatchError {
    warn!("Batch cancelled with {} rows collected", report.dataset.len());
    BatchError::Cancelled {
        partial: Box::new(report),
        total,
    }
}

fn is_http_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Output row for one outcome. Failed items keep their URL and pass-through
/// cells and carry the error sentinel in every derived field.
fn outcome_row(outcome: &ExtractionOutcome, url: &str, input_row: &[String], passthrough: &[usize]) -> Vec<String> {
    let mut row: Vec<String> = match outcome.record() {
        Some(record) => ProductField::ALL.iter().map(|field| record.value(*field)).collect(),
        None => ProductField::ALL
            .iter()
            .map(|field| match field {
                ProductField::Url => url.to_string(),
                _ => ERROR_SENTINEL.to_string(),
            })
            .collect(),
    };
    row.extend(passthrough.iter().map(|&idx| input_row[idx].clone()));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{ExtractionError, ExtractionResult};
    use crate::domain::product::{CanonicalProductRecord, Price};
    use crate::domain::services::page_fetcher::FetchKind;
    use crate::infrastructure::parsing::ProductDetailParser;
    use async_trait::async_trait;

    struct OfflineFetcher;

    #[async_trait]
    impl PageFetcher for OfflineFetcher {
        async fn fetch(&self, url: &str, _kind: FetchKind) -> ExtractionResult<String> {
            Err(ExtractionError::fetch(url, None, "offline"))
        }
    }

    fn runner() -> BatchRunner<OfflineFetcher> {
        let chain = ExtractionChain::new(OfflineFetcher, ProductDetailParser::new().unwrap());
        BatchRunner::new(
            chain,
            PacingConfig {
                base_delay_ms: 0,
                max_jitter_ms: 0,
            },
        )
    }

    fn input(columns: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::with_rows(
            columns.iter().map(|c| (*c).to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_output_columns_skip_url_and_produced_names() {
        let data = input(&["Index", "URL", "Product Name", "Brand"], &[]);
        let columns = runner().output_columns(&data);
        assert_eq!(&columns[..7], CANONICAL_COLUMNS);
        assert_eq!(&columns[7..], ["Index", "Brand"]);
    }

    #[test]
    fn test_failed_row_keeps_url_and_passthrough() {
        let outcome = ExtractionOutcome::Failed {
            error: ExtractionError::identifier("https://a.com/x", "bad"),
            url: "https://a.com/x".to_string(),
        };
        let input_row = vec!["7".to_string(), "https://a.com/x".to_string()];
        let row = outcome_row(&outcome, "https://a.com/x", &input_row, &[0]);
        assert_eq!(
            row,
            ["Error", "Error", "https://a.com/x", "Error", "Error", "Error", "Error", "7"]
        );
    }

    #[test]
    fn test_partial_row_keeps_obtained_values() {
        let mut record = CanonicalProductRecord::empty("https://a.com/products/x");
        record.name = "Tee".to_string();
        let outcome = ExtractionOutcome::from_record(record);
        let row = outcome_row(&outcome, "https://a.com/products/x", &[], &[]);
        assert_eq!(row[0], "Tee");
        assert_eq!(row[1], Price::zero().display);
        assert_eq!(row[5], "Not found");
    }

    #[tokio::test]
    async fn test_missing_url_column_fails_before_processing() {
        let data = input(&["Link"], &[&["https://a.com/products/x"]]);
        let err = runner().run(&data, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, BatchError::MissingUrlColumn { ref column, .. } if column == "URL"));
        assert!(err.to_string().contains("Available columns: Link"));
    }

    #[tokio::test]
    async fn test_invalid_urls_are_skipped_and_failures_recorded() {
        let data = input(
            &["URL", "Brand"],
            &[&["", "A"], &["ftp://a.com/products/x", "B"], &["https://a.com/products/x", "C"]],
        );
        let report = runner().with_url_column("URL").run(&data, &CancellationToken::new()).await.unwrap();

        assert_eq!(report.skipped, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.dataset.cell(0, "Brand"), Some("C"));
        assert_eq!(report.dataset.cell(0, "Product Name"), Some(ERROR_SENTINEL));
    }

    #[tokio::test]
    async fn test_cancelled_token_returns_partial_report() {
        let data = input(&["URL"], &[&["https://a.com/products/x"]]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        match runner().run(&data, &cancel).await {
            Err(BatchError::Cancelled { partial, total }) => {
                assert_eq!(total, 1);
                assert!(partial.dataset.is_empty());
            }
            other => panic!("expected cancellation, got {other:?}"),
        }
    }
}
