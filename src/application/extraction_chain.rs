//! Two-tier extraction chain for a single product URL
//!
//! ```text
//! Start -> PrimaryAttempted -> (complete) ---------------------> Done
//!                           \-> (incomplete) -> SecondaryAttempted -> Done
//! ```
//!
//! The primary strategy reads the structured product endpoint. Only when
//! the resulting record lacks a name or a price is the rendered product page
//! fetched; that secondary pass fills fields that are still unset and never
//! replaces values the primary strategy already produced.

#![allow(clippy::uninlined_format_args)]

use scraper::Html;
use tracing::{debug, info, warn};

use crate::domain::errors::{ExtractionError, ExtractionResult};
use crate::domain::outcome::ExtractionOutcome;
use crate::domain::product::{CanonicalProductRecord, ProductField};
use crate::domain::product_url::ProductHandle;
use crate::domain::services::page_fetcher::{FetchKind, PageFetcher};
use crate::infrastructure::parsing::{
    ContextualParser, DetailParseContext, DocumentFields, ParsingResult, ProductDetailParser, StorefrontProduct,
};

/// Per-item states
#[derive(Debug)]
enum ChainState {
    Start,
    PrimaryAttempted {
        handle: ProductHandle,
        record: CanonicalProductRecord,
        error: Option<ExtractionError>,
    },
    SecondaryAttempted {
        record: CanonicalProductRecord,
        error: Option<ExtractionError>,
    },
    Done(ExtractionOutcome),
}

/// True when any field besides the URL holds a real value
fn has_extracted_data(record: &CanonicalProductRecord) -> bool {
    ProductField::ALL
        .into_iter()
        .filter(|field| *field != ProductField::Url)
        .any(|field| !record.is_unset(field))
}

/// Structured-then-document extraction over a [`PageFetcher`]
pub struct ExtractionChain<F> {
    fetcher: F,
    detail_parser: ProductDetailParser,
    site_base: Option<String>,
}

impl<F: PageFetcher> ExtractionChain<F> {
    pub fn new(fetcher: F, detail_parser: ProductDetailParser) -> Self {
        Self {
            fetcher,
            detail_parser,
            site_base: None,
        }
    }

    /// Fixed origin for structured endpoints instead of each item's own origin
    pub fn with_site_base(mut self, site_base: Option<String>) -> Self {
        self.site_base = site_base.filter(|base| !base.trim().is_empty());
        self
    }

    /// Runs the chain for one URL. Per-item errors never escape; they are
    /// logged and reflected in the returned outcome.
    pub async fn extract(&self, url: &str) -> ExtractionOutcome {
        let mut state = ChainState::Start;

        loop {
            state = match state {
                ChainState::Start => match ProductHandle::from_url(url) {
                    Ok(handle) => {
                        let mut record = CanonicalProductRecord::empty(url);
                        let error = self.run_primary(&handle, &mut record).await.err();
                        ChainState::PrimaryAttempted { handle, record, error }
                    }
                    Err(error) => ChainState::Done(ExtractionOutcome::Failed {
                        error,
                        url: url.to_string(),
                    }),
                },

                ChainState::PrimaryAttempted { handle, record, error } => {
                    if record.is_complete() {
                        debug!("Structured data complete for {}, skipping document fetch", handle.as_str());
                        ChainState::Done(ExtractionOutcome::from_record(record))
                    } else {
                        info!(
                            "Structured data incomplete for {} (name set: {}, price set: {}), trying product page",
                            handle.as_str(),
                            !record.is_unset(ProductField::Name),
                            !record.is_unset(ProductField::Price)
                        );
                        let mut record = record;
                        let secondary_error = self.run_secondary(&handle, &mut record).await.err();
                        ChainState::SecondaryAttempted {
                            record,
                            error: secondary_error.or(error),
                        }
                    }
                }

                ChainState::SecondaryAttempted { record, error } => match error {
                    Some(error) if !has_extracted_data(&record) => ChainState::Done(ExtractionOutcome::Failed {
                        error,
                        url: url.to_string(),
                    }),
                    _ => ChainState::Done(ExtractionOutcome::from_record(record)),
                },

                ChainState::Done(outcome) => {
                    log_outcome(&outcome);
                    return outcome;
                }
            };
        }
    }

    fn normalization_base<'a>(&'a self, handle: &'a ProductHandle) -> &'a str {
        self.site_base.as_deref().unwrap_or_else(|| handle.origin())
    }

    async fn run_primary(&self, handle: &ProductHandle, record: &mut CanonicalProductRecord) -> ExtractionResult<()> {
        let endpoint = handle.structured_url(self.site_base.as_deref());
        let body = self
            .fetcher
            .fetch(&endpoint, FetchKind::Structured)
            .await
            .inspect_err(|e| warn!("Structured fetch failed: {}", e))?;

        let product = StorefrontProduct::parse(&endpoint, &body).inspect_err(|e| warn!("{}", e))?;
        product.apply_to(record, self.normalization_base(handle), self.detail_parser.matcher());
        Ok(())
    }

    async fn run_secondary(&self, handle: &ProductHandle, record: &mut CanonicalProductRecord) -> ExtractionResult<()> {
        let url = record.url.clone();
        let body = self
            .fetcher
            .fetch(&url, FetchKind::Document)
            .await
            .inspect_err(|e| warn!("Document fetch failed, keeping structured data: {}", e))?;

        let fields = self
            .parse_document(&body, &url, self.normalization_base(handle))
            .map_err(|e| ExtractionError::parse(&url, e.to_string()))
            .inspect_err(|e| warn!("{}", e))?;

        let filled = fields.fill_unset(record);
        debug!("Document strategy filled {:?} for {}", filled, url);
        Ok(())
    }

    /// Kept synchronous so the parsed document never lives across an await
    fn parse_document(&self, body: &str, url: &str, base: &str) -> ParsingResult<DocumentFields> {
        let document = Html::parse_document(body);
        let context = DetailParseContext::new(url, base);
        self.detail_parser.parse_with_context(&document, &context)
    }
}

fn log_outcome(outcome: &ExtractionOutcome) {
    match outcome {
        ExtractionOutcome::Complete(record) => info!("Extracted '{}' ({})", record.name, record.url),
        ExtractionOutcome::Partial { record, missing } => {
            let missing: Vec<_> = missing.iter().map(|field| field.column()).collect();
            warn!("Partial record for {}; missing: {}", record.url, missing.join(", "));
        }
        ExtractionOutcome::Failed { error, url } => warn!("Extraction failed for {}: {}", url, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory fetcher that records every request
    #[derive(Clone, Default)]
    struct FakeFetcher {
        responses: HashMap<String, ExtractionResult<String>>,
        calls: Arc<Mutex<Vec<(String, FetchKind)>>>,
    }

    impl FakeFetcher {
        fn respond(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        fn fail(mut self, url: &str, status: u16) -> Self {
            self.responses
                .insert(url.to_string(), Err(ExtractionError::fetch(url, Some(status), "Not Found")));
            self
        }

        fn calls(&self) -> Vec<(String, FetchKind)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, kind: FetchKind) -> ExtractionResult<String> {
            self.calls.lock().unwrap().push((url.to_string(), kind));
            self.responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(ExtractionError::fetch(url, None, "connection refused")))
        }
    }

    const ITEM: &str = "https://site.com/products/abc";
    const ENDPOINT: &str = "https://site.com/products/abc.js";

    fn chain(fetcher: FakeFetcher) -> ExtractionChain<FakeFetcher> {
        ExtractionChain::new(fetcher, ProductDetailParser::new().unwrap())
    }

    #[tokio::test]
    async fn test_complete_structured_data_skips_document() {
        let fetcher = FakeFetcher::default().respond(ENDPOINT, r#"{"title":"Tee","price":2500}"#);
        let outcome = chain(fetcher.clone()).extract(ITEM).await;

        assert_eq!(outcome.label(), "complete");
        assert_eq!(fetcher.calls(), vec![(ENDPOINT.to_string(), FetchKind::Structured)]);
    }

    #[tokio::test]
    async fn test_identifier_failure_fetches_nothing() {
        let fetcher = FakeFetcher::default();
        let outcome = chain(fetcher.clone()).extract("https://site.com/pages/about").await;

        assert!(matches!(
            outcome,
            ExtractionOutcome::Failed {
                error: ExtractionError::Identifier { .. },
                ..
            }
        ));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_structured_failure_falls_back_to_document() {
        let fetcher = FakeFetcher::default().fail(ENDPOINT, 404).respond(
            ITEM,
            r#"<h1 class="product-name">Jogger</h1><span class="product-price">$89.00</span>"#,
        );
        let outcome = chain(fetcher.clone()).extract(ITEM).await;

        let record = outcome.record().unwrap();
        assert_eq!(record.name, "Jogger");
        assert_eq!(record.price.display, "$89.00");
        assert_eq!(outcome.label(), "complete");
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_document_never_overwrites_structured_values() {
        let fetcher = FakeFetcher::default()
            .respond(ENDPOINT, r#"{"title":"Structured Tee","price":0,"variants":[{"option1":"XS"}]}"#)
            .respond(
                ITEM,
                r#"<h1 class="product-name">Page Tee</h1><span class="product-price">$30.00</span>
                   <span class="swatch-element">L</span>"#,
            );
        let outcome = chain(fetcher).extract(ITEM).await;

        let record = outcome.record().unwrap();
        assert_eq!(record.name, "Structured Tee");
        assert_eq!(record.price.minor_units, 3000);
        assert_eq!(record.sizes, vec!["XS".to_string()]);
    }

    #[tokio::test]
    async fn test_secondary_failure_keeps_primary_data() {
        let fetcher = FakeFetcher::default()
            .respond(ENDPOINT, r#"{"title":"Tee","price":0}"#)
            .fail(ITEM, 503);
        let outcome = chain(fetcher).extract(ITEM).await;

        match outcome {
            ExtractionOutcome::Partial { record, missing } => {
                assert_eq!(record.name, "Tee");
                assert!(missing.contains(&ProductField::Price));
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_both_fetches_failing_is_a_failure() {
        let fetcher = FakeFetcher::default().fail(ENDPOINT, 404).fail(ITEM, 404);
        let outcome = chain(fetcher).extract(ITEM).await;

        match outcome {
            ExtractionOutcome::Failed { error, url } => {
                assert_eq!(url, ITEM);
                assert!(error.is_recoverable());
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_site_base_overrides_structured_origin() {
        let fetcher = FakeFetcher::default().respond(
            "https://www.shop.example/products/abc.js",
            r#"{"title":"Tee","price":100}"#,
        );
        let outcome = chain(fetcher.clone())
            .with_site_base(Some("https://www.shop.example".to_string()))
            .extract("https://shop.example/collections/new/products/abc")
            .await;

        assert_eq!(outcome.label(), "complete");
        assert_eq!(fetcher.calls()[0].0, "https://www.shop.example/products/abc.js");
    }
}
