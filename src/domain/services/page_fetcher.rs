//! Fetch seam used by the extraction chain

use async_trait::async_trait;
use std::fmt;

use crate::domain::errors::ExtractionResult;

/// Kind of representation being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Machine-readable product JSON
    Structured,
    /// Rendered HTML product page
    Document,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Structured => f.write_str("structured"),
            FetchKind::Document => f.write_str("document"),
        }
    }
}

/// Retrieves the body of a URL.
///
/// Implementations map transport failures, timeouts and non-success
/// statuses to [`crate::domain::ExtractionError::Fetch`] and never retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, kind: FetchKind) -> ExtractionResult<String>;
}
