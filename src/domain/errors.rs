//! Error taxonomy for extraction and merge operations
//!
//! Per-item errors (`ExtractionError`) are caught at the item boundary and
//! folded into an `ExtractionOutcome`. `SchemaError` aborts a whole merge
//! before any row is touched.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Could not derive a product identifier from {url}: {reason}")]
    Identifier { url: String, reason: String },

    #[error("Fetch failed for {url}{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Unexpected payload from {url}: {message}")]
    Parse { url: String, message: String },
}

impl ExtractionError {
    pub fn identifier(url: &str, reason: &str) -> Self {
        Self::Identifier {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(url: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn parse(url: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Whether the chain may continue with another strategy after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Identifier { .. } => false,
            Self::Fetch { .. } | Self::Parse { .. } => true,
        }
    }
}

/// Required join column absent from one of the merge inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{dataset} dataset must have a '{column}' column")]
pub struct SchemaError {
    pub dataset: String,
    pub column: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Price value is not numeric: '{0}'")]
    NotNumeric(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
