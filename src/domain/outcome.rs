use super::errors::ExtractionError;
use super::product::{CanonicalProductRecord, ProductField};

/// Result of running the extraction chain for one item
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Name and price were determined
    Complete(CanonicalProductRecord),
    /// Some data was obtained but name or price is still unset
    Partial {
        record: CanonicalProductRecord,
        missing: Vec<ProductField>,
    },
    /// Nothing usable was obtained
    Failed { error: ExtractionError, url: String },
}

impl ExtractionOutcome {
    /// Classifies a finished record as complete or partial
    pub fn from_record(record: CanonicalProductRecord) -> Self {
        if record.is_complete() {
            Self::Complete(record)
        } else {
            let missing = record.missing_fields();
            Self::Partial { record, missing }
        }
    }

    pub fn record(&self) -> Option<&CanonicalProductRecord> {
        match self {
            Self::Complete(record) | Self::Partial { record, .. } => Some(record),
            Self::Failed { .. } => None,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Complete(record) | Self::Partial { record, .. } => &record.url,
            Self::Failed { url, .. } => url,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Complete(_) => "complete",
            Self::Partial { .. } => "partial",
            Self::Failed { .. } => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Price;

    #[test]
    fn test_from_record_classification() {
        let mut record = CanonicalProductRecord::empty("https://site.com/products/a");
        record.name = "Tee".to_string();
        match ExtractionOutcome::from_record(record.clone()) {
            ExtractionOutcome::Partial { missing, .. } => {
                assert!(missing.contains(&ProductField::Price));
                assert!(!missing.contains(&ProductField::Name));
            }
            other => panic!("expected partial, got {other:?}"),
        }

        record.price = Price::from_minor_units(100);
        let outcome = ExtractionOutcome::from_record(record);
        assert_eq!(outcome.label(), "complete");
        assert_eq!(outcome.url(), "https://site.com/products/a");
    }
}
