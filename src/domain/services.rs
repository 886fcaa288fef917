//! Domain services
//!
//! Contains business logic that doesn't naturally fit within entities.

pub mod page_fetcher;
pub mod record_merger;

pub use page_fetcher::{FetchKind, PageFetcher};
pub use record_merger::{is_blank_value, merge_datasets, DatasetRole};
