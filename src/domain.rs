//! Domain module - Core business logic and entities
//!
//! This module contains the canonical product record, item identifiers,
//! extraction outcomes, tabular datasets and the dataset merge service.
//! Nothing in here performs I/O.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod dataset;
pub mod errors;
pub mod outcome;
pub mod product;
pub mod product_url;
pub mod services;

pub use dataset::Dataset;
pub use errors::{ExtractionError, NormalizeError, SchemaError};
pub use outcome::ExtractionOutcome;
pub use product::{CanonicalProductRecord, Price, ProductField, ERROR_SENTINEL, NOT_FOUND};
pub use product_url::ProductHandle;
pub use services::page_fetcher::{FetchKind, PageFetcher};
pub use services::record_merger::{merge_datasets, DatasetRole};
