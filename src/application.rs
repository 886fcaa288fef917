//! Application layer module
//!
//! Orchestrates the domain logic: the per-item extraction chain, request
//! pacing and the sequential batch runner.

pub mod batch_runner;
pub mod extraction_chain;
pub mod pacing;

pub use batch_runner::{BatchError, BatchReport, BatchRunner, DEFAULT_URL_COLUMN};
pub use extraction_chain::ExtractionChain;
pub use pacing::Pacer;
