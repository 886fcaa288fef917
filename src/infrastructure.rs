//! Infrastructure layer for parsing, HTTP, persistence and process setup
//!
//! This module provides HTML/JSON parsing, the HTTP fetcher, CSV dataset
//! storage, configuration loading and logging initialization.

pub mod config;
pub mod csv_store;
pub mod http_client;
pub mod logging;
pub mod parsing;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, ConfigOverrides, LoggingConfig, PacingConfig, SiteConfig};
pub use csv_store::{partial_output_path, read_dataset, write_dataset};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::init_logging_with_config;
pub use parsing::{
    FabricationMatcher, ParsingConfig, ParsingError, ParsingResult, ProductDetailParser, ProductListParser,
    StorefrontProduct,
};
