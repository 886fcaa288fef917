//! CLI command handlers
//!
//! Each command group lives in its own file in the commands/ directory;
//! `main` dispatches parsed arguments to the `execute_*` functions here.

pub mod listing_commands;
pub mod merge_commands;
pub mod scrape_commands;

pub use listing_commands::execute_listing;
pub use merge_commands::execute_merge;
pub use scrape_commands::execute_scrape;
