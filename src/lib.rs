//! Storefront Harvest - retail product detail extraction
//!
//! Extracts canonical product records (name, price, description, sizes,
//! fabrication, image) from storefront product URLs. A structured JSON
//! endpoint is tried first and the rendered product page second; results
//! can be merged field-by-field into an existing product dataset.

// Module declarations
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infrastructure;
