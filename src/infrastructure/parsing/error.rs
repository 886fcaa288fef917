//! Parser construction and listing errors
//!
//! Per-item extraction failures live in `domain::errors`; these errors come
//! from bad configuration (selectors, patterns) or pages with no products.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for {field}: {selector} - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("No valid selectors compiled for {field} from {attempted} attempts")]
    NoValidSelectors { field: String, attempted: usize },

    #[error("Invalid pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("No products found on listing page (tried {})", .tried_selectors.join(", "))]
    NoProductsFound { tried_selectors: Vec<String> },
}

impl ParsingError {
    pub fn invalid_selector(field: &str, selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn no_products_found(tried_selectors: Vec<String>) -> Self {
        Self::NoProductsFound { tried_selectors }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
