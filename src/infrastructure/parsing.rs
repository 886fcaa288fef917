//! HTML and JSON parsing infrastructure
//!
//! Field normalization, fabrication inference, selector cascades and the
//! parsers built from them: the structured storefront payload, the product
//! detail page (document strategy) and collection listing pages.

pub mod cascade;
pub mod config;
pub mod context;
pub mod error;
pub mod fabrication;
pub mod normalize;
pub mod product_detail_parser;
pub mod product_list_parser;
pub mod storefront_json;

// Re-export public types
pub use cascade::{extract_field, first_success, Cardinality, RawValue, SelectorCascade, SelectorRule, ValueSource};
pub use config::{ListingSelectors, ParsingConfig, ProductPageSelectors, SelectorSpec};
pub use context::{DetailParseContext, ListingParseContext};
pub use error::{ParsingError, ParsingResult};
pub use fabrication::{infer_fabrication, FabricationMatcher};
pub use normalize::{normalize_price, normalize_text, normalize_url, RawPrice};
pub use product_detail_parser::{DocumentFields, ProductDetailParser};
pub use product_list_parser::ProductListParser;
pub use storefront_json::StorefrontProduct;

use scraper::Html;

/// Parser over an already parsed HTML document plus call-site context
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
