//! Product list parser for collection/listing pages
//!
//! Turns the product tiles of a static listing document into the base
//! dataset: one row per tile, stamped with a 1-based index and the
//! collection date.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use super::cascade::{Cardinality, SelectorCascade};
use super::config::{ListingSelectors, ParsingConfig};
use super::context::ListingParseContext;
use super::normalize::normalize_url;
use super::{ContextualParser, ParsingError, ParsingResult};
use crate::domain::dataset::Dataset;

pub const NAME_NOT_FOUND: &str = "Name not found";
pub const PRICE_NOT_FOUND: &str = "Price not found";
pub const URL_NOT_FOUND: &str = "URL not found";
pub const IMAGE_NOT_FOUND: &str = "Image not found";

/// Parser for extracting product tiles from listing pages
#[derive(Debug, Clone)]
pub struct ProductListParser {
    product_container: SelectorCascade,
    name: SelectorCascade,
    price: SelectorCascade,
    link: SelectorCascade,
    image: SelectorCascade,
}

impl ProductListParser {
    /// Create a new product list parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        let config = ParsingConfig::default();
        Self::with_config(&config.listing)
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            product_container: SelectorCascade::compile(
                "product_container",
                &selectors.product_container,
                Cardinality::First,
            )?,
            name: SelectorCascade::compile("name", &selectors.name, Cardinality::First)?,
            price: SelectorCascade::compile("price", &selectors.price, Cardinality::First)?,
            link: SelectorCascade::compile("link", &selectors.link, Cardinality::First)?,
            image: SelectorCascade::compile("image", &selectors.image, Cardinality::First)?,
        })
    }

    /// Column layout of the base dataset
    pub fn columns(context: &ListingParseContext) -> Vec<String> {
        let mut columns = vec!["Index".to_string(), "Date".to_string()];
        if context.brand.is_some() {
            columns.push("Brand".to_string());
        }
        columns.extend(
            ["Product Name", "Price", "URL", "Image URL"]
                .into_iter()
                .map(String::from),
        );
        columns
    }

    fn extract_tile(&self, tile: ElementRef<'_>, index: usize, context: &ListingParseContext) -> Vec<String> {
        let text_or = |cascade: &SelectorCascade, sentinel: &str| {
            cascade
                .extract_in(tile)
                .map(|raw| raw.into_text())
                .unwrap_or_else(|| sentinel.to_string())
        };
        let url_or = |cascade: &SelectorCascade, sentinel: &str| {
            cascade
                .extract_in(tile)
                .map(|raw| normalize_url(&raw.into_text(), &context.base_url))
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| sentinel.to_string())
        };

        let mut row = vec![(index + 1).to_string(), context.date.clone()];
        if let Some(brand) = &context.brand {
            row.push(brand.clone());
        }
        row.push(text_or(&self.name, NAME_NOT_FOUND));
        row.push(text_or(&self.price, PRICE_NOT_FOUND));

        let url = url_or(&self.link, URL_NOT_FOUND);
        if url == URL_NOT_FOUND {
            warn!("Product tile {} has no link", index + 1);
        }
        row.push(url);
        row.push(url_or(&self.image, IMAGE_NOT_FOUND));
        row
    }
}

impl ContextualParser for ProductListParser {
    type Output = Dataset;
    type Context = ListingParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let tiles = self.product_container.select_first_matching(html);

        if tiles.is_empty() {
            let tried = self
                .product_container
                .rules()
                .iter()
                .map(|rule| rule.css().to_string())
                .collect();
            return Err(ParsingError::no_products_found(tried));
        }

        debug!("Found {} product tiles on listing page", tiles.len());

        let mut dataset = Dataset::new(Self::columns(context));
        for (index, tile) in tiles.into_iter().enumerate() {
            dataset.push_row(self.extract_tile(tile, index, context));
        }

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <ul>
          <li class="grid__item">not a tile: .product-card comes first in the container cascade</li>
        </ul>
        <div class="product-card">
          <h3 class="product-card__title">Cloud Jogger</h3>
          <span class="price-item">$89.00</span>
          <a href="/products/cloud-jogger"><img src="//cdn.site.com/jogger.jpg"></a>
        </div>
        <div class="product-card">
          <a href="https://site.com/products/mystery"></a>
        </div>
    "#;

    fn context() -> ListingParseContext {
        ListingParseContext::new("https://site.com/collections/all").with_date("2024-05-01")
    }

    #[test]
    fn test_listing_rows_and_sentinels() {
        let parser = ProductListParser::new().unwrap();
        let dataset = parser
            .parse_with_context(&Html::parse_document(LISTING), &context())
            .unwrap();

        assert_eq!(
            dataset.columns(),
            ["Index", "Date", "Product Name", "Price", "URL", "Image URL"]
        );
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.rows()[0],
            [
                "1",
                "2024-05-01",
                "Cloud Jogger",
                "$89.00",
                "https://site.com/products/cloud-jogger",
                "https://cdn.site.com/jogger.jpg"
            ]
        );
        assert_eq!(dataset.cell(1, "Product Name"), Some(NAME_NOT_FOUND));
        assert_eq!(dataset.cell(1, "Price"), Some(PRICE_NOT_FOUND));
        assert_eq!(dataset.cell(1, "URL"), Some("https://site.com/products/mystery"));
        assert_eq!(dataset.cell(1, "Image URL"), Some(IMAGE_NOT_FOUND));
    }

    #[test]
    fn test_brand_column_is_stamped() {
        let parser = ProductListParser::new().unwrap();
        let context = context().with_brand(Some("Vuori".to_string()));
        let dataset = parser
            .parse_with_context(&Html::parse_document(LISTING), &context)
            .unwrap();

        assert_eq!(dataset.columns()[2], "Brand");
        assert_eq!(dataset.cell(0, "Brand"), Some("Vuori"));
        assert_eq!(dataset.cell(1, "Index"), Some("2"));
    }

    #[test]
    fn test_page_without_tiles_is_an_error() {
        let parser = ProductListParser::new().unwrap();
        let err = parser
            .parse_with_context(&Html::parse_document("<p>Empty collection</p>"), &context())
            .unwrap_err();
        assert!(matches!(err, ParsingError::NoProductsFound { ref tried_selectors } if tried_selectors.len() == 4));
    }
}
