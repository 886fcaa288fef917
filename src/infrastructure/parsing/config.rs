//! Parsing configuration for HTML extraction
//!
//! Centralized configuration for CSS selector cascades. Every list is an
//! ordered cascade: earlier entries win over later ones.

use serde::{Deserialize, Serialize};

/// One cascade rule: a CSS selector plus the attribute to read (text if none)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSpec {
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl SelectorSpec {
    pub fn text(css: &str) -> Self {
        Self {
            css: css.to_string(),
            attribute: None,
        }
    }

    pub fn attr(css: &str, attribute: &str) -> Self {
        Self {
            css: css.to_string(),
            attribute: Some(attribute.to_string()),
        }
    }
}

/// Main parsing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Product detail page selectors (document strategy)
    pub product_page: ProductPageSelectors,

    /// Collection/listing page selectors
    pub listing: ListingSelectors,
}

/// CSS selectors for product detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPageSelectors {
    pub name: Vec<SelectorSpec>,
    pub price: Vec<SelectorSpec>,
    pub description: Vec<SelectorSpec>,
    pub sizes: Vec<SelectorSpec>,
    pub image: Vec<SelectorSpec>,
    /// Dedicated fabric/material sections, tried before text inference
    pub fabrication: Vec<SelectorSpec>,
}

impl Default for ProductPageSelectors {
    fn default() -> Self {
        Self {
            name: vec![
                SelectorSpec::text("h1.product-name"),
                SelectorSpec::text(".product-name"),
                SelectorSpec::text(".product__title h1"),
                SelectorSpec::attr("meta[property='og:title']", "content"),
            ],
            price: vec![
                SelectorSpec::text(".product-price"),
                SelectorSpec::text(".price-item--regular"),
                SelectorSpec::attr("meta[property='product:price:amount']", "content"),
                SelectorSpec::attr("meta[property='og:price:amount']", "content"),
            ],
            description: vec![
                SelectorSpec::text(".product-description"),
                SelectorSpec::text(".product__description"),
                SelectorSpec::attr("meta[name='description']", "content"),
            ],
            sizes: vec![
                SelectorSpec::text(".size-selector .size-option"),
                SelectorSpec::text(".swatch-element"),
                SelectorSpec::text("[data-option-name='Size'] .swatch-element"),
            ],
            image: vec![
                SelectorSpec::attr(".product-image img", "src"),
                SelectorSpec::attr(".product-image img", "data-src"),
                SelectorSpec::attr("meta[property='og:image']", "content"),
            ],
            fabrication: vec![
                SelectorSpec::text(".fabric-content"),
                SelectorSpec::text(".material-content"),
                SelectorSpec::text(".product-fabric"),
            ],
        }
    }
}

/// CSS selectors for collection/listing pages, scoped to each product tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Selectors for product tiles - first selector with any match wins
    pub product_container: Vec<SelectorSpec>,
    pub name: Vec<SelectorSpec>,
    pub price: Vec<SelectorSpec>,
    pub link: Vec<SelectorSpec>,
    pub image: Vec<SelectorSpec>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            product_container: vec![
                SelectorSpec::text(".PlpTile"),
                SelectorSpec::text(".product-card"),
                SelectorSpec::text(".product-tile"),
                SelectorSpec::text("li.grid__item"),
            ],
            name: vec![
                SelectorSpec::text(".product-name a"),
                SelectorSpec::text(".product-name"),
                SelectorSpec::text(".product-card__title"),
                SelectorSpec::text(".card__heading a"),
            ],
            price: vec![
                SelectorSpec::text(".card-price .product-price"),
                SelectorSpec::text(".product-card-price span"),
                SelectorSpec::text(".product-price"),
                SelectorSpec::text(".price-item"),
            ],
            link: vec![
                SelectorSpec::attr(".product-name a", "href"),
                SelectorSpec::attr("a[href*='/products/']", "href"),
                SelectorSpec::attr("a", "href"),
            ],
            image: vec![
                SelectorSpec::attr("img.normal", "src"),
                SelectorSpec::attr("img", "src"),
                SelectorSpec::attr("img", "data-src"),
            ],
        }
    }
}
