//! Product detail parser (document strategy)
//!
//! Re-derives every canonical field from a rendered product page using one
//! selector cascade per field. The result only fills fields that are still
//! unset on the record, so values obtained earlier are never overwritten.

#![allow(clippy::uninlined_format_args)]

use scraper::Html;
use tracing::{debug, warn};

use super::cascade::{Cardinality, SelectorCascade};
use super::config::{ParsingConfig, ProductPageSelectors};
use super::context::DetailParseContext;
use super::fabrication::FabricationMatcher;
use super::normalize::{normalize_price, normalize_text, normalize_url, RawPrice};
use super::{ContextualParser, ParsingResult};
use crate::domain::product::{CanonicalProductRecord, Price, ProductField, NOT_FOUND};

/// Fields recovered from a product page; `None`/empty means not found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFields {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub sizes: Vec<String>,
    pub image_url: Option<String>,
    pub fabrication: Option<String>,
}

impl DocumentFields {
    /// Writes recovered values into fields of `record` that are still unset.
    ///
    /// Returns the fields that were filled.
    pub fn fill_unset(self, record: &mut CanonicalProductRecord) -> Vec<ProductField> {
        let mut filled = Vec::new();

        if let Some(name) = self.name {
            if record.is_unset(ProductField::Name) {
                record.name = name;
                filled.push(ProductField::Name);
            }
        }
        if let Some(price) = self.price {
            if record.is_unset(ProductField::Price) && price.is_set() {
                record.price = price;
                filled.push(ProductField::Price);
            }
        }
        if let Some(description) = self.description {
            if record.is_unset(ProductField::Description) {
                record.description = description;
                filled.push(ProductField::Description);
            }
        }
        if !self.sizes.is_empty() && record.is_unset(ProductField::Sizes) {
            for size in &self.sizes {
                record.push_size(size);
            }
            filled.push(ProductField::Sizes);
        }
        if let Some(image_url) = self.image_url {
            if record.is_unset(ProductField::ImageUrl) {
                record.image_url = image_url;
                filled.push(ProductField::ImageUrl);
            }
        }
        if let Some(fabrication) = self.fabrication {
            if record.is_unset(ProductField::Fabrication) {
                record.fabrication = fabrication;
                filled.push(ProductField::Fabrication);
            }
        }

        filled
    }
}

/// Parser for extracting product fields from product detail pages
#[derive(Debug, Clone)]
pub struct ProductDetailParser {
    name: SelectorCascade,
    price: SelectorCascade,
    description: SelectorCascade,
    sizes: SelectorCascade,
    image: SelectorCascade,
    fabrication: SelectorCascade,
    matcher: FabricationMatcher,
}

impl ProductDetailParser {
    /// Create a new product detail parser with default configuration
    pub fn new() -> ParsingResult<Self> {
        let config = ParsingConfig::default();
        Self::with_config(&config.product_page)
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ProductPageSelectors) -> ParsingResult<Self> {
        Ok(Self {
            name: SelectorCascade::compile("name", &selectors.name, Cardinality::First)?,
            price: SelectorCascade::compile("price", &selectors.price, Cardinality::First)?,
            description: SelectorCascade::compile("description", &selectors.description, Cardinality::First)?,
            sizes: SelectorCascade::compile("sizes", &selectors.sizes, Cardinality::All)?,
            image: SelectorCascade::compile("image", &selectors.image, Cardinality::First)?,
            fabrication: SelectorCascade::compile("fabrication", &selectors.fabrication, Cardinality::First)?,
            matcher: FabricationMatcher::new()?,
        })
    }

    pub fn matcher(&self) -> &FabricationMatcher {
        &self.matcher
    }

    fn extract_price(&self, html: &Html, context: &DetailParseContext) -> Option<Price> {
        let raw = self.price.extract_text(html)?;
        match normalize_price(RawPrice::Display(&raw)) {
            Ok(price) => Some(price),
            Err(e) => {
                warn!("Unusable price on {}: {}", context.url, e);
                None
            }
        }
    }

    fn extract_fabrication(&self, html: &Html, description: Option<&str>) -> Option<String> {
        if let Some(section) = self.fabrication.extract_text(html) {
            return Some(section);
        }
        let description = description?;
        self.matcher.infer(description)
    }
}

impl ContextualParser for ProductDetailParser {
    type Output = DocumentFields;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        debug!("Parsing product detail from: {}", context.url);

        let name = self
            .name
            .extract_text(html)
            .map(|raw| normalize_text(&raw))
            .filter(|name| name != NOT_FOUND);

        let price = self.extract_price(html, context);

        let description = self
            .description
            .extract_text(html)
            .map(|raw| normalize_text(&raw))
            .filter(|text| text != NOT_FOUND);

        let sizes = self.sizes.extract(html).map(|raw| raw.into_list()).unwrap_or_default();

        let image_url = self
            .image
            .extract_text(html)
            .map(|raw| normalize_url(&raw, &context.base_url))
            .filter(|url| !url.is_empty());

        let fabrication = self.extract_fabrication(html, description.as_deref());

        let fields = DocumentFields {
            name,
            price,
            description,
            sizes,
            image_url,
            fabrication,
        };

        debug!(
            "Document strategy for {}: name={}, price={}, {} sizes, image={}, fabrication={}",
            context.url,
            fields.name.is_some(),
            fields.price.is_some(),
            fields.sizes.len(),
            fields.image_url.is_some(),
            fields.fabrication.is_some()
        );

        Ok(fields)
    }
}
