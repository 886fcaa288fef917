//! Structured storefront product payload (`/products/<handle>.js`)
//!
//! Only the handful of fields the record needs are modelled; everything
//! else in the payload is ignored.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::fabrication::FabricationMatcher;
use super::normalize::{html_to_text, normalize_price, normalize_text, normalize_url, RawPrice};
use crate::domain::errors::{ExtractionError, ExtractionResult};
use crate::domain::product::{CanonicalProductRecord, NOT_FOUND};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StorefrontVariant {
    #[serde(default)]
    pub option1: Option<String>,
}

/// Product object returned by the structured endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StorefrontProduct {
    #[serde(default)]
    pub title: Option<String>,
    /// Integer minor units; some themes send it as a numeric string
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variants: Option<Vec<StorefrontVariant>>,
    #[serde(default)]
    pub featured_image: Option<String>,
    /// Plain URL strings (`.js`) or `{ "src": ... }` objects (`.json`)
    #[serde(default)]
    pub images: Option<Vec<Value>>,
}

impl StorefrontProduct {
    /// Parses a payload body. Bodies wrapped as `{"product": {...}}` are unwrapped.
    pub fn parse(url: &str, body: &str) -> ExtractionResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ExtractionError::parse(url, format!("invalid product JSON: {e}")))?;

        let object = match value {
            Value::Object(mut map) if map.get("product").is_some_and(Value::is_object) => {
                map.remove("product").unwrap_or_default()
            }
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(ExtractionError::parse(
                    url,
                    format!("expected a JSON object, got {}", json_kind(&other)),
                ))
            }
        };

        serde_json::from_value(object)
            .map_err(|e| ExtractionError::parse(url, format!("unexpected product payload: {e}")))
    }

    /// Price in minor units; `None` when absent or not an integer amount
    pub fn price_minor_units(&self) -> Option<i64> {
        match self.price.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Variant `option1` values in payload order
    pub fn sizes(&self) -> impl Iterator<Item = &str> {
        self.variants
            .iter()
            .flatten()
            .filter_map(|variant| variant.option1.as_deref())
    }

    /// `featured_image`, else the first entry of `images`
    pub fn primary_image(&self) -> Option<&str> {
        let featured = self.featured_image.as_deref().filter(|s| !s.trim().is_empty());
        featured.or_else(|| {
            let first = self.images.as_ref()?.first()?;
            match first {
                Value::String(src) => Some(src.as_str()),
                Value::Object(map) => map.get("src").and_then(Value::as_str),
                _ => None,
            }
        })
    }

    /// Writes every field this payload can provide into `record`
    pub fn apply_to(&self, record: &mut CanonicalProductRecord, base: &str, matcher: &FabricationMatcher) {
        record.name = normalize_text(self.title.as_deref().unwrap_or_default());

        match self.price_minor_units() {
            Some(minor_units) => {
                if let Ok(price) = normalize_price(RawPrice::MinorUnits(minor_units)) {
                    record.price = price;
                }
            }
            None if self.price.is_some() => {
                warn!("Ignoring non-integer structured price for {}", record.url);
            }
            None => {}
        }

        let description = self.description.as_deref().map(html_to_text).unwrap_or_default();
        record.description = normalize_text(&description);

        for size in self.sizes() {
            record.push_size(size);
        }

        if let Some(image) = self.primary_image() {
            let image = normalize_url(image, base);
            if !image.is_empty() {
                record.image_url = image;
            }
        }

        if record.description != NOT_FOUND {
            record.fabrication = matcher.infer_or_sentinel(&record.description);
        }

        debug!(
            "Structured payload for {}: name='{}', price={}, {} sizes",
            record.url,
            record.name,
            record.price.display,
            record.sizes.len()
        );
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
