use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written when a field cannot be determined
pub const NOT_FOUND: &str = "Not found";

/// Placeholder written into every derived column of a failed row
pub const ERROR_SENTINEL: &str = "Error";

/// Canonical output column names, in output order
pub const CANONICAL_COLUMNS: [&str; 7] = [
    "Product Name",
    "Price",
    "URL",
    "Image URL",
    "Product Description",
    "Sizes Available",
    "Fabrication",
];

/// Logical fields of a canonical product record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductField {
    Name,
    Price,
    Url,
    ImageUrl,
    Description,
    Sizes,
    Fabrication,
}

impl ProductField {
    pub const ALL: [ProductField; 7] = [
        ProductField::Name,
        ProductField::Price,
        ProductField::Url,
        ProductField::ImageUrl,
        ProductField::Description,
        ProductField::Sizes,
        ProductField::Fabrication,
    ];

    /// Output column name for this field
    pub const fn column(self) -> &'static str {
        match self {
            ProductField::Name => CANONICAL_COLUMNS[0],
            ProductField::Price => CANONICAL_COLUMNS[1],
            ProductField::Url => CANONICAL_COLUMNS[2],
            ProductField::ImageUrl => CANONICAL_COLUMNS[3],
            ProductField::Description => CANONICAL_COLUMNS[4],
            ProductField::Sizes => CANONICAL_COLUMNS[5],
            ProductField::Fabrication => CANONICAL_COLUMNS[6],
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Price with its display form and normalized amount in minor units (cents).
///
/// A zero amount means "unset"; the completeness check relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub display: String,
    pub minor_units: i64,
}

impl Price {
    /// Unset price, rendered as `$0.00`
    pub fn zero() -> Self {
        Self::from_minor_units(0)
    }

    /// Build a price from an integer amount in cents
    pub fn from_minor_units(minor_units: i64) -> Self {
        let sign = if minor_units < 0 { "-" } else { "" };
        let abs = minor_units.unsigned_abs();
        Self {
            display: format!("{sign}${}.{:02}", abs / 100, abs % 100),
            minor_units,
        }
    }

    pub fn is_set(&self) -> bool {
        self.minor_units != 0
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

/// Product record in the canonical schema.
///
/// Every field always exists; undetermined text fields hold [`NOT_FOUND`],
/// an undetermined price is [`Price::zero`] and an undetermined size list is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalProductRecord {
    pub name: String,
    pub price: Price,
    pub url: String,
    pub image_url: String,
    pub description: String,
    pub sizes: Vec<String>,
    pub fabrication: String,
}

impl CanonicalProductRecord {
    /// Sentinel-filled record for a source URL
    pub fn empty(url: &str) -> Self {
        Self {
            name: NOT_FOUND.to_string(),
            price: Price::zero(),
            url: url.to_string(),
            image_url: NOT_FOUND.to_string(),
            description: NOT_FOUND.to_string(),
            sizes: Vec::new(),
            fabrication: NOT_FOUND.to_string(),
        }
    }

    /// Whether a field still holds its sentinel value
    pub fn is_unset(&self, field: ProductField) -> bool {
        match field {
            ProductField::Name => self.name == NOT_FOUND,
            ProductField::Price => !self.price.is_set(),
            ProductField::Url => self.url.trim().is_empty(),
            ProductField::ImageUrl => self.image_url == NOT_FOUND,
            ProductField::Description => self.description == NOT_FOUND,
            ProductField::Sizes => self.sizes.is_empty(),
            ProductField::Fabrication => self.fabrication == NOT_FOUND,
        }
    }

    /// Fields that are still unset, in canonical order
    pub fn missing_fields(&self) -> Vec<ProductField> {
        ProductField::ALL
            .into_iter()
            .filter(|field| self.is_unset(*field))
            .collect()
    }

    /// Name and price both known; anything less warrants the document strategy
    pub fn is_complete(&self) -> bool {
        !self.is_unset(ProductField::Name) && !self.is_unset(ProductField::Price)
    }

    /// Appends a size keeping the list ordered and free of duplicates
    pub fn push_size(&mut self, size: &str) {
        let size = size.trim();
        if !size.is_empty() && !self.sizes.iter().any(|s| s == size) {
            self.sizes.push(size.to_string());
        }
    }

    pub fn sizes_display(&self) -> String {
        if self.sizes.is_empty() {
            NOT_FOUND.to_string()
        } else {
            self.sizes.join(", ")
        }
    }

    /// Output cell value for a field
    pub fn value(&self, field: ProductField) -> String {
        match field {
            ProductField::Name => self.name.clone(),
            ProductField::Price => self.price.display.clone(),
            ProductField::Url => self.url.clone(),
            ProductField::ImageUrl => self.image_url.clone(),
            ProductField::Description => self.description.clone(),
            ProductField::Sizes => self.sizes_display(),
            ProductField::Fabrication => self.fabrication.clone(),
        }
    }
}
