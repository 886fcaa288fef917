//! Parsing context for product detail and listing pages

/// Context for the document strategy on one product page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Product URL being parsed
    pub url: String,

    /// Origin used to absolutize site-relative resources
    pub base_url: String,
}

impl DetailParseContext {
    pub fn new(url: &str, base_url: &str) -> Self {
        Self {
            url: url.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

/// Context for a collection/listing page
#[derive(Debug, Clone)]
pub struct ListingParseContext {
    /// Origin used to absolutize tile links and images
    pub base_url: String,

    /// Collection date stamped on every row (`YYYY-MM-DD`)
    pub date: String,

    /// Optional brand label stamped on every row
    pub brand: Option<String>,
}

impl ListingParseContext {
    /// Context dated today in local time
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            brand: None,
        }
    }

    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = brand.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }
}
