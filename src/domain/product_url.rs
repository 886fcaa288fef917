use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use super::errors::{ExtractionError, ExtractionResult};

/// Site-specific product handle parsed out of a product URL path.
///
/// Accepts `/products/<handle>` and `/collections/<name>/products/<handle>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductHandle {
    handle: String,
    origin: String,
}

impl ProductHandle {
    /// Resolves the handle from an item URL, failing fast when the URL does not
    /// reference a product
    pub fn from_url(url: &str) -> ExtractionResult<Self> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| ExtractionError::identifier(url, &format!("invalid URL ({e})")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ExtractionError::identifier(url, "not an HTTP URL"));
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let handle = segments
            .iter()
            .position(|segment| *segment == "products")
            .filter(|&idx| idx == 0 || (idx == 2 && segments[0] == "collections"))
            .and_then(|idx| segments.get(idx + 1))
            .map(|handle| handle.trim_end_matches(".js").trim_end_matches(".json"))
            .filter(|handle| !handle.is_empty())
            .ok_or_else(|| ExtractionError::identifier(url, "path is not /products/<handle>"))?;

        Ok(Self {
            handle: handle.to_string(),
            origin: parsed.origin().ascii_serialization(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.handle
    }

    /// Scheme and host of the URL the handle came from, e.g. `https://site.com`
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Structured endpoint for this handle under the given site base
    pub fn structured_url(&self, site_base: Option<&str>) -> String {
        let base = site_base.unwrap_or(&self.origin).trim_end_matches('/');
        format!("{base}/products/{}.js", self.handle)
    }
}

impl AsRef<str> for ProductHandle {
    fn as_ref(&self) -> &str {
        &self.handle
    }
}

impl fmt::Display for ProductHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (origin: {})", self.handle, self.origin)
    }
}
