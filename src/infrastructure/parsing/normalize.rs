//! Field normalization: prices, URLs and text
//!
//! All functions are total and side-effect free; failures come back as values.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Node};
use url::Url;

use crate::domain::errors::NormalizeError;
use crate::domain::product::{Price, NOT_FOUND};

lazy_static! {
    static ref PRICE_NUMBER: Regex = Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap();
}

const BLOCK_ELEMENTS: [&str; 14] = [
    "p", "br", "li", "ul", "ol", "div", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "section",
];

/// Raw price as delivered by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPrice<'a> {
    /// Display text such as `"$123.45"`
    Display(&'a str),
    /// Integer amount in minor units (cents)
    MinorUnits(i64),
}

/// Normalizes a price.
///
/// Display strings keep their trimmed text as the display form; the amount
/// is taken from the first number in the text.
#[allow(clippy::cast_possible_truncation)]
pub fn normalize_price(raw: RawPrice<'_>) -> Result<Price, NormalizeError> {
    match raw {
        RawPrice::MinorUnits(minor_units) => Ok(Price::from_minor_units(minor_units)),
        RawPrice::Display(text) => {
            let display = text.trim();
            let amount = PRICE_NUMBER
                .find(display)
                .map(|m| m.as_str().replace(',', ""))
                .and_then(|number| number.parse::<f64>().ok())
                .filter(|amount| amount.is_finite())
                .ok_or_else(|| NormalizeError::NotNumeric(display.to_string()))?;

            Ok(Price {
                display: display.to_string(),
                minor_units: (amount * 100.0).round() as i64,
            })
        }
    }
}

fn site_origin(base: &str) -> String {
    match Url::parse(base.trim()) {
        Ok(url) if url.has_host() => url.origin().ascii_serialization(),
        _ => base.trim().trim_end_matches('/').to_string(),
    }
}

/// Absolutizes a URL against a site base.
///
/// - absolute URLs are returned unchanged
/// - protocol-relative `//host/path` gets an `https:` prefix
/// - site-relative `/path` is prefixed with the origin of `base`
/// - anything else is resolved against `base` when possible
pub fn normalize_url(raw: &str, base: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return format!("https://{rest}");
    }
    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    if raw.starts_with('/') {
        return format!("{}{raw}", site_origin(base));
    }
    Url::parse(base.trim())
        .and_then(|base| base.join(raw))
        .map_or_else(|_| raw.to_string(), |url| url.to_string())
}

/// Trimmed text, or the sentinel for empty/whitespace-only input
pub fn normalize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NOT_FOUND.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Collapses every whitespace run into a single space and trims
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tidy_lines(raw: &str) -> String {
    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain text from an HTML fragment, one line per block element
pub fn html_to_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let mut text = String::with_capacity(fragment.len());
    for node in parsed.root_element().descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => text.push('\n'),
            _ => {}
        }
    }
    tidy_lines(&text)
}
