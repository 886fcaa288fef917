//! Fabrication/material inference from free text
//!
//! Patterns run in a fixed priority order and the first one that matches
//! anywhere in the text wins:
//! 1. explicit labels (`Fabric:`, `Material:`, `Fabrication:`)
//! 2. phrasal forms (`Made of/from`, `Crafted from/with`, `Constructed from/with`)
//! 3. bare percentage compositions (`80% Nylon, 20% Spandex`)

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::cascade::first_success;
use super::error::{ParsingError, ParsingResult};
use crate::domain::product::NOT_FOUND;

const PATTERN_DEFINITIONS: [(&str, &str); 3] = [
    ("label", r"(?i)(?:Fabric|Material|Fabrication):\s*([^.\n]+)"),
    (
        "phrase",
        r"(?i)(?:Made of|Made from|Crafted from|Crafted with|Constructed from|Constructed with)\s+([^.\n]+)",
    ),
    ("composition", r"(?i)(\d+%\s*[A-Za-z]+(?:\s*,\s*\d+%\s*[A-Za-z]+)*)"),
];

lazy_static! {
    static ref DEFAULT_MATCHER: Option<FabricationMatcher> = FabricationMatcher::new().ok();
}

#[derive(Debug, Clone)]
struct FabricationPattern {
    name: &'static str,
    regex: Regex,
}

/// Ordered fabrication patterns
#[derive(Debug, Clone)]
pub struct FabricationMatcher {
    patterns: Vec<FabricationPattern>,
}

impl FabricationMatcher {
    pub fn new() -> ParsingResult<Self> {
        let patterns = PATTERN_DEFINITIONS
            .iter()
            .map(|(name, pattern)| {
                Regex::new(pattern)
                    .map(|regex| FabricationPattern { name: *name, regex })
                    .map_err(|e| ParsingError::InvalidPattern {
                        name: (*name).to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<ParsingResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// First capture of the highest-priority matching pattern
    pub fn infer(&self, text: &str) -> Option<String> {
        first_success(&self.patterns, |pattern| {
            let captured = pattern.regex.captures(text)?.get(1)?.as_str().trim();
            if captured.is_empty() {
                return None;
            }
            debug!("Fabrication matched by {} pattern: {}", pattern.name, captured);
            Some(captured.to_string())
        })
    }

    /// Like [`Self::infer`] but returns the sentinel when nothing matches
    pub fn infer_or_sentinel(&self, text: &str) -> String {
        if text.trim().is_empty() || text == NOT_FOUND {
            return NOT_FOUND.to_string();
        }
        self.infer(text).unwrap_or_else(|| NOT_FOUND.to_string())
    }
}

/// Infers fabrication with the built-in patterns; sentinel when nothing matches
pub fn infer_fabrication(description: &str) -> String {
    DEFAULT_MATCHER
        .as_ref()
        .map_or_else(|| NOT_FOUND.to_string(), |matcher| matcher.infer_or_sentinel(description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_label_beats_percentage_composition() {
        let text = "Our softest tee. Fabric: Cotton. Blend details: 50% Cotton, 50% Polyester.";
        assert_eq!(infer_fabrication(text), "Cotton");

        let reversed = "Blend details: 50% Cotton, 50% Polyester. Fabric: Cotton.";
        assert_eq!(infer_fabrication(reversed), "Cotton");
    }

    #[test]
    fn test_phrase_beats_percentage_composition() {
        let text = "Made from recycled nylon. Shell is 80% Nylon, 20% Spandex.";
        assert_eq!(infer_fabrication(text), "recycled nylon");
    }

    #[rstest]
    #[case("Material: 100% organic cotton", "100% organic cotton")]
    #[case("FABRICATION:   Airlift knit.", "Airlift knit")]
    #[case("Crafted with a sweat-wicking blend. Wash cold.", "a sweat-wicking blend")]
    #[case("constructed from Italian wool", "Italian wool")]
    #[case("80% Nylon, 20% Spandex", "80% Nylon, 20% Spandex")]
    #[case("Shell: 88%Polyester , 12% Elastane", "88%Polyester , 12% Elastane")]
    fn test_pattern_forms(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(infer_fabrication(text), expected);
    }

    #[test]
    fn test_label_stops_at_line_break() {
        let text = "Fabric: Cotton jersey\nCare: Machine wash cold";
        assert_eq!(infer_fabrication(text), "Cotton jersey");
    }

    #[rstest]
    #[case("A relaxed jogger for everyday wear.")]
    #[case("")]
    #[case("Not found")]
    fn test_no_match_returns_sentinel(#[case] text: &str) {
        assert_eq!(infer_fabrication(text), NOT_FOUND);
    }

    #[test]
    fn test_empty_label_capture_falls_through() {
        let matcher = FabricationMatcher::new().unwrap();
        assert_eq!(matcher.infer("Fabric:  . 60% Cotton, 40% Modal").as_deref(), Some("60% Cotton, 40% Modal"));
    }
}
