//! Selector cascades: ordered extraction rules for one logical field
//!
//! Rules are evaluated strictly in order. The first rule whose selector
//! matches and whose extracted value is non-empty after trimming is the
//! result; later rules are never consulted.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace, warn};

use super::config::SelectorSpec;
use super::error::{ParsingError, ParsingResult};
use super::normalize::collapse_whitespace;

/// Evaluates candidates in order and returns the first success
pub fn first_success<I, T, F>(candidates: I, attempt: F) -> Option<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Option<T>,
{
    candidates.into_iter().find_map(attempt)
}

/// Where a rule reads its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    Text,
    Attribute(String),
}

/// Whether a rule reads the first matching node or every matching node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    First,
    All,
}

/// Raw, not yet normalized value produced by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Single(String),
    List(Vec<String>),
}

impl RawValue {
    /// Flattens to one string; lists are comma-joined
    pub fn into_text(self) -> String {
        match self {
            RawValue::Single(value) => value,
            RawValue::List(values) => values.join(", "),
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            RawValue::Single(value) => vec![value],
            RawValue::List(values) => values,
        }
    }
}

/// Named extraction rule bound to a logical field
#[derive(Debug, Clone)]
pub struct SelectorRule {
    name: String,
    css: String,
    selector: Selector,
    source: ValueSource,
    cardinality: Cardinality,
}

impl SelectorRule {
    pub fn new(name: &str, css: &str, source: ValueSource, cardinality: Cardinality) -> ParsingResult<Self> {
        let selector = Selector::parse(css)
            .map_err(|e| ParsingError::invalid_selector(name, css, &e.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            css: css.to_string(),
            selector,
            source,
            cardinality,
        })
    }

    pub fn from_spec(name: &str, spec: &SelectorSpec, cardinality: Cardinality) -> ParsingResult<Self> {
        let source = spec
            .attribute
            .as_ref()
            .map_or(ValueSource::Text, |attr| ValueSource::Attribute(attr.clone()));
        Self::new(name, &spec.css, source, cardinality)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    fn read(&self, element: ElementRef<'_>) -> Option<String> {
        let value = match &self.source {
            ValueSource::Text => collapse_whitespace(&element.text().collect::<String>()),
            ValueSource::Attribute(attr) => element.value().attr(attr)?.trim().to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    /// Applies the rule to the descendants of `scope`
    pub fn apply(&self, scope: ElementRef<'_>) -> Option<RawValue> {
        match self.cardinality {
            Cardinality::First => {
                let element = scope.select(&self.selector).next()?;
                self.read(element).map(RawValue::Single)
            }
            Cardinality::All => {
                let values: Vec<String> = scope
                    .select(&self.selector)
                    .filter_map(|element| self.read(element))
                    .collect();
                (!values.is_empty()).then_some(RawValue::List(values))
            }
        }
    }
}

/// Runs `rules` in order against a document; first non-empty result wins
pub fn extract_field(document: &Html, rules: &[SelectorRule]) -> Option<RawValue> {
    extract_in(document.root_element(), rules)
}

fn extract_in(scope: ElementRef<'_>, rules: &[SelectorRule]) -> Option<RawValue> {
    first_success(rules, |rule| {
        let value = rule.apply(scope);
        if value.is_some() {
            trace!("Rule {} ({}) produced a value", rule.name(), rule.css());
        }
        value
    })
}

/// Ordered list of rules for one logical field
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    field: String,
    rules: Vec<SelectorRule>,
}

impl SelectorCascade {
    pub fn new(field: &str, rules: Vec<SelectorRule>) -> Self {
        Self {
            field: field.to_string(),
            rules,
        }
    }

    /// Compiles configured specs into a cascade.
    ///
    /// Invalid selectors are skipped with a warning; a cascade in which no
    /// selector compiles is an error.
    pub fn compile(field: &str, specs: &[SelectorSpec], cardinality: Cardinality) -> ParsingResult<Self> {
        let mut rules = Vec::with_capacity(specs.len());

        for (i, spec) in specs.iter().enumerate() {
            match SelectorRule::from_spec(&format!("{field}#{i}"), spec, cardinality) {
                Ok(rule) => rules.push(rule),
                Err(e) => warn!("Failed to compile selector '{}': {}", spec.css, e),
            }
        }

        if rules.is_empty() && !specs.is_empty() {
            return Err(ParsingError::NoValidSelectors {
                field: field.to_string(),
                attempted: specs.len(),
            });
        }

        Ok(Self::new(field, rules))
    }

    pub fn rules(&self) -> &[SelectorRule] {
        &self.rules
    }

    pub fn extract(&self, document: &Html) -> Option<RawValue> {
        self.extract_in(document.root_element())
    }

    /// Same as [`Self::extract`] but scoped to the descendants of one element
    pub fn extract_in(&self, scope: ElementRef<'_>) -> Option<RawValue> {
        let value = extract_in(scope, &self.rules);
        if value.is_none() {
            debug!("Failed to extract {} using {} selectors", self.field, self.rules.len());
        }
        value
    }

    pub fn extract_text(&self, document: &Html) -> Option<String> {
        self.extract(document).map(RawValue::into_text)
    }

    /// Elements matched by the first rule that matches anything
    pub fn select_first_matching<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        first_success(&self.rules, |rule| {
            let elements: Vec<_> = document.select(rule.selector()).collect();
            (!elements.is_empty()).then_some(elements)
        })
        .unwrap_or_default()
    }
}
