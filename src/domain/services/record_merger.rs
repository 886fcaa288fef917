//! Field-level reconciliation of a base dataset with freshly extracted rows
//!
//! Left-join semantics on a key column: every base row appears exactly once,
//! incoming values only ever fill or replace, never blank out.

use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use crate::domain::dataset::Dataset;
use crate::domain::errors::SchemaError;
use crate::domain::product::{ERROR_SENTINEL, NOT_FOUND};

/// Which side of a merge a dataset plays, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetRole {
    Base,
    Incoming,
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetRole::Base => f.write_str("Base"),
            DatasetRole::Incoming => f.write_str("Incoming"),
        }
    }
}

/// Empty, whitespace-only and sentinel cells count as "no value"
pub fn is_blank_value(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == NOT_FOUND || value == ERROR_SENTINEL
}

fn require_key(dataset: &Dataset, key: &str, role: DatasetRole) -> Result<usize, SchemaError> {
    dataset.column_index(key).ok_or_else(|| SchemaError {
        dataset: role.to_string(),
        column: key.to_string(),
    })
}

/// Merges `incoming` into `base` on `key`.
///
/// Output schema is the base columns followed by incoming-only columns.
/// Shared columns only take non-blank incoming values; incoming-only
/// columns are copied as they are, sentinels included. Several incoming
/// rows with the same key are applied in input order.
pub fn merge_datasets(base: &Dataset, incoming: &Dataset, key: &str) -> Result<Dataset, SchemaError> {
    let base_key = require_key(base, key, DatasetRole::Base)?;
    let incoming_key = require_key(incoming, key, DatasetRole::Incoming)?;

    let mut merged = Dataset::new(base.columns().to_vec());

    // incoming column index -> (merged column index, shared with base), key excluded
    let base_width = base.columns().len();
    let column_map: Vec<(usize, usize, bool)> = incoming
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| *name != key)
        .map(|(idx, name)| {
            let to = merged.add_column(name);
            (idx, to, to < base_width)
        })
        .collect();

    let mut by_key: HashMap<&str, Vec<&Vec<String>>> = HashMap::new();
    for row in incoming.rows() {
        let value = row[incoming_key].trim();
        if !value.is_empty() {
            by_key.entry(value).or_default().push(row);
        }
    }

    let duplicated = by_key.values().filter(|rows| rows.len() > 1).count();
    if duplicated > 0 {
        debug!("{} join keys appear more than once in incoming; last non-blank value wins", duplicated);
    }

    let width = merged.columns().len();
    let mut enriched = 0usize;

    for base_row in base.rows() {
        let mut row = base_row.clone();
        row.resize(width, String::new());

        if let Some(matches) = by_key.get(base_row[base_key].trim()) {
            enriched += 1;
            for incoming_row in matches {
                for &(from, to, shared) in &column_map {
                    let value = &incoming_row[from];
                    if !shared || !is_blank_value(value) {
                        row[to].clone_from(value);
                    }
                }
            }
        }

        merged.push_row(row);
    }

    info!(
        "Merged {} base rows on '{}': {} enriched, {} passed through, {} columns",
        base.len(),
        key,
        enriched,
        base.len() - enriched,
        width
    );

    Ok(merged)
}
