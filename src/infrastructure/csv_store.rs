//! CSV persistence for datasets
//!
//! Reading is lenient: rows may be shorter or longer than the header and
//! are padded or truncated to the header width. A UTF-8 BOM on the first
//! header cell is dropped.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::dataset::Dataset;

const UTF8_BOM: char = '\u{feff}';

/// Reads a headed CSV file into a dataset
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header of {}", path.display()))?
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = if i == 0 { name.trim_start_matches(UTF8_BOM) } else { name };
            name.trim().to_string()
        })
        .collect();

    let width = columns.len();
    let mut rows = Vec::new();
    let mut reshaped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {} of {}", line + 1, path.display()))?;
        if record.len() != width {
            reshaped += 1;
        }
        rows.push(record.iter().take(width).map(str::to_string).collect::<Vec<_>>());
    }

    if reshaped > 0 {
        warn!("{} rows in {} did not match the header width", reshaped, path.display());
    }
    debug!("Read {} rows x {} columns from {}", rows.len(), width, path.display());

    Ok(Dataset::with_rows(columns, rows))
}

/// Writes a dataset as a headed CSV file, replacing any existing file
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    writer
        .write_record(dataset.columns())
        .with_context(|| format!("Failed to write CSV header to {}", path.display()))?;
    for row in dataset.rows() {
        writer
            .write_record(row)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!("Saved {} rows to {}", dataset.len(), path.display());
    Ok(())
}

/// `partial_<name>` next to `output`
pub fn partial_output_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map_or_else(|| "output.csv".into(), |n| n.to_string_lossy().into_owned());
    output.with_file_name(format!("partial_{}", name))
}
