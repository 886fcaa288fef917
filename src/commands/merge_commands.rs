//! `merge`: reconcile a base dataset with extracted details

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::MergeArgs;
use crate::domain::services::record_merger::merge_datasets;
use crate::infrastructure::{read_dataset, write_dataset};

/// Left-joins `args.incoming` onto `args.base`. A missing key column aborts
/// before anything is written.
pub async fn execute_merge(args: MergeArgs) -> Result<()> {
    let base = read_dataset(&args.base).context("Failed to load base dataset")?;
    let incoming = read_dataset(&args.incoming).context("Failed to load incoming dataset")?;
    info!(
        "Merging {} incoming rows into {} base rows on '{}'",
        incoming.len(),
        base.len(),
        args.key
    );

    let merged = merge_datasets(&base, &incoming, &args.key)?;
    write_dataset(&args.output, &merged)?;

    println!("Merged data saved to {} ({} rows)", args.output.display(), merged.len());
    Ok(())
}
