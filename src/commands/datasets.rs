use std::io::Write;

use anyhow::Result;
use log::warn;

use crate::api::CthruClient;
use crate::datasets::{self, DATASETS};

/// Longest column description shown by `--info`
const DESCRIPTION_CHARS: usize = 80;

/// Print every registered dataset
pub fn list_command(out: &mut impl Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Available Datasets:")?;
    writeln!(out)?;
    for dataset in DATASETS {
        writeln!(out, "  {:<18} {}", dataset.key, dataset.name)?;
        writeln!(out, "                     {}", dataset.description)?;
        writeln!(out)?;
    }
    writeln!(out, "Use 'cthru datasets --info <name>' to see columns for a dataset.")?;
    Ok(())
}

/// Print a dataset's details and its columns from the metadata endpoint.
/// A failed metadata request is reported but does not fail the command.
pub async fn info_command(out: &mut impl Write, client: &CthruClient, key: &str) -> Result<()> {
    let dataset = datasets::lookup(key)?;

    writeln!(out)?;
    writeln!(out, "{} ({})", dataset.name, dataset.key)?;
    writeln!(out, "  ID: {}", dataset.id)?;
    writeln!(out, "  Description: {}", dataset.description)?;

    let metadata = match client.fetch_metadata(dataset.id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Metadata request for {} failed: {}", dataset.id, e);
            writeln!(out)?;
            writeln!(out, "  Column metadata unavailable: {}", e)?;
            return Ok(());
        }
    };

    writeln!(out)?;
    writeln!(out, "  Columns ({}):", metadata.columns.len())?;
    for column in &metadata.columns {
        writeln!(out, "    - {} ({})", column.field_name, column.data_type_name)?;
        if let Some(description) = column.short_description(DESCRIPTION_CHARS) {
            writeln!(out, "        {}", description)?;
        }
    }

    Ok(())
}
