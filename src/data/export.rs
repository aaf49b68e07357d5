use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::model::RowTable;

// ---------------------------------------------------------------------------
// CSV export of prediction tables
// ---------------------------------------------------------------------------

/// Deterministic download filename for a prediction over `target_col`.
pub fn export_filename(target_col: &str) -> String {
    format!("superstore_predicted_{}.csv", target_col.to_lowercase())
}

/// Serialize the table as CSV text, header row first. Missing cells become
/// empty fields; dates render ISO-8601.
pub fn to_csv_string(table: &RowTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("writing csv header")?;
    for (row_no, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .with_context(|| format!("writing csv row {row_no}"))?;
    }
    let bytes = writer.into_inner().context("flushing csv buffer")?;
    String::from_utf8(bytes).context("csv output was not valid UTF-8")
}

/// Write the table to `path` as CSV.
pub fn write_csv(table: &RowTable, path: &Path) -> Result<()> {
    let text = to_csv_string(table)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    info!("exported {} rows to {}", table.len(), path.display());
    Ok(())
}
