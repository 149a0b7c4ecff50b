//! CSV report writing

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while persisting a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to prepare report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes rows to `{dir}/{file_name}` as CSV
///
/// Headers come from the row type's serde field names. Rows are written in
/// the order given. When there are no rows, nothing is created and a warning
/// is logged.
///
/// # Returns
///
/// * `Ok(Some(path))` - The report was written
/// * `Ok(None)` - There were no rows
/// * `Err(ReportError)` - The directory or file could not be written
pub fn write_report<T: Serialize>(
    dir: &Path,
    file_name: &str,
    rows: &[T],
) -> Result<Option<PathBuf>, ReportError> {
    if rows.is_empty() {
        tracing::warn!("No data to save for {}", file_name);
        return Ok(None);
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(Some(path))
}
