//! JSON output

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::record::ProductRecord;

/// Write all records as one pretty-printed UTF-8 JSON array
///
/// Output goes to a sibling `.tmp` file that is renamed over `path` once
/// complete, so the target never holds a partial array.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let tmp_path = temp_path(path)?;
    if let Err(e) = write_json(&tmp_path, records) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| {
            format!(
                "Failed to move {} to {}",
                tmp_path.display(),
                path.display()
            )
        });
    }

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Output path has no file name: {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

fn write_json(path: &Path, records: &[ProductRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records)
        .context("Failed to serialize product records")?;
    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    writer
        .get_ref()
        .sync_all()
        .with_context(|| format!("Failed to sync output file: {}", path.display()))?;

    Ok(())
}
