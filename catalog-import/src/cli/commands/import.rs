//! Import command handler

use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::import::run_import;

/// Run the import and print a summary
pub fn handle_import_command(config: &Config) -> Result<()> {
    let summary = run_import(config)?;

    println!(
        "{} {} products written to {}",
        "✓".green(),
        summary.records_written.to_string().bold(),
        config.output.display().to_string().cyan()
    );
    println!("  Sheets processed: {}", summary.sheets_processed);
    if !summary.excluded_sheets.is_empty() {
        println!(
            "  Sheets excluded:  {}",
            summary.excluded_sheets.join(", ").dimmed()
        );
    }
    println!(
        "  Rows read: {}, skipped: {}",
        summary.rows_read, summary.rows_skipped
    );

    if !summary.skipped_sheets.is_empty() {
        println!(
            "{}",
            format!("  {} sheet(s) skipped:", summary.skipped_sheets.len()).yellow()
        );
        for skipped in &summary.skipped_sheets {
            println!("    {} - {}", skipped.name, skipped.reason.dimmed());
        }
    }

    Ok(())
}
