//! The import run
//!
//! Sheets are processed in workbook order. A sheet that cannot be read or has
//! no usable header is logged and left out; the run carries on with the rest.

use anyhow::{Context, Result, bail};

use super::category::CategoryMapper;
use super::columns::{ColumnMap, Columns};
use super::emit::write_records;
use super::extract::{ExtractionRules, RowExtractor};
use super::header::HeaderPolicy;
use super::record::ProductRecord;
use super::workbook::{SheetTable, Workbook, is_excluded};
use crate::config::{Config, FieldSynonyms};

/// Lookup tables and policies for one run, built once from the config
#[derive(Debug, Clone)]
pub struct Pipeline {
    excluded_sheets: Vec<String>,
    header: HeaderPolicy,
    categories: CategoryMapper,
    synonyms: FieldSynonyms,
    rules: ExtractionRules,
}

/// Where a sheet's header is and what its columns mean
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub header_row: usize,
    pub columns: Columns,
    pub map: ColumnMap,
    pub category: String,
}

/// Records and row counts from one sheet
#[derive(Debug, Clone, Default)]
pub struct SheetOutcome {
    pub records: Vec<ProductRecord>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSheet {
    pub name: String,
    pub reason: String,
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub sheets_processed: usize,
    pub excluded_sheets: Vec<String>,
    pub skipped_sheets: Vec<SkippedSheet>,
    /// Non-empty rows below the header
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub records_written: usize,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            excluded_sheets: config.excluded_sheets.clone(),
            header: HeaderPolicy::new(&config.header),
            categories: CategoryMapper::new(&config.categories),
            synonyms: config.fields.clone(),
            rules: ExtractionRules::new(&config.extraction),
        }
    }

    pub fn categories(&self) -> &CategoryMapper {
        &self.categories
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    pub fn is_excluded(&self, sheet_name: &str) -> bool {
        is_excluded(sheet_name, &self.excluded_sheets)
    }

    /// Locate the header and resolve the canonical columns
    pub fn layout(&self, sheet: &SheetTable) -> Result<SheetLayout> {
        let header_row = self
            .header
            .resolve(&sheet.name, &sheet.rows)
            .context("No header row found")?;

        let columns = Columns::from_header(&sheet.rows[header_row]);
        let map = ColumnMap::resolve(&columns, &self.synonyms);
        if map.title.is_none() {
            bail!(
                "No title column in header row {} (expected one of: {})",
                header_row,
                self.synonyms.title.join(", ")
            );
        }

        Ok(SheetLayout {
            header_row,
            columns,
            map,
            category: self.categories.category_for(&sheet.name).to_string(),
        })
    }

    /// Extract every data row below the header
    pub fn extract_sheet(&self, sheet: &SheetTable) -> Result<SheetOutcome> {
        let layout = self.layout(sheet)?;
        let extractor = RowExtractor::new(
            &self.rules,
            &layout.columns,
            &layout.map,
            &sheet.name,
            &layout.category,
        )?;

        let mut outcome = SheetOutcome::default();
        for (row_idx, row) in sheet.rows.iter().enumerate().skip(layout.header_row + 1) {
            if row.iter().all(|c| c.to_string().trim().is_empty()) {
                continue;
            }
            outcome.rows_read += 1;

            match extractor.extract(row) {
                Ok(record) => outcome.records.push(record),
                Err(skip) => {
                    outcome.rows_skipped += 1;
                    log::debug!("{} row {}: skipped, {}", sheet.name, row_idx + 1, skip);
                }
            }
        }

        Ok(outcome)
    }

    /// Run every non-excluded sheet of a workbook
    pub fn process(&self, workbook: &mut Workbook) -> (Vec<ProductRecord>, ImportSummary) {
        let mut records = Vec::new();
        let mut summary = ImportSummary::default();

        for name in workbook.sheet_names().to_vec() {
            if self.is_excluded(&name) {
                log::debug!("Excluded sheet: {}", name);
                summary.excluded_sheets.push(name);
                continue;
            }

            let result = workbook
                .read_sheet(&name)
                .and_then(|sheet| self.extract_sheet(&sheet));

            match result {
                Ok(outcome) => {
                    log::info!(
                        "{} -> {}: {} records ({} rows skipped)",
                        name,
                        self.categories.category_for(&name),
                        outcome.records.len(),
                        outcome.rows_skipped
                    );
                    summary.sheets_processed += 1;
                    summary.rows_read += outcome.rows_read;
                    summary.rows_skipped += outcome.rows_skipped;
                    records.extend(outcome.records);
                }
                Err(e) => {
                    log::warn!("Skipping sheet '{}': {:#}", name, e);
                    summary.skipped_sheets.push(SkippedSheet {
                        name,
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        (records, summary)
    }
}

/// Read the configured workbook and write the JSON file
pub fn run_import(config: &Config) -> Result<ImportSummary> {
    let pipeline = Pipeline::new(config);
    let mut workbook = Workbook::open(&config.input)?;

    log::info!(
        "Processing {} sheets from {}",
        workbook.sheet_names().len(),
        workbook.path().display()
    );

    let (records, mut summary) = pipeline.process(&mut workbook);
    write_records(&config.output, &records)?;
    summary.records_written = records.len();

    Ok(summary)
}
