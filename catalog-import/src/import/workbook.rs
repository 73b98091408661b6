//! Workbook loading
//!
//! Opens the export once and materializes sheets on demand. Rows keep their
//! absolute positions: calamine trims leading empty rows and columns from a
//! range, so they are padded back in.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx, open_workbook};

/// An open spreadsheet
pub struct Workbook {
    path: PathBuf,
    inner: Xlsx<BufReader<File>>,
    sheet_names: Vec<String>,
}

/// One sheet, fully read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub rows: Vec<Vec<Data>>,
}

impl Workbook {
    /// Open an `.xlsx` file. Failure here is fatal for the run.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let inner: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
        let sheet_names = inner.sheet_names().to_vec();

        log::debug!("Opened {} ({} sheets)", path.display(), sheet_names.len());

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            sheet_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Read a sheet's cells
    pub fn read_sheet(&mut self, name: &str) -> Result<SheetTable> {
        let range = self
            .inner
            .worksheet_range(name)
            .with_context(|| format!("Failed to read sheet: {}", name))?;
        Ok(SheetTable::from_range(name, &range))
    }
}

impl SheetTable {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    fn from_range(name: &str, range: &Range<Data>) -> Self {
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Data>> = vec![Vec::new(); start_row];
        for row in range.rows() {
            let mut cells = vec![Data::Empty; start_col];
            cells.extend_from_slice(row);
            rows.push(cells);
        }

        Self::new(name, rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Whether a sheet is on the exclusion list (exact name match)
pub fn is_excluded(sheet_name: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|e| e == sheet_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_excluded() {
        let excluded = vec!["Ayuda".to_string(), "hidden".to_string()];
        assert!(is_excluded("Ayuda", &excluded));
        assert!(is_excluded("hidden", &excluded));
        assert!(!is_excluded("ayuda", &excluded));
        assert!(!is_excluded("Senuelos de pesca", &excluded));
    }

    #[test]
    fn test_from_range_pads_leading_rows_and_columns() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("SKU".into()));
        range.set_value((2, 2), Data::String("TITLE".into()));
        range.set_value((3, 1), Data::String("A1".into()));

        let sheet = SheetTable::from_range("Linternas", &range);

        assert_eq!(sheet.row_count(), 4);
        assert!(sheet.rows[0].is_empty());
        assert_eq!(sheet.rows[2][0], Data::Empty);
        assert_eq!(sheet.rows[2][1], Data::String("SKU".into()));
        assert_eq!(sheet.rows[3][2], Data::Empty);
    }

    #[test]
    fn test_open_missing_file_fails_with_path() {
        let err = match Workbook::open("/nonexistent/catalog.xlsx") {
            Ok(_) => panic!("expected open to fail"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("/nonexistent/catalog.xlsx"));
    }
}
