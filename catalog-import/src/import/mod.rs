//! Spreadsheet export to catalog JSON
//!
//! Pipeline: workbook loader -> header locator -> column normalizer ->
//! category mapper -> row extractor -> JSON emitter.

mod category;
mod cells;
mod columns;
mod emit;
mod extract;
mod header;
mod pipeline;
mod record;
mod workbook;

pub use columns::CanonicalField;
pub use extract::RowExtractor;
pub use pipeline::{Pipeline, SheetLayout, run_import};
pub use workbook::Workbook;
