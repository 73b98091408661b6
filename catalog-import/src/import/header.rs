//! Header row detection
//!
//! Exports put their header at different rows depending on the sheet: some
//! start at row 0, others carry instruction rows above it. The strategy is
//! therefore configuration, with per-sheet overrides.

use std::collections::HashMap;

use calamine::Data;

use super::cells::cell_to_string;
use super::columns::fold;
use crate::config::{HeaderConfig, HeaderMiss, HeaderMode};

/// How to find the header row of one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// First row within `window` holding any of `tokens`
    Scan { window: usize, tokens: Vec<String> },
    /// Always this row
    Fixed(usize),
}

/// Locate the header row, `None` when the strategy finds nothing
///
/// Scanning is top to bottom and the first matching row wins. A cell matches
/// when it equals a token exactly, ignoring case and accents.
pub fn locate_header(rows: &[Vec<Data>], strategy: &HeaderStrategy) -> Option<usize> {
    match strategy {
        HeaderStrategy::Fixed(row) => (*row < rows.len()).then_some(*row),
        HeaderStrategy::Scan { window, tokens } => {
            let tokens: Vec<String> = tokens.iter().map(|t| fold(t)).collect();
            rows.iter().take(*window).position(|row| {
                row.iter().any(|cell| {
                    let value = fold(&cell_to_string(cell));
                    !value.is_empty() && tokens.contains(&value)
                })
            })
        }
    }
}

/// Header strategy for every sheet of a run
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    default: HeaderStrategy,
    overrides: HashMap<String, usize>,
    on_miss: HeaderMiss,
}

impl HeaderPolicy {
    pub fn new(config: &HeaderConfig) -> Self {
        let default = match config.mode {
            HeaderMode::Scan => HeaderStrategy::Scan {
                window: config.scan_rows,
                tokens: config.tokens.clone(),
            },
            HeaderMode::Fixed => HeaderStrategy::Fixed(config.fixed_row),
        };

        Self {
            default,
            overrides: config.overrides.clone(),
            on_miss: config.on_miss,
        }
    }

    pub fn strategy_for(&self, sheet_name: &str) -> HeaderStrategy {
        match self.overrides.get(sheet_name) {
            Some(row) => HeaderStrategy::Fixed(*row),
            None => self.default.clone(),
        }
    }

    /// Header row for a sheet, applying the miss policy
    pub fn resolve(&self, sheet_name: &str, rows: &[Vec<Data>]) -> Option<usize> {
        let strategy = self.strategy_for(sheet_name);
        if let Some(idx) = locate_header(rows, &strategy) {
            return Some(idx);
        }

        match self.on_miss {
            HeaderMiss::FirstRow if !rows.is_empty() => {
                log::debug!("{}: no header found, assuming row 0", sheet_name);
                Some(0)
            }
            _ => None,
        }
    }
}
