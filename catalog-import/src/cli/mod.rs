//! Command-line interface
//!
//! A bare invocation runs the import with the default paths, so every argument
//! here is optional.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalog-import", version)]
#[command(about = "Convert a multi-sheet product spreadsheet into catalog import JSON", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./catalog-import.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Spreadsheet to read, overrides the config file
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// JSON file to write, overrides the config file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Extract products from every sheet and write the JSON file (default)
    Import,

    /// List sheets with their detected header row and category
    Sheets,

    /// Show how the columns of one sheet are interpreted
    Columns {
        /// Sheet name, exactly as in the workbook
        sheet: String,
    },
}
