//! Command handlers

mod import;
mod inspect;

pub use import::handle_import_command;
pub use inspect::{handle_columns_command, handle_sheets_command};
