//! catalog-import
//!
//! Reads a multi-sheet product spreadsheet export and writes the JSON array the
//! catalog seeder consumes.

mod cli;
mod config;
mod import;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.input, cli.output);

    match cli.command.unwrap_or(Commands::Import) {
        Commands::Import => cli::commands::handle_import_command(&config),
        Commands::Sheets => cli::commands::handle_sheets_command(&config),
        Commands::Columns { sheet } => cli::commands::handle_columns_command(&config, &sheet),
    }
}

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
