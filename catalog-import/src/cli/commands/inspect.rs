//! Inspection commands: look at a workbook without writing anything

use std::collections::HashMap;

use anyhow::{Result, bail};
use colored::*;

use crate::config::Config;
use crate::import::{CanonicalField, Pipeline, RowExtractor, SheetLayout, Workbook};

/// List every sheet with its header row and category
pub fn handle_sheets_command(config: &Config) -> Result<()> {
    let pipeline = Pipeline::new(config);
    let mut workbook = Workbook::open(&config.input)?;

    println!(
        "{} ({} sheets)",
        workbook.path().display().to_string().cyan(),
        workbook.sheet_names().len()
    );

    for name in workbook.sheet_names().to_vec() {
        if pipeline.is_excluded(&name) {
            println!("  {} {}", name.dimmed(), "[excluded]".dimmed());
            continue;
        }

        let sheet = match workbook.read_sheet(&name) {
            Ok(sheet) => sheet,
            Err(e) => {
                println!("  {} {}", name.red(), format!("unreadable: {:#}", e).red());
                continue;
            }
        };

        match pipeline.layout(&sheet) {
            Ok(layout) => println!(
                "  {}  header row {}, {} data rows -> {}",
                name.bold(),
                layout.header_row,
                sheet.row_count().saturating_sub(layout.header_row + 1),
                layout.category.green()
            ),
            Err(e) => println!("  {}  {}", name.yellow(), format!("{:#}", e).yellow()),
        }
    }

    let known: Vec<&str> = pipeline.categories().known_slugs().into_iter().collect();
    println!();
    println!("  known categories: {}", known.join(", ").dimmed());

    Ok(())
}

/// Show the role of every column in one sheet
pub fn handle_columns_command(config: &Config, sheet_name: &str) -> Result<()> {
    let pipeline = Pipeline::new(config);
    let mut workbook = Workbook::open(&config.input)?;

    if !workbook.sheet_names().iter().any(|s| s == sheet_name) {
        bail!(
            "Sheet not found: '{}' (available: {})",
            sheet_name,
            workbook.sheet_names().join(", ")
        );
    }

    let sheet = workbook.read_sheet(sheet_name)?;
    let layout = pipeline.layout(&sheet)?;
    let extractor = RowExtractor::new(
        pipeline.rules(),
        &layout.columns,
        &layout.map,
        &sheet.name,
        &layout.category,
    )?;

    println!("{}", sheet.name.bold());
    if pipeline.is_excluded(&sheet.name) {
        println!("  {}", "excluded from import".yellow());
    }
    println!("  header row: {}", layout.header_row);
    println!("  category:   {}", layout.category.green());
    println!("  attribute lines per record: {}", pipeline.rules().max_attributes());
    println!();

    let roles = column_roles(&layout, &extractor);
    for (idx, name) in layout.columns.names().iter().enumerate() {
        let display_name = if name.is_empty() { "(blank)" } else { name.as_str() };
        println!("  {:>3}  {:<32} {}", idx, display_name, roles[idx]);
    }

    let missing: Vec<String> = CanonicalField::ALL
        .iter()
        .filter(|f| layout.map.get(**f).is_none())
        .map(|f| f.to_string())
        .collect();
    if !missing.is_empty() {
        println!();
        println!("  unmapped fields: {}", missing.join(", ").dimmed());
    }

    Ok(())
}

fn column_roles(layout: &SheetLayout, extractor: &RowExtractor<'_>) -> Vec<ColoredString> {
    let attributes: HashMap<usize, &str> = extractor
        .attribute_columns()
        .iter()
        .map(|a| (a.index, a.label.as_str()))
        .collect();

    let mut unit_owner: HashMap<usize, usize> = HashMap::new();
    for attribute in extractor.attribute_columns() {
        for unit in &attribute.units {
            unit_owner.entry(*unit).or_insert(attribute.index);
        }
    }

    (0..layout.columns.len())
        .map(|idx| {
            let name = layout.columns.name(idx);
            if name.is_empty() {
                return "skipped".dimmed();
            }
            if let Some(field) = CanonicalField::ALL
                .iter()
                .find(|f| layout.map.get(**f) == Some(idx))
            {
                return format!("field: {}", field).green();
            }
            if let Some(owner) = unit_owner.get(&idx) {
                return format!("unit of {}", layout.columns.name(*owner)).cyan();
            }
            if let Some(label) = attributes.get(&idx) {
                return format!("attribute \"{}\"", label).normal();
            }
            "ignored".dimmed()
        })
        .collect()
}
