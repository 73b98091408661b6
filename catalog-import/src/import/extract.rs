//! Turn data rows into product records
//!
//! Column roles are worked out once per sheet (`RowExtractor::new`); each row
//! then yields a record or the reason it was skipped.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use calamine::Data;
use once_cell::sync::Lazy;
use regex::Regex;

use super::cells::{cell_at, cell_to_f64, cell_to_i64};
use super::columns::{ColumnMap, Columns, fold, normalize_column};
use super::record::{AttributeEntry, ProductRecord};
use crate::config::ExtractionConfig;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Extraction tables with comparison keys precomputed
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    max_attributes: usize,
    default_brand: String,
    sku_prefix: String,
    unit_suffix: String,
    unit_substitutions: Vec<(String, String)>,
    translations: HashMap<String, String>,
    ignored_columns: HashSet<String>,
    placeholder_values: HashSet<String>,
    title_artifacts: HashSet<String>,
    identifier_artifacts: HashSet<String>,
    brand_artifacts: HashSet<String>,
    model_artifacts: HashSet<String>,
}

fn folded_set(items: &[String]) -> HashSet<String> {
    items.iter().map(|s| fold(s)).filter(|s| !s.is_empty()).collect()
}

impl ExtractionRules {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            max_attributes: config.max_attributes,
            default_brand: config.default_brand.clone(),
            sku_prefix: config.sku_prefix.clone(),
            unit_suffix: normalize_column(&config.unit_suffix),
            unit_substitutions: config
                .unit_substitutions
                .iter()
                .map(|s| (normalize_column(&s.from), normalize_column(&s.to)))
                .filter(|(from, _)| !from.is_empty())
                .collect(),
            translations: config
                .translations
                .iter()
                .map(|(k, v)| (fold(k), v.clone()))
                .collect(),
            ignored_columns: folded_set(&config.ignored_columns),
            placeholder_values: folded_set(&config.placeholder_values),
            title_artifacts: folded_set(&config.title_artifacts),
            identifier_artifacts: folded_set(&config.identifier_artifacts),
            brand_artifacts: folded_set(&config.brand_artifacts),
            model_artifacts: folded_set(&config.model_artifacts),
        }
    }

    pub fn max_attributes(&self) -> usize {
        self.max_attributes
    }

    pub fn is_placeholder(&self, value: &str) -> bool {
        self.placeholder_values.contains(&fold(value))
    }

    pub fn is_ignored_column(&self, name: &str) -> bool {
        self.ignored_columns.contains(&fold(name))
    }

    /// Unit columns are read together with their value column
    pub fn is_unit_column(&self, name: &str) -> bool {
        fold(name).ends_with(&fold(&self.unit_suffix))
    }

    /// Candidate unit column names for a value column, in lookup order
    pub fn unit_candidates(&self, name: &str) -> Vec<String> {
        let name = normalize_column(name);
        let mut candidates = vec![format!("{}{}", name, self.unit_suffix)];
        for (from, to) in &self.unit_substitutions {
            if name.contains(from.as_str()) {
                let candidate = name.replace(from.as_str(), to);
                if candidate != name && !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    /// Display label: translation table first, then `LINE_CAPACITY` -> `Line Capacity`
    pub fn label_for(&self, name: &str) -> String {
        self.translations
            .get(&fold(name))
            .cloned()
            .unwrap_or_else(|| title_case_key(name))
    }
}

/// `LINE_CAPACITY` -> `Line Capacity`
pub fn title_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for c in key.trim().chars() {
        if c == '_' {
            out.push(' ');
            prev_alpha = false;
        } else if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Lowercase ASCII slug: `Señuelo X-15` -> `senuelo-x-15`
pub fn slugify(text: &str) -> String {
    let lowered = fold(text).to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Deterministic SKU for rows without one: `GEN-{title slug[..10]}-{identifier}`
pub fn synthesize_sku(prefix: &str, title: &str, identifier: &str) -> String {
    let fragment: String = slugify(title).chars().take(10).collect();
    let fragment = match fragment.trim_end_matches('-') {
        "" => "item",
        f => f,
    };
    let identifier = if identifier.is_empty() { "000" } else { identifier };
    format!("{}-{}-{}", prefix, fragment, identifier)
}

/// Assemble the HTML description
pub fn build_description(title: &str, model: Option<&str>, attributes: &[AttributeEntry]) -> String {
    let mut description = format!("<b>{}</b><br>", title);
    if let Some(model) = model {
        description.push_str(&format!("Modelo: {}<br>", model));
    }
    if !attributes.is_empty() {
        description.push_str("<ul>");
        for attribute in attributes {
            description.push_str(&format!("<li>{}</li>", attribute));
        }
        description.push_str("</ul>");
    }
    description
}

/// Why a row produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSkip {
    BlankTitle,
    /// Title holds a header or instruction token
    HeaderArtifact(String),
    /// Identifier column holds a header token
    IdentifierHeader(String),
}

impl std::fmt::Display for RowSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSkip::BlankTitle => write!(f, "blank title"),
            RowSkip::HeaderArtifact(v) => write!(f, "header artifact in title: {}", v),
            RowSkip::IdentifierHeader(v) => write!(f, "header token in identifier: {}", v),
        }
    }
}

/// A column rendered as an attribute line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeColumn {
    pub index: usize,
    pub label: String,
    /// Unit column candidates present in the sheet, in lookup order
    pub units: Vec<usize>,
}

/// Per-sheet row extractor
pub struct RowExtractor<'a> {
    rules: &'a ExtractionRules,
    map: &'a ColumnMap,
    title_col: usize,
    sheet_name: &'a str,
    category: &'a str,
    attribute_columns: Vec<AttributeColumn>,
}

impl<'a> RowExtractor<'a> {
    /// Fails when the sheet has no title column
    pub fn new(
        rules: &'a ExtractionRules,
        columns: &Columns,
        map: &'a ColumnMap,
        sheet_name: &'a str,
        category: &'a str,
    ) -> Result<Self> {
        let title_col = map.title.context("No title column found")?;

        let mut attribute_columns = Vec::new();
        for index in 0..columns.len() {
            let name = columns.name(index);
            if name.is_empty()
                || map.is_mapped(index)
                || rules.is_ignored_column(name)
                || rules.is_unit_column(name)
            {
                continue;
            }

            let mut units = Vec::new();
            for candidate in rules.unit_candidates(name) {
                if let Some(unit_idx) = columns.position(&candidate) {
                    if unit_idx != index && !units.contains(&unit_idx) {
                        units.push(unit_idx);
                    }
                }
            }

            attribute_columns.push(AttributeColumn {
                index,
                label: rules.label_for(name),
                units,
            });
        }

        Ok(Self {
            rules,
            map,
            title_col,
            sheet_name,
            category,
            attribute_columns,
        })
    }

    pub fn attribute_columns(&self) -> &[AttributeColumn] {
        &self.attribute_columns
    }

    /// Build the record for one data row
    pub fn extract(&self, row: &[Data]) -> std::result::Result<ProductRecord, RowSkip> {
        let title = cell_at(row, self.title_col);
        if title.is_empty() {
            return Err(RowSkip::BlankTitle);
        }
        if self.rules.title_artifacts.contains(&fold(&title)) {
            return Err(RowSkip::HeaderArtifact(title));
        }

        let identifier = self.text(row, self.map.identifier);
        if self.rules.identifier_artifacts.contains(&fold(&identifier)) {
            return Err(RowSkip::IdentifierHeader(identifier));
        }

        let sku = match self.text(row, self.map.sku) {
            s if !s.is_empty() => s,
            _ => synthesize_sku(&self.rules.sku_prefix, &title, &identifier),
        };

        let brand = self.text(row, self.map.brand);
        let brand_name = if brand.is_empty() || self.rules.brand_artifacts.contains(&fold(&brand)) {
            self.rules.default_brand.clone()
        } else {
            brand
        };

        let model = self.text(row, self.map.model);
        let model = (!model.is_empty()
            && !self.rules.model_artifacts.contains(&fold(&model))
            && !self.rules.is_placeholder(&model))
        .then_some(model);

        let attributes = self.collect_attributes(row);
        let description = build_description(&title, model.as_deref(), &attributes);

        Ok(ProductRecord {
            name: title,
            category_slug: self.category.to_string(),
            brand_name,
            sku,
            description,
            sheet_source: self.sheet_name.to_string(),
            price: self.cell(row, self.map.price).and_then(cell_to_f64),
            stock: self.cell(row, self.map.stock).and_then(cell_to_i64),
            image_url: self.image_url(row),
            attributes,
        })
    }

    fn cell<'r>(&self, row: &'r [Data], col: Option<usize>) -> Option<&'r Data> {
        col.and_then(|idx| row.get(idx))
    }

    fn text(&self, row: &[Data], col: Option<usize>) -> String {
        col.map(|idx| cell_at(row, idx)).unwrap_or_default()
    }

    fn image_url(&self, row: &[Data]) -> Option<String> {
        let images = self.text(row, self.map.image);
        images
            .split(',')
            .map(str::trim)
            .find(|s| !s.is_empty() && !self.rules.is_placeholder(s))
            .map(str::to_string)
    }

    /// Value columns with their paired units, capped
    ///
    /// A column consumed as another attribute's unit is never emitted itself,
    /// regardless of column order.
    fn collect_attributes(&self, row: &[Data]) -> Vec<AttributeEntry> {
        let mut consumed = HashSet::new();
        let mut pending = Vec::new();

        for column in &self.attribute_columns {
            let value = cell_at(row, column.index);
            if value.is_empty() || self.rules.is_placeholder(&value) {
                continue;
            }

            let unit = column.units.iter().find_map(|&idx| {
                let unit = cell_at(row, idx);
                (!unit.is_empty() && !self.rules.is_placeholder(&unit)).then_some((idx, unit))
            });

            let unit = unit.map(|(idx, unit)| {
                consumed.insert(idx);
                unit
            });

            pending.push((column, value, unit));
        }

        pending
            .into_iter()
            .filter(|(column, ..)| !consumed.contains(&column.index))
            .take(self.rules.max_attributes)
            .map(|(column, value, unit)| AttributeEntry::new(column.label.clone(), value, unit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldSynonyms;

    fn s(v: &str) -> Data {
        if v.is_empty() {
            Data::Empty
        } else {
            Data::String(v.to_string())
        }
    }

    fn row(cells: &[&str]) -> Vec<Data> {
        cells.iter().map(|c| s(c)).collect()
    }

    struct Fixture {
        rules: ExtractionRules,
        columns: Columns,
        map: ColumnMap,
    }

    impl Fixture {
        fn new(header: &[&str]) -> Self {
            Self::with_config(header, &ExtractionConfig::default())
        }

        fn with_config(header: &[&str], config: &ExtractionConfig) -> Self {
            let columns = Columns::from_names(header.iter().copied());
            let map = ColumnMap::resolve(&columns, &FieldSynonyms::default());
            Self {
                rules: ExtractionRules::new(config),
                columns,
                map,
            }
        }

        fn extractor(&self) -> RowExtractor<'_> {
            RowExtractor::new(
                &self.rules,
                &self.columns,
                &self.map,
                "Senuelos de pesca",
                "senuelos",
            )
            .unwrap()
        }
    }

    #[test]
    fn test_lure_sheet_row() {
        let fx = Fixture::new(&["ID", "SKU", "TÍTULO", "MODEL", "WEIGHT", "WEIGHT_UNIT"]);
        let record = fx
            .extractor()
            .extract(&row(&["MLC1", "SKU123", "Señuelo X", "ModeloY", "50", "g"]))
            .unwrap();

        assert_eq!(record.name, "Señuelo X");
        assert_eq!(record.category_slug, "senuelos");
        assert_eq!(record.sku, "SKU123");
        assert_eq!(record.brand_name, "Genérico");
        assert_eq!(record.sheet_source, "Senuelos de pesca");
        assert!(record.description.contains("Modelo: ModeloY"));
        assert!(record.description.contains("Peso: 50 g"));
        assert_eq!(
            record.description,
            "<b>Señuelo X</b><br>Modelo: ModeloY<br><ul><li>Peso: 50 g</li></ul>"
        );
        assert_eq!(record.attributes.len(), 1);
    }

    #[test]
    fn test_numeric_weight_renders_without_fraction() {
        let fx = Fixture::new(&["TÍTULO", "WEIGHT", "WEIGHT_UNIT"]);
        let cells = vec![s("Señuelo X"), Data::Float(50.0), s("g")];
        let record = fx.extractor().extract(&cells).unwrap();
        assert_eq!(record.attributes[0].to_string(), "Peso: 50 g");
    }

    #[test]
    fn test_header_fragment_rows_are_skipped() {
        let fx = Fixture::new(&["ID", "SKU", "TÍTULO"]);
        let extractor = fx.extractor();

        assert_eq!(
            extractor.extract(&row(&["MLC1", "SKU", "TÍTULO"])),
            Err(RowSkip::HeaderArtifact("TÍTULO".into()))
        );
        assert_eq!(
            extractor.extract(&row(&["", "", "Fixed"])),
            Err(RowSkip::HeaderArtifact("Fixed".into()))
        );
        assert_eq!(
            extractor.extract(&row(&["ITEM_ID", "", "Un producto"])),
            Err(RowSkip::IdentifierHeader("ITEM_ID".into()))
        );
    }

    #[test]
    fn test_blank_title_is_skipped() {
        let fx = Fixture::new(&["ID", "SKU", "TÍTULO"]);
        let extractor = fx.extractor();
        assert_eq!(
            extractor.extract(&row(&["MLC1", "SKU1", "   "])),
            Err(RowSkip::BlankTitle)
        );
        assert_eq!(extractor.extract(&row(&["MLC1"])), Err(RowSkip::BlankTitle));
    }

    #[test]
    fn test_missing_title_column_fails() {
        let fx = Fixture::new(&["ID", "SKU"]);
        let result = RowExtractor::new(&fx.rules, &fx.columns, &fx.map, "Linternas", "iluminacion");
        assert!(result.is_err());
    }

    #[test]
    fn test_value_without_unit_column() {
        let fx = Fixture::new(&["TITLE", "COLOR", "BATTERY_TYPE"]);
        let record = fx
            .extractor()
            .extract(&row(&["Linterna", " Rojo ", "AA"]))
            .unwrap();
        let lines: Vec<String> = record.attributes.iter().map(|a| a.to_string()).collect();
        assert_eq!(lines, vec!["Color: Rojo", "Battery Type: AA"]);
    }

    #[test]
    fn test_substituted_unit_column() {
        let fx = Fixture::new(&["TITLE", "MAX_WEIGHT_SUPPORTED", "MAX_WEIGHT_UNIT_SUPPORTED"]);
        let record = fx.extractor().extract(&row(&["Bastón", "120", "kg"])).unwrap();
        let lines: Vec<String> = record.attributes.iter().map(|a| a.to_string()).collect();
        assert_eq!(lines, vec!["Peso Máximo Soportado: 120 kg"]);
    }

    #[test]
    fn test_consumed_unit_column_is_not_emitted_even_when_first() {
        let fx = Fixture::new(&["TITLE", "MAX_WEIGHT_UNIT_SUPPORTED", "MAX_WEIGHT_SUPPORTED"]);
        let record = fx.extractor().extract(&row(&["Bastón", "kg", "120"])).unwrap();
        assert_eq!(record.attributes.len(), 1);
        assert_eq!(record.attributes[0].unit.as_deref(), Some("kg"));
    }

    #[test]
    fn test_placeholders_filtered_from_values_and_units() {
        let fx = Fixture::new(&["TITLE", "WEIGHT", "WEIGHT_UNIT", "MATERIAL", "SIZE"]);
        let record = fx
            .extractor()
            .extract(&row(&["Caña", "200", "N/A", "mandatory", "No aplica"]))
            .unwrap();
        let lines: Vec<String> = record.attributes.iter().map(|a| a.to_string()).collect();
        assert_eq!(lines, vec!["Peso: 200"]);
    }

    #[test]
    fn test_ignored_and_mapped_columns_are_not_attributes() {
        let fx = Fixture::new(&[
            "FAMILY_ID", "ID", "SKU", "GTIN", "TITLE", "BRAND", "PRICE", "COLOR",
        ]);
        let record = fx
            .extractor()
            .extract(&row(&["F1", "MLC9", "S9", "779", "Carrete", "Shimano", "9990", "Negro"]))
            .unwrap();
        assert_eq!(record.attributes.len(), 1);
        assert_eq!(record.attributes[0].label, "Color");
        assert_eq!(record.brand_name, "Shimano");
        assert_eq!(record.price, Some(9990.0));
    }

    #[test]
    fn test_attribute_cap() {
        let header: Vec<String> = std::iter::once("TITLE".to_string())
            .chain((0..30).map(|i| format!("SPEC_{}", i)))
            .collect();
        let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
        let fx = Fixture::new(&header_refs);

        let mut cells = vec![s("Mochila")];
        cells.extend((0..30).map(|i| Data::Int(i)));
        let record = fx.extractor().extract(&cells).unwrap();

        assert_eq!(record.attributes.len(), 15);
        assert_eq!(record.description.matches("<li>").count(), 15);
    }

    #[test]
    fn test_custom_cap() {
        let config = ExtractionConfig {
            max_attributes: 1,
            ..ExtractionConfig::default()
        };
        let fx = Fixture::with_config(&["TITLE", "COLOR", "SIZE"], &config);
        let record = fx.extractor().extract(&row(&["Remera", "Azul", "L"])).unwrap();
        assert_eq!(record.attributes.len(), 1);
    }

    #[test]
    fn test_synthesized_sku_is_deterministic() {
        let fx = Fixture::new(&["ID", "SKU", "TITLE"]);
        let extractor = fx.extractor();
        let a = extractor.extract(&row(&["MLC42", "", "Señuelo Rapala X-15"])).unwrap();
        let b = extractor.extract(&row(&["MLC42", "", "Señuelo Rapala X-15"])).unwrap();
        assert_eq!(a.sku, "GEN-senuelo-ra-MLC42");
        assert_eq!(a.sku, b.sku);

        let no_id = Fixture::new(&["TITLE"]);
        let record = no_id.extractor().extract(&row(&["¡¡!!"])).unwrap();
        assert_eq!(record.sku, "GEN-item-000");
    }

    #[test]
    fn test_brand_and_model_header_tokens() {
        let fx = Fixture::new(&["TITLE", "BRAND", "MODEL"]);
        let record = fx.extractor().extract(&row(&["Linterna", "Marca", "MODELO"])).unwrap();
        assert_eq!(record.brand_name, "Genérico");
        assert_eq!(record.description, "<b>Linterna</b><br>");
    }

    #[test]
    fn test_stock_and_image() {
        let fx = Fixture::new(&["TITLE", "AVAILABLE_QUANTITY", "PICTURE_URL"]);
        let cells = vec![
            s("Mochila"),
            Data::Float(3.0),
            s(" https://img/1.jpg, https://img/2.jpg"),
        ];
        let record = fx.extractor().extract(&cells).unwrap();
        assert_eq!(record.stock, Some(3));
        assert_eq!(record.image_url.as_deref(), Some("https://img/1.jpg"));
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn test_unit_candidates() {
        let rules = ExtractionRules::new(&ExtractionConfig::default());
        assert_eq!(rules.unit_candidates("WEIGHT"), vec!["WEIGHT_UNIT"]);
        assert_eq!(rules.unit_candidates("COLOR"), vec!["COLOR_UNIT"]);
        assert_eq!(
            rules.unit_candidates("LURE_LENGTH_MAX"),
            vec!["LURE_LENGTH_MAX_UNIT", "LURE_LENGTH_UNIT_MAX"]
        );
    }

    #[test]
    fn test_labels() {
        let rules = ExtractionRules::new(&ExtractionConfig::default());
        assert_eq!(rules.label_for("GEAR_RATIO"), "Relación de transmisión");
        assert_eq!(rules.label_for("LINE_CAPACITY"), "Capacidad de línea");
        assert_eq!(rules.label_for("BLADE_TYPE"), "Blade Type");
        assert_eq!(title_case_key("3D_SIZE"), "3D Size");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Señuelo X"), "senuelo-x");
        assert_eq!(slugify("  Caña 2,10 m!! "), "cana-2-10-m");
        assert_eq!(slugify("---"), "");
    }
}
