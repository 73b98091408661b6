//! Import configuration
//!
//! Every lookup table the importer uses (sheet categories, field synonyms,
//! attribute translations, ignored columns, placeholder values) lives here.
//! Defaults reproduce the catalog export this tool was written for; an optional
//! `catalog-import.toml` can replace any of them. Tables set in the file replace
//! the default table as a whole, they are not merged.

mod defaults;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::import::CanonicalField;

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "catalog-import.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Spreadsheet to read
    pub input: PathBuf,
    /// JSON file to write
    pub output: PathBuf,
    /// Sheets that never hold products (help tabs, hidden lookup tabs)
    pub excluded_sheets: Vec<String>,
    pub header: HeaderConfig,
    pub categories: CategoryConfig,
    pub fields: FieldSynonyms,
    pub extraction: ExtractionConfig,
}

/// How the header row of a sheet is located
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    pub mode: HeaderMode,
    /// Number of leading rows inspected in scan mode
    pub scan_rows: usize,
    /// Header row used in fixed mode
    pub fixed_row: usize,
    /// Cell values that mark a row as the header (case and accent insensitive)
    pub tokens: Vec<String>,
    /// What to do when no header row is found
    pub on_miss: HeaderMiss,
    /// Per-sheet fixed header rows, taking precedence over `mode`
    pub overrides: HashMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    #[default]
    Scan,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMiss {
    /// Treat row 0 as the header
    #[default]
    FirstRow,
    /// Leave the sheet out of the output
    Skip,
}

/// Sheet name to category slug resolution
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    /// Exact sheet name -> slug
    pub sheets: HashMap<String, String>,
    /// Substring rules, checked in order against the lowercased sheet name
    pub rules: Vec<CategoryRule>,
    /// Slug used when nothing else matches
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    pub contains: String,
    pub slug: String,
}

/// Accepted column names per canonical field, in priority order
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSynonyms {
    pub identifier: Vec<String>,
    pub title: Vec<String>,
    pub sku: Vec<String>,
    pub brand: Vec<String>,
    pub model: Vec<String>,
    pub price: Vec<String>,
    pub stock: Vec<String>,
    pub image: Vec<String>,
}

/// Rules for turning a data row into a product record
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Maximum attribute lines in a description
    pub max_attributes: usize,
    pub default_brand: String,
    /// Prefix of synthesized SKUs
    pub sku_prefix: String,
    /// Suffix that marks a unit column (`WEIGHT` -> `WEIGHT_UNIT`)
    pub unit_suffix: String,
    /// Extra unit column names tried after `{COLUMN}{unit_suffix}`
    pub unit_substitutions: Vec<UnitSubstitution>,
    /// Column key -> display label
    pub translations: HashMap<String, String>,
    /// Columns never rendered as attributes
    pub ignored_columns: Vec<String>,
    /// Cell values treated as empty
    pub placeholder_values: Vec<String>,
    /// Title values that mark a leaked header or instruction row
    pub title_artifacts: Vec<String>,
    /// Identifier values that mark a leaked header row
    pub identifier_artifacts: Vec<String>,
    /// Brand values that fall back to `default_brand`
    pub brand_artifacts: Vec<String>,
    /// Model values that are left out of the description
    pub model_artifacts: Vec<String>,
}

/// Replace `from` with `to` in a column name to find its unit column
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitSubstitution {
    pub from: String,
    pub to: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(defaults::INPUT_PATH),
            output: PathBuf::from(defaults::OUTPUT_PATH),
            excluded_sheets: defaults::strings(defaults::EXCLUDED_SHEETS),
            header: HeaderConfig::default(),
            categories: CategoryConfig::default(),
            fields: FieldSynonyms::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            mode: HeaderMode::Scan,
            scan_rows: 20,
            fixed_row: 0,
            tokens: defaults::strings(defaults::HEADER_TOKENS),
            on_miss: HeaderMiss::FirstRow,
            overrides: HashMap::new(),
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            sheets: defaults::pairs(defaults::SHEET_CATEGORIES),
            rules: defaults::CATEGORY_RULES
                .iter()
                .map(|(contains, slug)| CategoryRule {
                    contains: contains.to_string(),
                    slug: slug.to_string(),
                })
                .collect(),
            fallback: defaults::FALLBACK_CATEGORY.to_string(),
        }
    }
}

impl Default for FieldSynonyms {
    fn default() -> Self {
        Self {
            identifier: defaults::strings(&["ID", "ITEM_ID"]),
            title: defaults::strings(&["TÍTULO", "TITLE", "PRODUCT_NAME", "NAME"]),
            sku: defaults::strings(&["SKU", "SELLER_SKU", "PRODUCT_NUMBER"]),
            brand: defaults::strings(&["BRAND", "MARCA", "MANUFACTURER"]),
            model: defaults::strings(&["MODEL", "MODELO"]),
            price: defaults::strings(&["PRECIO", "PRICE"]),
            stock: defaults::strings(&["CANTIDAD", "AVAILABLE_QUANTITY", "STOCK"]),
            image: defaults::strings(&["IMÁGENES", "PICTURE_URL", "IMAGES", "COVER_IMAGE"]),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_attributes: 15,
            default_brand: "Genérico".to_string(),
            sku_prefix: "GEN".to_string(),
            unit_suffix: "_UNIT".to_string(),
            unit_substitutions: vec![
                UnitSubstitution {
                    from: "WEIGHT".to_string(),
                    to: "WEIGHT_UNIT".to_string(),
                },
                UnitSubstitution {
                    from: "LENGTH".to_string(),
                    to: "LENGTH_UNIT".to_string(),
                },
            ],
            translations: defaults::pairs(defaults::TRANSLATIONS),
            ignored_columns: defaults::strings(defaults::IGNORED_COLUMNS),
            placeholder_values: defaults::strings(defaults::PLACEHOLDER_VALUES),
            title_artifacts: defaults::strings(defaults::TITLE_ARTIFACTS),
            identifier_artifacts: defaults::strings(&["ID", "ITEM_ID"]),
            brand_artifacts: defaults::strings(&["BRAND", "MARCA"]),
            model_artifacts: defaults::strings(&["MODEL", "MODELO"]),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `catalog-import.toml` in the
    /// working directory is used when present, built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file does not exist: {}", path.display());
                }
                Self::from_file(path)?
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    log::debug!("No {} found, using built-in tables", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Command-line paths win over the config file
    pub fn apply_overrides(&mut self, input: Option<PathBuf>, output: Option<PathBuf>) {
        if let Some(input) = input {
            self.input = input;
        }
        if let Some(output) = output {
            self.output = output;
        }
    }

    /// Presence checks that keep category resolution total and extraction well-defined
    pub fn validate(&self) -> Result<()> {
        if self.categories.fallback.trim().is_empty() {
            bail!("categories.fallback must not be empty");
        }
        for (sheet, slug) in &self.categories.sheets {
            if slug.trim().is_empty() {
                bail!("categories.sheets: empty slug for sheet '{}'", sheet);
            }
        }
        for (i, rule) in self.categories.rules.iter().enumerate() {
            if rule.contains.trim().is_empty() || rule.slug.trim().is_empty() {
                bail!("categories.rules[{}]: 'contains' and 'slug' must not be empty", i);
            }
        }
        if self.fields.title.is_empty() {
            bail!("fields.title must list at least one column name");
        }
        if self.header.mode == HeaderMode::Scan {
            if self.header.scan_rows == 0 {
                bail!("header.scan_rows must be greater than zero");
            }
            if self.header.tokens.is_empty() {
                bail!("header.tokens must not be empty in scan mode");
            }
        }
        if self.extraction.unit_suffix.trim().is_empty() {
            bail!("extraction.unit_suffix must not be empty");
        }
        Ok(())
    }
}

impl FieldSynonyms {
    /// Synonyms for one canonical field
    pub fn for_field(&self, field: CanonicalField) -> &[String] {
        match field {
            CanonicalField::Identifier => &self.identifier,
            CanonicalField::Title => &self.title,
            CanonicalField::Sku => &self.sku,
            CanonicalField::Brand => &self.brand,
            CanonicalField::Model => &self.model,
            CanonicalField::Price => &self.price,
            CanonicalField::Stock => &self.stock,
            CanonicalField::Image => &self.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.excluded_sheets, vec!["Ayuda", "hidden"]);
        assert_eq!(config.extraction.max_attributes, 15);
        assert_eq!(
            config.categories.sheets.get("Senuelos de pesca").map(String::as_str),
            Some("senuelos")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            output = "out/products.json"

            [header]
            mode = "fixed"
            fixed_row = 10

            [header.overrides]
            "Linternas" = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.output, PathBuf::from("out/products.json"));
        assert_eq!(config.input, PathBuf::from(defaults::INPUT_PATH));
        assert_eq!(config.header.mode, HeaderMode::Fixed);
        assert_eq!(config.header.fixed_row, 10);
        assert_eq!(config.header.overrides.get("Linternas"), Some(&2));
        assert_eq!(config.header.on_miss, HeaderMiss::FirstRow);
        assert_eq!(config.fields.title[0], "TÍTULO");
    }

    #[test]
    fn test_table_in_file_replaces_default() {
        let config = Config::from_toml(
            r#"
            [categories]
            fallback = "misc"

            [categories.sheets]
            "Tents" = "tents"

            [[categories.rules]]
            contains = "tent"
            slug = "tents"
            "#,
        )
        .unwrap();

        assert_eq!(config.categories.sheets.len(), 1);
        assert_eq!(config.categories.rules.len(), 1);
        assert_eq!(config.categories.fallback, "misc");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::from_toml("inptu = \"typo.xlsx\"").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_fallback() {
        let mut config = Config::default();
        config.categories.fallback = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_rule() {
        let mut config = Config::default();
        config.categories.rules.push(CategoryRule {
            contains: String::new(),
            slug: "x".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some(PathBuf::from("in.xlsx")), None);
        assert_eq!(config.input, PathBuf::from("in.xlsx"));
        assert_eq!(config.output, PathBuf::from(defaults::OUTPUT_PATH));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/catalog.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
