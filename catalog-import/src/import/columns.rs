//! Column normalization and canonical field resolution
//!
//! Column names are uppercased and trimmed. Lookups compare a folded form with
//! accents removed, so `TÍTULO`, `Titulo` and `TITULO` are the same column.

use calamine::Data;
use unicode_normalization::UnicodeNormalization;

use super::cells::cell_to_string;
use crate::config::FieldSynonyms;

/// Uppercase and trim a raw column label
pub fn normalize_column(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Case and accent insensitive comparison key
pub fn fold(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

/// Fields the importer extracts by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Identifier,
    Title,
    Sku,
    Brand,
    Model,
    Price,
    Stock,
    Image,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::Identifier,
        CanonicalField::Title,
        CanonicalField::Sku,
        CanonicalField::Brand,
        CanonicalField::Model,
        CanonicalField::Price,
        CanonicalField::Stock,
        CanonicalField::Image,
    ];
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanonicalField::Identifier => write!(f, "identifier"),
            CanonicalField::Title => write!(f, "title"),
            CanonicalField::Sku => write!(f, "sku"),
            CanonicalField::Brand => write!(f, "brand"),
            CanonicalField::Model => write!(f, "model"),
            CanonicalField::Price => write!(f, "price"),
            CanonicalField::Stock => write!(f, "stock"),
            CanonicalField::Image => write!(f, "image"),
        }
    }
}

/// Normalized header of one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    names: Vec<String>,
    folded: Vec<String>,
}

impl Columns {
    pub fn from_header(row: &[Data]) -> Self {
        Self::from_names(row.iter().map(cell_to_string))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| normalize_column(n.as_ref()))
            .collect();
        let folded = names.iter().map(|n| fold(n)).collect();
        Self { names, folded }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Normalized name at `idx` (empty for blank header cells)
    pub fn name(&self, idx: usize) -> &str {
        self.names.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of the first column with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        let key = fold(name);
        if key.is_empty() {
            return None;
        }
        self.folded.iter().position(|f| *f == key)
    }

    /// First synonym present in the sheet, in list order
    pub fn resolve(&self, synonyms: &[String]) -> Option<usize> {
        synonyms.iter().find_map(|s| self.position(s))
    }
}

/// Column index of each canonical field, `None` when the sheet lacks it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub identifier: Option<usize>,
    pub title: Option<usize>,
    pub sku: Option<usize>,
    pub brand: Option<usize>,
    pub model: Option<usize>,
    pub price: Option<usize>,
    pub stock: Option<usize>,
    pub image: Option<usize>,
}

impl ColumnMap {
    pub fn resolve(columns: &Columns, synonyms: &FieldSynonyms) -> Self {
        let mut map = Self::default();
        for field in CanonicalField::ALL {
            *map.slot(field) = columns.resolve(synonyms.for_field(field));
        }
        map
    }

    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        match field {
            CanonicalField::Identifier => self.identifier,
            CanonicalField::Title => self.title,
            CanonicalField::Sku => self.sku,
            CanonicalField::Brand => self.brand,
            CanonicalField::Model => self.model,
            CanonicalField::Price => self.price,
            CanonicalField::Stock => self.stock,
            CanonicalField::Image => self.image,
        }
    }

    fn slot(&mut self, field: CanonicalField) -> &mut Option<usize> {
        match field {
            CanonicalField::Identifier => &mut self.identifier,
            CanonicalField::Title => &mut self.title,
            CanonicalField::Sku => &mut self.sku,
            CanonicalField::Brand => &mut self.brand,
            CanonicalField::Model => &mut self.model,
            CanonicalField::Price => &mut self.price,
            CanonicalField::Stock => &mut self.stock,
            CanonicalField::Image => &mut self.image,
        }
    }

    /// Whether a column was claimed by any canonical field
    pub fn is_mapped(&self, idx: usize) -> bool {
        CanonicalField::ALL
            .iter()
            .any(|f| self.get(*f) == Some(idx))
    }
}
