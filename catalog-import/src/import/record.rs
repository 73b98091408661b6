//! Output records

use serde::Serialize;

/// One product, as handed to the catalog seeder
///
/// Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: String,
    pub category_slug: String,
    pub brand_name: String,
    pub sku: String,
    /// HTML fragment: bold title, optional model line, attribute list
    pub description: String,
    pub sheet_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Attribute lines rendered into `description`
    #[serde(skip)]
    pub attributes: Vec<AttributeEntry>,
}

/// A technical attribute taken from a value column and its unit column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEntry {
    pub label: String,
    pub value: String,
    pub unit: Option<String>,
}

impl AttributeEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>, unit: Option<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit,
        }
    }
}

impl std::fmt::Display for AttributeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.unit {
            Some(unit) => format!("{} {}", self.value, unit),
            None => self.value.clone(),
        };
        write!(f, "{}: {}", self.label, value.trim())
    }
}
