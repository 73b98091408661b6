//! Sheet name to category slug mapping

use std::collections::{BTreeSet, HashMap};

use crate::config::{CategoryConfig, CategoryRule};

/// Resolves the target category of a sheet
///
/// Resolution is total: exact table match, then the first substring rule that
/// matches the lowercased name, then the fallback slug.
#[derive(Debug, Clone)]
pub struct CategoryMapper {
    sheets: HashMap<String, String>,
    rules: Vec<CategoryRule>,
    fallback: String,
}

impl CategoryMapper {
    pub fn new(config: &CategoryConfig) -> Self {
        Self {
            sheets: config.sheets.clone(),
            rules: config
                .rules
                .iter()
                .map(|r| CategoryRule {
                    contains: r.contains.to_lowercase(),
                    slug: r.slug.clone(),
                })
                .collect(),
            fallback: config.fallback.clone(),
        }
    }

    pub fn category_for(&self, sheet_name: &str) -> &str {
        if let Some(slug) = self.sheets.get(sheet_name) {
            return slug;
        }

        let lower = sheet_name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lower.contains(&rule.contains))
            .map(|rule| rule.slug.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// Every slug this mapper can return
    pub fn known_slugs(&self) -> BTreeSet<&str> {
        self.sheets
            .values()
            .map(String::as_str)
            .chain(self.rules.iter().map(|r| r.slug.as_str()))
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }
}
