//! Category aggregate model.

use serde::{Deserialize, Serialize};

/// An aggregate bucket tracking how many records share a category label.
///
/// `title` is the primary key, unique case-insensitively. An entry only
/// exists while its count is non-zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Canonical display name (title-cased).
    pub title: String,

    /// Display icon name.
    pub icon: String,

    /// Display color name.
    pub color: String,

    /// Number of records currently assigned to this category.
    pub count: u64,
}

impl CategoryEntry {
    /// Create a new entry with the given style and a count of one.
    pub fn first(title: impl Into<String>, style: CategoryStyle) -> Self {
        Self {
            title: title.into(),
            icon: style.icon,
            color: style.color,
            count: 1,
        }
    }

    /// Case-insensitive title match.
    pub fn matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }
}

/// Display metadata for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub icon: String,
    pub color: String,
}

impl CategoryStyle {
    pub fn new(icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            color: color.into(),
        }
    }
}

impl Default for CategoryStyle {
    /// Style applied to categories without a well-known entry.
    fn default() -> Self {
        Self::new("text", "gray")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_is_case_insensitive() {
        let entry = CategoryEntry::first("Groceries", CategoryStyle::default());
        assert!(entry.matches("groceries"));
        assert!(entry.matches("GROCERIES"));
        assert!(!entry.matches("Fuel"));
    }
}
