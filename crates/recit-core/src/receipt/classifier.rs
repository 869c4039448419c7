//! Keyword-based category classifier.
//!
//! Rules are evaluated in table order and the first rule with a matching
//! keyword wins, so rule order is part of the contract, not an
//! implementation detail.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::CategoryStyle;

/// Label returned when no rule matches.
pub const DEFAULT_CATEGORY: &str = "Default";

/// One classification rule: a label and the keywords that select it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category label assigned on a match.
    pub label: String,

    /// Case-insensitive substrings that select this rule.
    pub keywords: Vec<String>,

    /// Display style applied when the ledger creates the entry.
    #[serde(default)]
    pub style: Option<CategoryStyle>,
}

impl CategoryRule {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            style: None,
        }
    }

    pub fn with_style(mut self, icon: &str, color: &str) -> Self {
        self.style = Some(CategoryStyle::new(icon, color));
        self
    }

    fn matches(&self, text_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| text_lower.contains(&k.to_lowercase()))
    }
}

/// Classifier over an ordered rule table.
///
/// Pure: identical input and table always produce the same label.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
}

impl CategoryClassifier {
    /// Build a classifier from an explicit rule table.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The canonical rule table for receipts.
    pub fn default_rules() -> Vec<CategoryRule> {
        vec![
            CategoryRule::new(
                "Groceries",
                &[
                    "countdown",
                    "pak n save",
                    "pak'n save",
                    "new world",
                    "four square",
                    "fresh choice",
                    "supervalue",
                    "grocer",
                ],
            )
            .with_style("cart", "green"),
            CategoryRule::new(
                "Fuel",
                &["caltex", "mobil", "gull", "z energy", "petrol", "fuel", "diesel"],
            )
            .with_style("flame", "orange"),
            CategoryRule::new(
                "Food",
                &[
                    "cafe",
                    "restaurant",
                    "bakery",
                    "mcdonald",
                    "burger",
                    "pizza",
                    "kfc",
                    "subway",
                    "sushi",
                    "takeaway",
                ],
            )
            .with_style("fork", "red"),
            CategoryRule::new(
                "Pharmacy",
                &["pharmacy", "chemist", "unichem", "prescription"],
            )
            .with_style("cross", "teal"),
            CategoryRule::new("Hardware", &["bunnings", "mitre 10", "placemakers"])
                .with_style("hammer", "brown"),
            CategoryRule::new(
                "Retail",
                &["store", "warehouse", "kmart", "farmers", "cotton on", "outlet", "shop"],
            )
            .with_style("bag", "purple"),
            CategoryRule::new(
                "Utilities",
                &["power", "electricity", "broadband", "vodafone", "spark", "water"],
            )
            .with_style("bolt", "yellow"),
        ]
    }

    /// Classify `text`, returning the label of the first matching rule or
    /// [`DEFAULT_CATEGORY`] when nothing matches.
    pub fn classify(&self, text: &str) -> String {
        let text_lower = text.to_lowercase();

        for rule in &self.rules {
            if rule.matches(&text_lower) {
                debug!(label = %rule.label, "classified receipt text");
                return rule.label.clone();
            }
        }

        debug!("no rule matched, using default category");
        DEFAULT_CATEGORY.to_string()
    }

    /// Display style for a label: the rule's style when defined, the
    /// `"folder"` style for the default bucket, a neutral fallback otherwise.
    pub fn style_for(&self, label: &str) -> CategoryStyle {
        if label == DEFAULT_CATEGORY {
            return CategoryStyle::new("folder", "gray");
        }

        self.rules
            .iter()
            .find(|r| r.label.eq_ignore_ascii_case(label))
            .and_then(|r| r.style.clone())
            .unwrap_or_default()
    }

    /// The rule table, in evaluation order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}
