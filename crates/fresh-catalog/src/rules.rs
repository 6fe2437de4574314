//! Keyword tables driving classification and allergen matching.
//!
//! The built-in tables are compiled once on first use. A deployment may
//! replace either table with a TOML rule book:
//!
//! ```toml
//! [[categories]]
//! category = "Beverages"
//! keywords = ["juice", "coffee", "tea"]
//!
//! [allergens]
//! nuts = ["almond", "walnut"]
//! ```
//!
//! Sections missing from the file keep their built-in contents.

use crate::error::{CatalogError, Result};
use fresh_core::{CatalogConfig, Category};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

/// Keywords that place a product in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category assigned on a match
    pub category: Category,
    /// Lowercase substrings searched for in product tokens
    pub keywords: Vec<String>,
}

/// Complete set of matching rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBook {
    /// Category rules; earlier rules win ties
    pub categories: Vec<CategoryRule>,
    /// Allergen name to ingredient substrings implying it
    pub allergens: BTreeMap<String, Vec<String>>,
}

impl Default for RuleBook {
    fn default() -> Self {
        BUILTIN_RULES.clone()
    }
}

impl RuleBook {
    /// The built-in tables shared by the free functions of this crate.
    #[must_use]
    pub fn builtin() -> &'static RuleBook {
        &BUILTIN_RULES
    }

    /// Parse, normalize and validate a rule book.
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or the tables are unusable.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut rules: Self = toml::from_str(contents)?;
        rules.normalize();
        rules.validate()?;
        Ok(rules)
    }

    /// Read a rule book from disk.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not a valid rule book.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let rules = Self::from_toml_str(&contents)?;
        info!(
            path = %path.display(),
            categories = rules.categories.len(),
            allergens = rules.allergens.len(),
            "loaded rule book"
        );
        Ok(rules)
    }

    /// Rule book named by the catalog configuration, or the built-in one.
    ///
    /// # Errors
    /// Returns error if a configured rule book cannot be loaded.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        match &config.rules_path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Synonyms for an allergen name, if the table knows it.
    #[must_use]
    pub fn synonyms(&self, allergen: &str) -> &[String] {
        self.allergens
            .get(allergen)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn normalize(&mut self) {
        for rule in &mut self.categories {
            rule.keywords = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .collect();
        }
        self.allergens = std::mem::take(&mut self.allergens)
            .into_iter()
            .map(|(name, synonyms)| {
                let synonyms = synonyms.iter().map(|s| s.trim().to_lowercase()).collect();
                (name.trim().to_lowercase(), synonyms)
            })
            .collect();
    }

    /// Check that every rule can actually match something.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidRules`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for rule in &self.categories {
            if rule.category == Category::Other {
                return Err(invalid("Other is the fallback and cannot have keywords"));
            }
            if !seen.insert(rule.category) {
                return Err(invalid(format!("duplicate rule for {}", rule.category)));
            }
            if rule.keywords.is_empty() {
                return Err(invalid(format!("rule for {} has no keywords", rule.category)));
            }
            if rule.keywords.iter().any(String::is_empty) {
                return Err(invalid(format!("rule for {} has a blank keyword", rule.category)));
            }
        }

        for (name, synonyms) in &self.allergens {
            if name.is_empty() {
                return Err(invalid("allergen with a blank name"));
            }
            if synonyms.iter().any(String::is_empty) {
                return Err(invalid(format!("allergen {name} has a blank synonym")));
            }
        }

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidRules {
        reason: reason.into(),
    }
}

/// Split a free-text category field into lowercase tokens.
///
/// Underscores and hyphens act as spaces; commas separate tokens.
pub(crate) fn category_tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SEPARATOR_REGEX
        .replace_all(&lower, " ")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

static SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_-]").expect("valid separator regex"));

fn rule(category: Category, keywords: &[&str]) -> CategoryRule {
    CategoryRule {
        category,
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
    }
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

static BUILTIN_RULES: Lazy<RuleBook> = Lazy::new(|| RuleBook {
    categories: vec![
        rule(
            Category::Beverages,
            &[
                "beverage", "beverages", "drinks", "water", "juice", "soda", "cola", "coffee",
                "tea", "sparkling", "beer", "wine", "smoothie",
            ],
        ),
        rule(
            Category::Dairy,
            &["dairy", "milk", "cheese", "yogurt", "butter", "cream", "kefir"],
        ),
        rule(
            Category::Seafood,
            &[
                "seafood", "fish", "shrimp", "prawn", "crab", "lobster", "oyster", "mussel",
                "scallop", "tuna", "salmon", "sardine", "anchovy",
            ],
        ),
        rule(
            Category::Meat,
            &[
                "meat", "beef", "pork", "chicken", "turkey", "lamb", "veal", "duck", "bacon",
                "ham", "sausage",
            ],
        ),
        rule(
            Category::Vegetables,
            &[
                "vegetable", "vegetables", "legume", "legumes", "tomato", "carrot", "onion",
                "potato", "spinach", "pepper", "courgette", "zucchini", "aubergine", "eggplant",
            ],
        ),
        rule(
            Category::Fruits,
            &[
                "fruit", "fruits", "apple", "banana", "berry", "citrus", "orange", "grape",
                "pear", "peach", "mango", "pineapple", "strawberry", "raspberry", "blueberry",
            ],
        ),
        rule(
            Category::Bakery,
            &[
                "bakery", "bread", "biscuit", "cake", "pastry", "croissant", "muffin", "cookie",
                "brioche", "bun", "bagel",
            ],
        ),
        rule(
            Category::Snacks,
            &[
                "snack", "snacks", "chocolate", "candy", "sweet", "bar", "chips", "crackers",
                "nuts", "granola", "muesli", "popcorn",
            ],
        ),
    ],
    allergens: BTreeMap::from([
        (
            "nuts".to_string(),
            words(&[
                "almond", "walnut", "cashew", "pistachio", "hazelnut", "pecan", "macadamia",
                "brazil nut",
            ]),
        ),
        ("peanuts".to_string(), words(&["peanut", "groundnut"])),
        (
            "dairy".to_string(),
            words(&["milk", "cheese", "butter", "cream", "yogurt", "whey", "casein"]),
        ),
        ("eggs".to_string(), words(&["egg", "albumin", "lecithin"])),
        ("soy".to_string(), words(&["soy", "soya", "tofu", "tempeh"])),
        ("wheat".to_string(), words(&["wheat", "flour", "gluten"])),
        (
            "gluten".to_string(),
            words(&["wheat", "barley", "rye", "flour", "gluten"]),
        ),
        (
            "shellfish".to_string(),
            words(&["shrimp", "crab", "lobster", "prawn", "scallop", "mussel", "oyster"]),
        ),
        (
            "fish".to_string(),
            words(&["fish", "salmon", "tuna", "cod", "sardine", "anchovy"]),
        ),
        ("sesame".to_string(), words(&["sesame", "tahini"])),
        ("sulfites".to_string(), words(&["sulfite", "sulphite"])),
        ("lactose".to_string(), words(&["lactose", "milk", "dairy"])),
    ]),
});
