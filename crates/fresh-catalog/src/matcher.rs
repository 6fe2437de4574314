//! Dietary and allergen preference matching.
//!
//! Tags are matched literally: a product tagged only `vegan` does not
//! satisfy a `vegetarian` request. Allergens are matched by substring in
//! both directions against the ingredient list, then through the allergen
//! synonym table of the rule book.

use crate::product::{Product, TextList};
use crate::rules::RuleBook;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// A shopper's dietary flags and allergy list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Preferences {
    /// Only halal products
    pub halal_only: bool,
    /// Only products tagged vegetarian
    pub vegetarian: bool,
    /// Only products tagged vegan
    pub vegan: bool,
    /// Only kosher products
    pub kosher: bool,
    /// Allergen names, matched case-insensitively
    pub allergies: Vec<String>,
}

impl Preferences {
    /// True when no flag is set and no allergy is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.halal_only
            && !self.vegetarian
            && !self.vegan
            && !self.kosher
            && self.allergies.is_empty()
    }

    /// Diet tags that a product must carry under these preferences.
    #[must_use]
    pub fn required_tags(&self) -> Vec<DietaryTag> {
        [
            (self.halal_only, DietaryTag::Halal),
            (self.vegetarian, DietaryTag::Vegetarian),
            (self.vegan, DietaryTag::Vegan),
            (self.kosher, DietaryTag::Kosher),
        ]
        .into_iter()
        .filter_map(|(wanted, tag)| wanted.then_some(tag))
        .collect()
    }
}

/// Diet labels that preferences can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryTag {
    /// Prepared according to Islamic law
    Halal,
    /// No meat or fish
    Vegetarian,
    /// No animal products
    Vegan,
    /// Prepared according to Jewish law
    Kosher,
}

impl DietaryTag {
    /// All tags that can be derived from product text, in derivation order.
    pub const ALL: [DietaryTag; 4] = [Self::Halal, Self::Kosher, Self::Vegan, Self::Vegetarian];

    /// Lowercase tag text as it appears in product data.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Halal => "halal",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Kosher => "kosher",
        }
    }
}

impl fmt::Display for DietaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a product was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A requested diet tag is not on the product
    MissingDietaryTag(DietaryTag),
    /// An ingredient matches a listed allergy
    Allergen {
        /// Allergy as requested, lowercased
        allergen: String,
        /// Offending ingredient token
        ingredient: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDietaryTag(tag) => write!(f, "not tagged {tag}"),
            Self::Allergen {
                allergen,
                ingredient,
            } => write!(f, "ingredient '{ingredient}' matches allergy '{allergen}'"),
        }
    }
}

/// Decides whether products fit a shopper's preferences.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    rules: &'a RuleBook,
}

impl Default for Matcher<'static> {
    fn default() -> Self {
        Self::new(RuleBook::builtin())
    }
}

impl<'a> Matcher<'a> {
    /// Create a matcher using the allergen table of `rules`.
    #[must_use]
    pub fn new(rules: &'a RuleBook) -> Self {
        Self { rules }
    }

    /// Check a product; absent preferences accept everything.
    #[must_use]
    pub fn matches(&self, product: &Product, preferences: Option<&Preferences>) -> bool {
        preferences.map_or(true, |prefs| self.explain(product, prefs).is_none())
    }

    /// First reason `product` fails `preferences`, or `None` if it passes.
    #[must_use]
    pub fn explain(&self, product: &Product, preferences: &Preferences) -> Option<Rejection> {
        let rejection = check_diet(product, preferences)
            .or_else(|| self.check_allergies(product, preferences));

        if let Some(reason) = &rejection {
            trace!(product_id = %product.id, %reason, "product rejected by preferences");
        }
        rejection
    }

    /// Keep products that pass; absent or empty preferences return the input as is.
    #[must_use]
    pub fn filter(&self, products: &[Product], preferences: Option<&Preferences>) -> Vec<Product> {
        match preferences {
            Some(prefs) if !prefs.is_empty() => {
                let kept: Vec<Product> = products
                    .iter()
                    .filter(|p| self.explain(p, prefs).is_none())
                    .cloned()
                    .collect();
                debug!(
                    before = products.len(),
                    after = kept.len(),
                    "filtered products by preferences"
                );
                kept
            }
            _ => products.to_vec(),
        }
    }

    fn check_allergies(&self, product: &Product, preferences: &Preferences) -> Option<Rejection> {
        if preferences.allergies.is_empty() {
            return None;
        }

        let ingredients = product.ingredient_tokens();
        if ingredients.is_empty() {
            return None;
        }

        for allergen in &preferences.allergies {
            let allergen = allergen.trim().to_lowercase();
            // "" is contained in every ingredient
            if allergen.is_empty() {
                continue;
            }

            let direct = ingredients.iter().find(|ing| overlaps(ing, &allergen));
            let via_synonym = || {
                self.rules.synonyms(&allergen).iter().find_map(|synonym| {
                    ingredients.iter().find(|ing| overlaps(ing, synonym))
                })
            };

            if let Some(ingredient) = direct.or_else(via_synonym) {
                return Some(Rejection::Allergen {
                    ingredient: ingredient.clone(),
                    allergen,
                });
            }
        }

        None
    }
}

fn check_diet(product: &Product, preferences: &Preferences) -> Option<Rejection> {
    let required = preferences.required_tags();
    if required.is_empty() {
        return None;
    }

    let tags = dietary_tags(product);
    required
        .into_iter()
        .find(|tag| !tags.iter().any(|t| t == tag.as_str()))
        .map(Rejection::MissingDietaryTag)
}

/// Substring containment in either direction.
fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Lowercase diet tags of a product.
///
/// Explicit tags are used as given. Without them, tags are derived from the
/// product's category and name text, each tag independently.
#[must_use]
pub fn dietary_tags(product: &Product) -> Vec<String> {
    if let Some(tags) = product.dietary_tags.as_ref().and_then(TextList::entries) {
        return tags;
    }

    let text = format!(
        "{} {}",
        product.category.as_deref().unwrap_or(""),
        product.name_or_empty()
    )
    .to_lowercase();

    DietaryTag::ALL
        .iter()
        .map(DietaryTag::as_str)
        .filter(|tag| text.contains(tag))
        .map(str::to_string)
        .collect()
}

/// Check a product against preferences using the built-in allergen table.
#[must_use]
pub fn matches(product: &Product, preferences: Option<&Preferences>) -> bool {
    Matcher::default().matches(product, preferences)
}

/// Keep products that fit `preferences`, using the built-in allergen table.
///
/// Absent or empty preferences return every product in its original order.
#[must_use]
pub fn filter_by_preferences(
    products: &[Product],
    preferences: Option<&Preferences>,
) -> Vec<Product> {
    Matcher::default().filter(products, preferences)
}
