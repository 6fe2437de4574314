//! Catalog query pipeline: category, price, preferences, then sort.

use crate::classifier::Classifier;
use crate::error::{CatalogError, Result};
use crate::matcher::{Matcher, Preferences};
use crate::product::Product;
use crate::rules::RuleBook;
use fresh_core::{CatalogConfig, Category};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sort orders offered by the storefront. No sort key means "featured",
/// which keeps the incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortBy {
    /// Cheapest first
    #[serde(rename = "priceLow")]
    PriceLow,
    /// Most expensive first
    #[serde(rename = "priceHigh")]
    PriceHigh,
    /// Name, A to Z
    #[serde(rename = "nameAZ")]
    NameAz,
    /// Name, Z to A
    #[serde(rename = "nameZA")]
    NameZa,
    /// Highest rated first; unrated counts as zero
    #[serde(rename = "rating")]
    Rating,
}

impl SortBy {
    /// Wire name of the sort key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceLow => "priceLow",
            Self::PriceHigh => "priceHigh",
            Self::NameAz => "nameAZ",
            Self::NameZa => "nameZA",
            Self::Rating => "rating",
        }
    }

    /// Parse a sort selector where `featured` (or nothing) means no sort.
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownSortKey`] for anything else.
    pub fn from_key(key: &str) -> Result<Option<Self>> {
        let key = key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("featured") {
            return Ok(None);
        }
        key.parse().map(Some)
    }

    /// Order two products by this key.
    #[must_use]
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceLow => a.price.total_cmp(&b.price),
            Self::PriceHigh => b.price.total_cmp(&a.price),
            Self::NameAz => compare_names(a.name_or_empty(), b.name_or_empty()),
            Self::NameZa => compare_names(b.name_or_empty(), a.name_or_empty()),
            Self::Rating => b.rating_or_zero().total_cmp(&a.rating_or_zero()),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        [
            Self::PriceLow,
            Self::PriceHigh,
            Self::NameAz,
            Self::NameZa,
            Self::Rating,
        ]
        .into_iter()
        .find(|sort| sort.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| CatalogError::UnknownSortKey(s.to_string()))
    }
}

/// Compare display names the way a shopper reads them.
///
/// Accents and case are ignored first, so "éclair" sorts next to "eclair"
/// and before "fig". Ties fall back to lowercase text, then exact text, so
/// the order is total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Lowercase text with diacritics stripped after canonical decomposition.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Which category bucket a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategorySelection {
    /// Every product regardless of category
    #[default]
    All,
    /// Products classified into one category
    Only(Category),
}

impl CategorySelection {
    /// Whether a product of `category` is in this selection.
    #[must_use]
    pub fn admits(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for CategorySelection {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Category>()
            .map(Self::Only)
            .map_err(|_| CatalogError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for CategorySelection {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CategorySelection> for String {
    fn from(selection: CategorySelection) -> Self {
        selection.to_string()
    }
}

impl From<Category> for CategorySelection {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

/// Criteria for one catalog query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    /// Category bucket, or all products
    pub category: CategorySelection,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// Sort order; `None` keeps the incoming order
    pub sort_by: Option<SortBy>,
    /// Apply the shopper's preferences
    pub preferences_enabled: bool,
}

impl FilterSpec {
    /// Initial filter for a storefront session.
    ///
    /// An unrecognized `default_sort` is logged and treated as "featured".
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        let sort_by = SortBy::from_key(&config.default_sort).unwrap_or_else(|err| {
            warn!(value = %config.default_sort, error = %err, "ignoring catalog.default_sort");
            None
        });

        Self {
            sort_by,
            preferences_enabled: config.preferences_enabled,
            ..Self::default()
        }
    }

    /// Drop price bounds and sort order, keeping the category and the
    /// preference gate.
    pub fn clear_filters(&mut self) {
        self.min_price = None;
        self.max_price = None;
        self.sort_by = None;
    }

    /// Clamp set price bounds into `0..=ceiling`, the range the price
    /// inputs offer (`catalog.price_ceiling`).
    pub fn clamp_prices(&mut self, ceiling: f64) {
        let ceiling = ceiling.max(0.0);
        let clamp = |bound: f64| bound.max(0.0).min(ceiling);
        self.min_price = self.min_price.map(clamp);
        self.max_price = self.max_price.map(clamp);
    }

    /// Whether any price bound or sort order is set.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some() || self.sort_by.is_some()
    }

    fn admits_price(&self, price: f64) -> bool {
        self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }
}

/// The query pipeline bound to one rule book.
#[derive(Debug, Clone, Copy)]
pub struct CatalogQuery<'a> {
    classifier: Classifier<'a>,
    matcher: Matcher<'a>,
}

impl Default for CatalogQuery<'static> {
    fn default() -> Self {
        Self::new(RuleBook::builtin())
    }
}

impl<'a> CatalogQuery<'a> {
    /// Create a pipeline that classifies and matches with `rules`.
    #[must_use]
    pub fn new(rules: &'a RuleBook) -> Self {
        Self {
            classifier: Classifier::new(rules),
            matcher: Matcher::new(rules),
        }
    }

    /// Run all stages over `products` and return a new, ordered list.
    #[must_use]
    pub fn run(
        &self,
        products: &[Product],
        spec: &FilterSpec,
        preferences: Option<&Preferences>,
    ) -> Vec<Product> {
        let candidates: Vec<&Product> = match spec.category {
            CategorySelection::All => products.iter().collect(),
            CategorySelection::Only(category) => products
                .iter()
                .filter(|p| self.classifier.classify(p) == category)
                .collect(),
        };
        debug!(
            stage = "category",
            selection = %spec.category,
            before = products.len(),
            after = candidates.len(),
        );

        self.refine(candidates, spec, preferences)
    }

    /// Price, preference and sort stages over products already narrowed
    /// by category.
    pub(crate) fn refine(
        &self,
        mut candidates: Vec<&Product>,
        spec: &FilterSpec,
        preferences: Option<&Preferences>,
    ) -> Vec<Product> {
        let before = candidates.len();
        candidates.retain(|p| spec.admits_price(p.price));
        debug!(stage = "price", before, after = candidates.len());

        if let (true, Some(prefs)) = (spec.preferences_enabled, preferences) {
            let before = candidates.len();
            candidates.retain(|p| self.matcher.matches(p, Some(prefs)));
            debug!(stage = "preferences", before, after = candidates.len());
        }

        if let Some(sort) = spec.sort_by {
            candidates.sort_by(|a, b| sort.compare(a, b));
        }

        candidates.into_iter().cloned().collect()
    }
}

/// Filter and order `products` with the built-in rules.
#[must_use]
pub fn query(
    products: &[Product],
    spec: &FilterSpec,
    preferences: Option<&Preferences>,
) -> Vec<Product> {
    CatalogQuery::default().run(products, spec, preferences)
}
