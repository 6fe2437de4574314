//! Immutable in-memory product catalog.

use crate::classifier::Classifier;
use crate::counts::{tally, CategoryCount};
use crate::error::Result;
use crate::matcher::Preferences;
use crate::product::{parse_products, Product};
use crate::query::{CatalogQuery, CategorySelection, FilterSpec};
use crate::rules::RuleBook;
use crate::search::matches_term;
use fresh_core::{Category, ProductId};
use std::collections::HashMap;
use tracing::info;

/// A loaded product collection with categories resolved up front.
///
/// The catalog never changes after construction. Queries borrow it and
/// return fresh vectors, so one catalog can serve any number of sessions.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<Entry>,
    index: HashMap<ProductId, usize>,
    rules: RuleBook,
}

#[derive(Debug, Clone)]
struct Entry {
    product: Product,
    category: Category,
}

impl Catalog {
    /// Build a catalog classified with the built-in rules.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self::with_rules(products, RuleBook::default())
    }

    /// Build a catalog classified with `rules`.
    ///
    /// When two products share an id, lookups by id return the first.
    #[must_use]
    pub fn with_rules(products: Vec<Product>, rules: RuleBook) -> Self {
        let classifier = Classifier::new(&rules);
        let entries: Vec<Entry> = products
            .into_iter()
            .map(|product| Entry {
                category: classifier.classify(&product),
                product,
            })
            .collect();

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index.entry(entry.product.id.clone()).or_insert(position);
        }

        info!(count = entries.len(), "loaded product catalog");

        Self {
            entries,
            index,
            rules,
        }
    }

    /// Parse a JSON product array and build a catalog from it.
    ///
    /// # Errors
    /// Returns error if the document is not an array of products.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(parse_products(json)?))
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&position| &self.entries[position].product)
    }

    /// Category the product with `id` was classified into.
    #[must_use]
    pub fn category_of(&self, id: &ProductId) -> Option<Category> {
        self.index.get(id).map(|&position| self.entries[position].category)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rules the catalog was classified with.
    #[must_use]
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// All products in load order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.entries.iter().map(|entry| &entry.product)
    }

    /// Products in one category, in load order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<Product> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.product.clone())
            .collect()
    }

    /// Run the query pipeline using the precomputed categories.
    #[must_use]
    pub fn query(&self, spec: &FilterSpec, preferences: Option<&Preferences>) -> Vec<Product> {
        let candidates: Vec<&Product> = self
            .entries
            .iter()
            .filter(|entry| spec.category.admits(entry.category))
            .map(|entry| &entry.product)
            .collect();

        CatalogQuery::new(&self.rules).refine(candidates, spec, preferences)
    }

    /// Menu counts: `All` first, then each category in display order.
    #[must_use]
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        tally(self.entries.iter().map(|entry| entry.category))
    }

    /// Products whose name, description or ingredients mention `term`,
    /// restricted to `selection`.
    #[must_use]
    pub fn search(&self, term: &str, selection: CategorySelection) -> Vec<Product> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| selection.admits(entry.category))
            .filter(|entry| needle.is_empty() || matches_term(&entry.product, &needle))
            .map(|entry| entry.product.clone())
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
