//! Category classification from free-text product hints.

use crate::product::Product;
use crate::rules::{category_tokens, RuleBook};
use fresh_core::Category;

/// Maps products to catalog categories using a rule book.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    rules: &'a RuleBook,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(RuleBook::builtin())
    }
}

impl<'a> Classifier<'a> {
    /// Create a classifier over the given rules.
    #[must_use]
    pub fn new(rules: &'a RuleBook) -> Self {
        Self { rules }
    }

    /// Classify a product, trying its category text first and its name second.
    ///
    /// Always returns a category; products matching no rule are `Other`.
    #[must_use]
    pub fn classify(&self, product: &Product) -> Category {
        product
            .category
            .as_deref()
            .and_then(|text| self.classify_text(text))
            .or_else(|| {
                product
                    .name
                    .as_deref()
                    .and_then(|text| self.classify_text(text))
            })
            .unwrap_or(Category::Other)
    }

    /// Classify a single text field.
    ///
    /// Returns the first rule, in table order, with a keyword contained in
    /// any token of `text`.
    #[must_use]
    pub fn classify_text(&self, text: &str) -> Option<Category> {
        let tokens = category_tokens(text);
        if tokens.is_empty() {
            return None;
        }

        self.rules
            .categories
            .iter()
            .find(|rule| {
                tokens.iter().any(|token| {
                    rule.keywords
                        .iter()
                        .any(|keyword| token.contains(keyword.as_str()))
                })
            })
            .map(|rule| rule.category)
    }
}

/// Classify a product with the built-in rules.
#[must_use]
pub fn classify(product: &Product) -> Category {
    Classifier::default().classify(product)
}

/// Classify one text field with the built-in rules.
#[must_use]
pub fn classify_text(text: &str) -> Option<Category> {
    Classifier::default().classify_text(text)
}
