//! Per-category product counts for the category menu.

use crate::classifier::Classifier;
use crate::product::Product;
use crate::query::CategorySelection;
use fresh_core::Category;
use serde::Serialize;

/// Number of products under one menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Menu entry
    pub selection: CategorySelection,
    /// Products it would show
    pub count: usize,
}

/// Menu counts from already classified products: `All` first, then every
/// category in display order, zero counts included.
pub(crate) fn tally(categories: impl IntoIterator<Item = Category>) -> Vec<CategoryCount> {
    let mut per_category = [0usize; Category::ALL.len()];
    let mut total = 0;

    for category in categories {
        total += 1;
        if let Some(slot) = Category::ALL.iter().position(|c| *c == category) {
            per_category[slot] += 1;
        }
    }

    std::iter::once(CategoryCount {
        selection: CategorySelection::All,
        count: total,
    })
    .chain(
        Category::ALL
            .iter()
            .zip(per_category)
            .map(|(category, count)| CategoryCount {
                selection: CategorySelection::Only(*category),
                count,
            }),
    )
    .collect()
}

/// Count products per category using the built-in rules.
#[must_use]
pub fn category_counts(products: &[Product]) -> Vec<CategoryCount> {
    let classifier = Classifier::default();
    tally(products.iter().map(|p| classifier.classify(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_cover_every_category() {
        let products = vec![
            Product::new(1, "Apples"),
            Product::new(2, "Pears"),
            Product::new(3, "Salmon Fillet"),
            Product::new(4, "Dish Soap"),
        ];
        let counts = category_counts(&products);

        assert_eq!(counts.len(), Category::ALL.len() + 1);
        assert_eq!(
            counts[0],
            CategoryCount {
                selection: CategorySelection::All,
                count: 4
            }
        );

        let count_of = |category| {
            counts
                .iter()
                .find(|c| c.selection == CategorySelection::Only(category))
                .map(|c| c.count)
        };
        assert_eq!(count_of(Category::Fruits), Some(2));
        assert_eq!(count_of(Category::Seafood), Some(1));
        assert_eq!(count_of(Category::Other), Some(1));
        assert_eq!(count_of(Category::Bakery), Some(0));
    }

    #[test]
    fn test_empty_collection() {
        let counts = category_counts(&[]);
        assert!(counts.iter().all(|c| c.count == 0));
    }
}
