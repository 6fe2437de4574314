//! Free-text product search.

use crate::product::Product;

/// Products whose name, description or ingredients contain `term`,
/// compared case-insensitively. A blank term returns every product.
#[must_use]
pub fn search(products: &[Product], term: &str) -> Vec<Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|p| matches_term(p, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be trimmed and lowercased.
pub(crate) fn matches_term(product: &Product, needle: &str) -> bool {
    let in_text = |text: Option<&str>| text.is_some_and(|t| t.to_lowercase().contains(needle));

    in_text(product.name.as_deref())
        || in_text(product.description.as_deref())
        || product
            .ingredient_tokens()
            .iter()
            .any(|ingredient| ingredient.contains(needle))
}
