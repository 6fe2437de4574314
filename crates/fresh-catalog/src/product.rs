//! Product records as supplied by a catalog source.
//!
//! Upstream sources disagree on field spelling and on whether list-like
//! fields are arrays or comma-joined strings. Both shapes are accepted here
//! and exposed through accessors that always yield lowercase tokens.

use crate::error::{CatalogError, Result};
use fresh_core::ProductId;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A list-valued field that arrives either as a sequence or as one
/// comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    /// `["vegan", "halal"]`
    Many(Vec<String>),
    /// `"vegan, halal"`
    Joined(String),
    /// Any other JSON shape; treated as if the field were absent
    #[serde(skip_serializing)]
    Unreadable(IgnoredAny),
}

impl TextList {
    /// Lowercase sequence entries as they are, or split a joined string on
    /// commas into trimmed non-empty tokens.
    #[must_use]
    pub fn entries(&self) -> Option<Vec<String>> {
        match self {
            Self::Many(items) => Some(items.iter().map(|s| s.to_lowercase()).collect()),
            Self::Joined(joined) => Some(split_tokens(joined)),
            Self::Unreadable(_) => None,
        }
    }

    /// Lowercase, trimmed, non-empty tokens regardless of shape.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Many(items) => items
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Joined(joined) => split_tokens(joined),
            Self::Unreadable(_) => Vec::new(),
        }
    }
}

impl From<Vec<&str>> for TextList {
    fn from(items: Vec<&str>) -> Self {
        Self::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<&str> for TextList {
    fn from(joined: &str) -> Self {
        Self::Joined(joined.to_string())
    }
}

/// Read a scalar field, treating `null` or a value of the wrong JSON type as
/// absent instead of failing the whole record.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Value(T),
        Unreadable(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => Some(value),
        Lenient::Unreadable(_) => None,
    })
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

fn split_tokens(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A product record. Only `id` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier
    pub id: ProductId,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-text category hint from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Unit price; missing or unreadable prices read as zero
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub price: f64,

    /// Average rating in `[0, 5]`
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,

    /// Diet labels such as `halal` or `vegan`
    #[serde(default, alias = "dietary_tags", skip_serializing_if = "Option::is_none")]
    pub dietary_tags: Option<TextList>,

    /// Ingredient list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<TextList>,

    /// Manufacturer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Longer marketing text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// EAN/UPC code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    /// Number of reviews behind `rating`
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub reviews: Option<u32>,

    /// Units on hand
    #[serde(
        default,
        alias = "quantity_in_stock",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity_in_stock: Option<u32>,
}

impl Product {
    /// Create a product with a numeric identifier and a name.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ProductId::from(id),
            name: Some(name.into()),
            category: None,
            price: 0.0,
            rating: None,
            dietary_tags: None,
            ingredients: None,
            brand: None,
            description: None,
            barcode: None,
            reviews: None,
            quantity_in_stock: None,
        }
    }

    /// Set the category hint.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the price.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the dietary tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<TextList>) -> Self {
        self.dietary_tags = Some(tags.into());
        self
    }

    /// Set the ingredients.
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: impl Into<TextList>) -> Self {
        self.ingredients = Some(ingredients.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name, or the empty string when absent.
    #[must_use]
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Rating used for ordering; absent ratings count as zero.
    #[must_use]
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Ingredient tokens: lowercase, trimmed, non-empty.
    #[must_use]
    pub fn ingredient_tokens(&self) -> Vec<String> {
        self.ingredients
            .as_ref()
            .map(TextList::tokens)
            .unwrap_or_default()
    }
}

/// Read a product collection from a JSON document.
///
/// The document must be an array. Anything else is a contract violation by
/// the catalog source and is reported instead of yielding an empty list.
///
/// # Errors
/// Returns [`CatalogError::InvalidCollection`] for a non-array document and
/// [`CatalogError::InvalidProduct`] for an element that is not a product.
pub fn parse_products(json: &str) -> Result<Vec<Product>> {
    let document: Value = serde_json::from_str(json)?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(CatalogError::InvalidCollection {
                found: json_type_name(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| CatalogError::InvalidProduct { index, source })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_and_snake_case() {
        let products = parse_products(
            r#"[
                {"id": 1, "name": "Oat Milk", "price": 2.5, "dietaryTags": ["Vegan"]},
                {"id": "sku-2", "name": "Beef Mince", "dietary_tags": "halal, ", "quantity_in_stock": 3}
            ]"#,
        )
        .expect("parse products");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id.as_str(), "1");
        assert_eq!(
            products[0].dietary_tags.as_ref().and_then(TextList::entries),
            Some(vec!["vegan".to_string()])
        );
        assert_eq!(
            products[1].dietary_tags.as_ref().and_then(TextList::entries),
            Some(vec!["halal".to_string()])
        );
        assert_eq!(products[1].quantity_in_stock, Some(3));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let products = parse_products(r#"[{"id": 7}]"#).expect("parse products");
        let product = &products[0];
        assert_eq!(product.name_or_empty(), "");
        assert!(product.price.abs() < f64::EPSILON);
        assert!(product.rating_or_zero().abs() < f64::EPSILON);
        assert!(product.ingredient_tokens().is_empty());
    }

    #[test]
    fn test_non_array_collection_rejected() {
        let err = parse_products(r#"{"id": 1}"#).expect_err("object is not a collection");
        assert!(matches!(err, CatalogError::InvalidCollection { found: "object" }));

        let err = parse_products("null").expect_err("null is not a collection");
        assert!(matches!(err, CatalogError::InvalidCollection { found: "null" }));
    }

    #[test]
    fn test_invalid_element_reports_index() {
        let err = parse_products(r#"[{"id": 1}, {"name": "no id"}]"#).expect_err("missing id");
        assert!(matches!(err, CatalogError::InvalidProduct { index: 1, .. }));
    }

    #[test]
    fn test_unreadable_list_treated_as_absent() {
        let products =
            parse_products(r#"[{"id": 1, "ingredients": 12, "dietaryTags": {"a": 1}}]"#)
                .expect("parse products");
        assert!(products[0].ingredient_tokens().is_empty());
        assert_eq!(
            products[0].dietary_tags.as_ref().and_then(TextList::entries),
            None
        );
    }

    #[test]
    fn test_malformed_scalars_fall_back_to_defaults() {
        let products = parse_products(
            r#"[
                {"id": 1, "name": "Apple", "price": 1.0, "rating": 4},
                {"id": 2, "name": "Pear", "price": null, "rating": "4.5"},
                {"id": 3, "price": "cheap", "reviews": -2, "quantityInStock": "lots"}
            ]"#,
        )
        .expect("malformed scalars do not fail the collection");

        assert_eq!(products.len(), 3);
        assert!((products[0].price - 1.0).abs() < f64::EPSILON);
        assert_eq!(products[0].rating, Some(4.0));

        assert_eq!(products[1].name_or_empty(), "Pear");
        assert!(products[1].price.abs() < f64::EPSILON);
        assert_eq!(products[1].rating, None);

        assert!(products[2].price.abs() < f64::EPSILON);
        assert_eq!(products[2].reviews, None);
        assert_eq!(products[2].quantity_in_stock, None);
    }

    #[test]
    fn test_ingredient_tokens_from_both_shapes() {
        let listed = Product::new(1, "a").with_ingredients(vec![" Whole Milk ", "", "Sugar"]);
        let joined = Product::new(2, "b").with_ingredients("Whole Milk, ,Sugar");
        assert_eq!(listed.ingredient_tokens(), vec!["whole milk", "sugar"]);
        assert_eq!(joined.ingredient_tokens(), vec!["whole milk", "sugar"]);
    }
}
