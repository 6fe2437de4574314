//! Fresh Catalog - rule engine behind the grocery storefront.
//!
//! This crate turns loosely structured product records into a browsable
//! catalog. It assigns each product to a fixed category, checks products
//! against a shopper's dietary and allergy preferences, and runs the
//! filter and sort pipeline behind the product grid.
//!
//! # Architecture
//!
//! - **Products** ([`product`]): Tolerant product records and collection parsing
//! - **Rules** ([`rules`]): Category keyword and allergen synonym tables
//! - **Classifier** ([`classifier`]): Keyword-based category assignment
//! - **Matcher** ([`matcher`]): Dietary tag and allergen checks
//! - **Query** ([`query`]): Category, price, preference and sort stages
//! - **Catalog** ([`catalog`]): Immutable index with precomputed categories
//!
//! # Example
//!
//! ```rust
//! use fresh_catalog::{query, CategorySelection, FilterSpec, Preferences, Product, SortBy};
//! use fresh_core::Category;
//!
//! let products = vec![
//!     Product::new(1, "Almond Croissant")
//!         .with_category("Bakery")
//!         .with_price(2.2)
//!         .with_ingredients("flour, butter, almonds"),
//!     Product::new(2, "Rye Bread").with_category("Bakery").with_price(3.1),
//! ];
//!
//! let spec = FilterSpec {
//!     category: CategorySelection::Only(Category::Bakery),
//!     sort_by: Some(SortBy::PriceHigh),
//!     preferences_enabled: true,
//!     ..FilterSpec::default()
//! };
//! let prefs = Preferences {
//!     allergies: vec!["nuts".to_string()],
//!     ..Preferences::default()
//! };
//!
//! let shown = query(&products, &spec, Some(&prefs));
//! assert_eq!(shown.len(), 1);
//! assert_eq!(shown[0].name_or_empty(), "Rye Bread");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod classifier;
pub mod counts;
pub mod error;
pub mod matcher;
pub mod product;
pub mod query;
pub mod rules;
pub mod search;

// Re-export commonly used types
pub use catalog::Catalog;
pub use classifier::{classify, classify_text, Classifier};
pub use counts::{category_counts, CategoryCount};
pub use error::{CatalogError, Result};
pub use matcher::{
    dietary_tags, filter_by_preferences, matches, DietaryTag, Matcher, Preferences, Rejection,
};
pub use product::{parse_products, Product, TextList};
pub use query::{compare_names, query, CatalogQuery, CategorySelection, FilterSpec, SortBy};
pub use rules::{CategoryRule, RuleBook};
pub use search::search;
