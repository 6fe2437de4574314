//! Property tests for classification, matching and the query pipeline.

use fresh_catalog::{
    classify, matches, query, CategorySelection, FilterSpec, Preferences, Product, SortBy,
};
use fresh_core::{Category, ProductId};
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_, -]{0,24}",
        prop::sample::select(vec![
            "Fruits", "dairy_products", "Sea-Food", "MEAT", "bakery, snacks", "Household",
        ])
        .prop_map(str::to_string),
    ]
}

fn arb_product() -> impl Strategy<Value = Product> {
    (
        0u64..50,
        arb_text(),
        prop::option::of(arb_text()),
        0.0f64..100.0,
        prop::option::of(0.0f64..5.0),
        prop::collection::vec("[a-z ]{0,10}", 0..4),
    )
        .prop_map(|(id, name, category, price, rating, ingredients)| {
            let mut product = Product::new(id, name).with_price(price);
            product.category = category;
            product.rating = rating;
            let refs: Vec<&str> = ingredients.iter().map(String::as_str).collect();
            product.with_ingredients(refs)
        })
}

fn arb_sort() -> impl Strategy<Value = Option<SortBy>> {
    prop::option::of(prop::sample::select(vec![
        SortBy::PriceLow,
        SortBy::PriceHigh,
        SortBy::NameAz,
        SortBy::NameZa,
        SortBy::Rating,
    ]))
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
    (
        prop::option::of(prop::sample::select(Category::ALL.to_vec())),
        prop::option::of(0.0f64..60.0),
        prop::option::of(0.0f64..60.0),
        arb_sort(),
        any::<bool>(),
    )
        .prop_map(|(category, min_price, max_price, sort_by, preferences_enabled)| FilterSpec {
            category: category.map_or(CategorySelection::All, CategorySelection::Only),
            min_price,
            max_price,
            sort_by,
            preferences_enabled,
        })
}

fn arb_preferences() -> impl Strategy<Value = Preferences> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec("[a-z]{0,8}", 0..3),
    )
        .prop_map(|(halal_only, vegetarian, vegan, kosher, allergies)| Preferences {
            halal_only,
            vegetarian,
            vegan,
            kosher,
            allergies,
        })
}

proptest! {
    #[test]
    fn classify_is_total_and_known(product in arb_product()) {
        let category = classify(&product);
        prop_assert!(Category::ALL.contains(&category));
    }

    #[test]
    fn absent_preferences_accept_everything(product in arb_product()) {
        prop_assert!(matches(&product, None));
    }

    #[test]
    fn price_low_sort_is_ordered_and_stable(products in prop::collection::vec(arb_product(), 0..20)) {
        let products: Vec<Product> = products
            .into_iter()
            .enumerate()
            .map(|(index, mut product)| {
                product.id = ProductId::from(index as u64);
                product
            })
            .collect();
        let spec = FilterSpec { sort_by: Some(SortBy::PriceLow), ..FilterSpec::default() };
        let sorted = query(&products, &spec, None);

        prop_assert_eq!(sorted.len(), products.len());
        let position = |p: &Product| products.iter().position(|q| q.id == p.id);
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].price <= pair[1].price);
            // equal prices keep input order
            if pair[0].price.total_cmp(&pair[1].price).is_eq() {
                prop_assert!(position(&pair[0]) < position(&pair[1]));
            }
        }
    }

    #[test]
    fn query_output_is_a_filtered_subset(
        products in prop::collection::vec(arb_product(), 0..20),
        spec in arb_spec(),
        prefs in arb_preferences(),
    ) {
        let result = query(&products, &spec, Some(&prefs));
        prop_assert!(result.len() <= products.len());
        for product in &result {
            prop_assert!(products.contains(product));
            prop_assert!(spec.category.admits(classify(product)));
            if let Some(min) = spec.min_price {
                prop_assert!(product.price >= min);
            }
            if let Some(max) = spec.max_price {
                prop_assert!(product.price <= max);
            }
            if spec.preferences_enabled {
                prop_assert!(matches(product, Some(&prefs)));
            }
        }
    }

    #[test]
    fn query_is_idempotent(
        products in prop::collection::vec(arb_product(), 0..20),
        spec in arb_spec(),
        prefs in arb_preferences(),
    ) {
        let once = query(&products, &spec, Some(&prefs));
        let twice = query(&once, &spec, Some(&prefs));
        prop_assert_eq!(once, twice);
    }
}
