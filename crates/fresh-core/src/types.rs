//! Shared types used across the FreshExpress catalog.
//!
//! This module defines the product identifier newtype and the fixed
//! category enumeration that every other crate classifies into.

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Newtype for product identifiers.
///
/// Catalog sources hand out either numeric database keys or opaque strings,
/// so both are accepted on input and normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new `ProductId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty or only whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::Validation(
                "invalid product ID: must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(Self::from(n)),
            RawId::Text(s) => Self::new(s).map_err(serde::de::Error::custom),
        }
    }
}

/// Catalog buckets used for browsing and grouping.
///
/// Declaration order is the display order; `Other` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Fresh and dried fruit
    Fruits,
    /// Vegetables and legumes
    Vegetables,
    /// Milk, cheese, yogurt and friends
    Dairy,
    /// Bread, pastries and baked goods
    Bakery,
    /// Meat and poultry
    Meat,
    /// Fish and shellfish
    Seafood,
    /// Drinks of any kind
    Beverages,
    /// Sweets, chips, nuts and bars
    Snacks,
    /// Anything that matched no rule
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 9] = [
        Self::Fruits,
        Self::Vegetables,
        Self::Dairy,
        Self::Bakery,
        Self::Meat,
        Self::Seafood,
        Self::Beverages,
        Self::Snacks,
        Self::Other,
    ];

    /// Get the display name shown in the category sidebar.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fruits => "Fruits",
            Self::Vegetables => "Vegetables",
            Self::Dairy => "Dairy",
            Self::Bakery => "Bakery",
            Self::Meat => "Meat",
            Self::Seafood => "Seafood",
            Self::Beverages => "Beverages",
            Self::Snacks => "Snacks",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Parse a display name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::Validation(format!("unknown category '{wanted}'")))
    }
}
