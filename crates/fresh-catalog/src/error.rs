//! Error types for the catalog engine.

use thiserror::Error;

/// Errors that can occur at the catalog's input boundaries.
///
/// Classification, matching and querying never fail; these errors come from
/// reading product collections, rule books and string-typed filter values.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The product collection is not a sequence of records
    #[error("product collection must be a JSON array, got {found}")]
    InvalidCollection {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// A single element of the collection could not be read as a product
    #[error("invalid product at index {index}: {source}")]
    InvalidProduct {
        /// Position of the element in the collection
        index: usize,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The document is not valid JSON at all
    #[error("malformed product JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Sort key not in the fixed enumeration
    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),

    /// Category selection that is neither a category nor the "All" sentinel
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// Failed to parse rule book TOML
    #[error("failed to parse rule book TOML: {0}")]
    RulesParse(#[from] toml::de::Error),

    /// Rule book parsed but is unusable
    #[error("invalid rule book: {reason}")]
    InvalidRules {
        /// Reason for validation failure
        reason: String,
    },

    /// I/O error while reading a rule book
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
