//! Fresh Core - Foundation crate for the FreshExpress catalog.
//!
//! This crate provides shared types, error handling and configuration
//! management that the catalog engine depends on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`ProductId`, `Category`)
//!
//! # Example
//!
//! ```rust
//! use fresh_core::{AppConfig, Category};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.catalog.default_sort, "featured");
//!
//! let category: Category = "dairy".parse()?;
//! assert_eq!(category, Category::Dairy);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CatalogConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{Category, ProductId};
