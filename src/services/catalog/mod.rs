//! Catalog sources
//!
//! A catalog source supplies the joined, cleaned item table the corpus is
//! built from. Sources are synchronous; callers on the async side run them
//! on the blocking pool.

use thiserror::Error;

use crate::models::RawItem;

pub mod csv_source;

pub use csv_source::CsvCatalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} is missing column {column}")]
    MissingColumn { path: String, column: &'static str },

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Trait for item catalog providers
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    /// Loads every item in catalog order
    fn load(&self) -> Result<Vec<RawItem>, CatalogError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
