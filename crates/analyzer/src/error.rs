//! Error types for loading a dataset.

use std::path::PathBuf;
use tabsage_sheet::SheetError;
use thiserror::Error;

/// Result type for dataset loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that abort loading a dataset. No analyzer is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is missing, unreadable, or not a CSV/workbook.
    #[error("Failed to load {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: SheetError,
    },

    /// A relationship view could not be built from tables that are present.
    #[error("Failed to build relationship view: {0}")]
    Relationship(#[source] SheetError),
}
