//! Sheet loading: one `data` table from a CSV file, or every sheet of a
//! workbook keyed by sheet name.

use crate::error::{LoadError, LoadResult};
use crate::schema::CSV_TABLE;
use std::path::Path;
use tabsage_sheet::{Book, Sheet};

/// Whether the path names a single-table CSV file.
pub fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Load all tables from `path`. The load either succeeds for every sheet or
/// fails as a whole.
pub fn load_tables<P: AsRef<Path>>(path: P) -> LoadResult<Book> {
    let path = path.as_ref();

    let loaded = if is_csv_path(path) {
        Sheet::from_csv(path).and_then(|sheet| {
            let mut book = Book::new();
            book.add_sheet(CSV_TABLE, sheet)?;
            Ok(book)
        })
    } else {
        Book::from_workbook(path)
    };

    let book = loaded.map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        tables = ?book.sheet_names(),
        "loaded dataset"
    );
    Ok(book)
}
