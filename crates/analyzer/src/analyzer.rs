use crate::classify::{classify_sheet, ColumnClassification};
use crate::error::{LoadError, LoadResult};
use crate::extract::{Extract, KnownValues};
use crate::loader::load_tables;
use crate::preprocess::preprocess;
use crate::relationships::{build_relationships, Relationships};
use crate::result::QueryResult;
use crate::router;
use crate::schema::{DEPARTMENT, EMPLOYEES, NAME};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tabsage_sheet::{Book, Sheet};

/// Boxed string extractor used for department and employee names.
pub type TextExtractor = Box<dyn Extract<Output = String>>;

/// A loaded, classified, and preprocessed dataset that answers questions.
///
/// Built once per file; loading a new file means building a new analyzer.
pub struct Analyzer {
    source: Option<PathBuf>,
    book: Book,
    classifications: IndexMap<String, ColumnClassification>,
    relationships: Relationships,
    departments: TextExtractor,
    names: TextExtractor,
}

impl Analyzer {
    /// Load `path` and run classification, preprocessing, and relationship
    /// building.
    pub fn open<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let book = load_tables(path)?;
        let mut analyzer = Self::from_book(book)?;
        analyzer.source = Some(path.to_path_buf());
        Ok(analyzer)
    }

    /// Build an analyzer over tables that are already in memory.
    pub fn from_book(mut book: Book) -> LoadResult<Self> {
        let mut classifications = IndexMap::new();
        for (name, sheet) in book.sheets_mut() {
            classifications.insert(name.to_string(), classify_sheet(sheet));
        }
        for (name, sheet) in book.sheets_mut() {
            if let Some(classification) = classifications.get(name) {
                preprocess(sheet, classification);
            }
        }

        let relationships = build_relationships(&book).map_err(LoadError::Relationship)?;

        let employees = book.get_sheet(EMPLOYEES).ok();
        let departments: TextExtractor = Box::new(KnownValues::from_column(employees, DEPARTMENT));
        let names: TextExtractor = Box::new(KnownValues::from_column(employees, NAME));

        tracing::debug!(
            tables = book.sheet_count(),
            views = relationships.len(),
            "dataset ready"
        );

        Ok(Analyzer {
            source: None,
            book,
            classifications,
            relationships,
            departments,
            names,
        })
    }

    /// Route a question to a handler. Never fails: anything the router cannot
    /// answer comes back as `QueryResult::Unhandled`.
    pub fn query(&self, question: &str) -> QueryResult {
        router::route(self, question)
    }

    /// File the dataset was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn table(&self, name: &str) -> Option<&Sheet> {
        self.book.get_sheet(name).ok()
    }

    pub fn classification(&self, table: &str) -> Option<&ColumnClassification> {
        self.classifications.get(table)
    }

    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    pub fn departments(&self) -> &dyn Extract<Output = String> {
        self.departments.as_ref()
    }

    pub fn names(&self) -> &dyn Extract<Output = String> {
        self.names.as_ref()
    }

    /// Replace the department extractor.
    pub fn set_department_extractor(&mut self, extractor: TextExtractor) {
        self.departments = extractor;
    }

    /// Replace the employee name extractor.
    pub fn set_name_extractor(&mut self, extractor: TextExtractor) {
        self.names = extractor;
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("source", &self.source)
            .field("tables", &self.book.sheet_names())
            .field("views", &self.relationships.len())
            .finish_non_exhaustive()
    }
}
