//! Question answering over employee, sales, and feedback tables.
//!
//! An [`Analyzer`] loads a CSV file or workbook, classifies and normalizes
//! every column, joins Employees with Sales and Feedback, and answers
//! free-text questions through an ordered list of pattern routes.
//!
//! # Example
//!
//! ```no_run
//! use tabsage_analyzer::{format_result, Analyzer};
//!
//! let analyzer = Analyzer::open("company.xlsx").unwrap();
//! let result = analyzer.query("How many employees are in the Sales department?");
//! if let Some(answer) = format_result(&result) {
//!     println!("{answer}");
//! }
//! ```

mod analyzer;
pub mod classify;
mod error;
pub mod extract;
mod format;
pub mod handlers;
pub mod loader;
pub mod preprocess;
pub mod relationships;
mod result;
pub mod router;
pub mod schema;

pub use analyzer::{Analyzer, TextExtractor};
pub use classify::{ColumnClassification, ColumnKind};
pub use error::{LoadError, LoadResult};
pub use extract::{Extract, KnownValues, NumberAfter};
pub use format::{format_currency, format_result};
pub use relationships::Relationships;
pub use result::QueryResult;
pub use router::{Question, Route, ROUTES};
