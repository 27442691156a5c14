//! Sheet/Book module for tabsage
//!
//! Provides the in-memory table model used by the analyzer: named sheets with
//! typed cells, multi-sheet books, CSV and workbook loading, and a left outer
//! join.
//!
//! # Examples
//!
//! ## Creating a sheet from data
//!
//! ```
//! use tabsage_sheet::{Sheet, CellValue};
//!
//! let sheet = Sheet::from_data("Employees", vec![
//!     vec!["Name", "Department"],
//!     vec!["Alice", "Sales"],
//!     vec!["Bob", "Sales"],
//! ]).unwrap();
//!
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.col_count(), 2);
//! ```
//!
//! ## Loading from CSV
//!
//! ```no_run
//! use tabsage_sheet::Sheet;
//!
//! let sheet = Sheet::from_csv("data.csv").unwrap();
//! assert_eq!(sheet.name(), "data");
//! ```
//!
//! ## Loading a workbook
//!
//! ```no_run
//! use tabsage_sheet::Book;
//!
//! let book = Book::from_workbook("company.xlsx").unwrap();
//! for (name, sheet) in book.sheets() {
//!     println!("{name}: {} rows", sheet.row_count());
//! }
//! ```

mod book;
mod cell;
mod csv;
pub mod date;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
