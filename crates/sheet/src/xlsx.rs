use crate::book::Book;
use crate::cell::CellValue;
use crate::date::{excel_serial_to_datetime, parse_datetime};
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map_or(CellValue::Float(dt.as_f64()), CellValue::Date),
        Data::DateTimeIso(s) => {
            parse_datetime(s).map_or_else(|| CellValue::String(s.clone()), CellValue::Date)
        }
        Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

fn workbook_error(e: impl std::fmt::Display) -> SheetError {
    SheetError::Workbook(e.to_string())
}

impl Book {
    /// Load every sheet of a workbook (xlsx, xlsm, xls, xlsb, ods).
    ///
    /// Each sheet's first row is its header. Sheets keep workbook order and
    /// are keyed by sheet name.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or any sheet fails to read.
    pub fn from_workbook<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref()).map_err(workbook_error)?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut book = Book::new();

        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(workbook_error)?;

            let rows = range
                .rows()
                .map(|row| row.iter().map(data_to_cell_value).collect::<Vec<_>>());
            let sheet = Sheet::from_raw_rows(&sheet_name, rows)?;

            book.add_sheet(&sheet_name, sheet)?;
        }

        Ok(book)
    }

    /// Get sheet names from a workbook without loading data
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened.
    pub fn workbook_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let workbook = open_workbook_auto(path.as_ref()).map_err(workbook_error)?;
        Ok(workbook.sheet_names().to_vec())
    }
}
