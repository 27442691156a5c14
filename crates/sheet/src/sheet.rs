use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A named table: ordered column names over row-major cell storage.
///
/// The header is kept apart from the data, so `row_count` counts data rows
/// only.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet with a name and no columns
    #[must_use]
    pub fn new(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            columns: Vec::new(),
            column_index: HashMap::new(),
            rows: Vec::new(),
        }
    }

    /// Create an empty sheet with the given column names
    ///
    /// # Errors
    ///
    /// Returns `DuplicateColumnName` if a name repeats.
    pub fn with_columns<S: AsRef<str>>(name: &str, columns: &[S]) -> Result<Self> {
        let mut sheet = Sheet::new(name);
        for column in columns {
            let column = column.as_ref();
            if sheet.column_index.contains_key(column) {
                return Err(SheetError::DuplicateColumnName {
                    name: column.to_string(),
                });
            }
            sheet
                .column_index
                .insert(column.to_string(), sheet.columns.len());
            sheet.columns.push(column.to_string());
        }
        Ok(sheet)
    }

    /// Create a sheet from a 2D vector whose first row holds the column names
    ///
    /// # Errors
    ///
    /// Returns error on duplicate column names or rows wider than the header.
    pub fn from_data<T: Into<CellValue>>(name: &str, data: Vec<Vec<T>>) -> Result<Self> {
        let mut rows = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect::<Vec<CellValue>>());
        let header: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(CellValue::as_str).collect())
            .unwrap_or_default();

        let mut sheet = Sheet::with_columns(name, &header)?;
        for row in rows {
            sheet.row_append(row)?;
        }
        Ok(sheet)
    }

    /// Build a sheet from loader output, taking column names from the first
    /// row. Blank headers become `Unnamed: N` and repeats get `.1`, `.2`
    /// suffixes, so loading never fails on a messy header.
    pub(crate) fn from_raw_rows<I>(name: &str, raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<CellValue>>,
    {
        let mut raw = raw.into_iter();
        let header = raw.next().unwrap_or_default();

        let mut seen: HashMap<String, usize> = HashMap::new();
        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let base = match cell.as_str().trim() {
                    "" => format!("Unnamed: {idx}"),
                    text => text.to_string(),
                };
                let count = seen.entry(base.clone()).or_insert(0);
                let column = if *count == 0 {
                    base
                } else {
                    format!("{base}.{count}")
                };
                *count += 1;
                column
            })
            .collect();

        let mut sheet = Sheet::with_columns(name, &columns)?;
        for mut row in raw {
            // Trailing cells past the header are dropped
            row.truncate(sheet.col_count());
            sheet.row_append(row)?;
        }
        Ok(sheet)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the column names in order
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Check whether a column exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Get the column index by name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Get a cell by row and column index
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.col_count(),
            })
    }

    /// Get a cell by row index and column name
    pub fn get_by_name(&self, row: usize, col_name: &str) -> Result<&CellValue> {
        let col = self.column_index(col_name)?;
        self.get(row, col)
    }

    /// Append a data row. Short rows are padded with nulls.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if the row is wider than the header.
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        if data.len() > self.col_count() {
            return Err(SheetError::LengthMismatch {
                expected: self.col_count(),
                actual: data.len(),
            });
        }
        let mut row: Vec<CellValue> = data.into_iter().map(Into::into).collect();
        row.resize(self.col_count(), CellValue::Null);
        self.rows.push(row);
        Ok(())
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.rows.iter()
    }

    /// Iterate over the values of one column
    pub fn column_iter(&self, name: &str) -> Result<impl Iterator<Item = &CellValue>> {
        let col = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[col]))
    }

    /// Get a copy of one column's values by name
    pub fn column_by_name(&self, name: &str) -> Result<Vec<CellValue>> {
        Ok(self.column_iter(name)?.cloned().collect())
    }

    /// Apply a function to every value in a named column
    pub fn column_map_by_name<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&CellValue) -> CellValue,
    {
        let col = self.column_index(name)?;
        for row in &mut self.rows {
            row[col] = f(&row[col]);
        }
        Ok(())
    }

    /// Replace every value in a named column
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if `values` does not have one entry per row.
    pub fn column_update_by_name(&mut self, name: &str, values: Vec<CellValue>) -> Result<()> {
        let col = self.column_index(name)?;
        if values.len() != self.row_count() {
            return Err(SheetError::LengthMismatch {
                expected: self.row_count(),
                actual: values.len(),
            });
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[col] = value;
        }
        Ok(())
    }

    /// Copy of the first `n` rows
    #[must_use]
    pub fn head(&self, n: usize) -> Sheet {
        Sheet {
            name: self.name.clone(),
            columns: self.columns.clone(),
            column_index: self.column_index.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Convert rows to records keyed by column name
    #[must_use]
    pub fn to_records(&self) -> Vec<IndexMap<String, CellValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    // ===== Join Operations =====

    /// Left outer join with another sheet on a key column.
    ///
    /// Returns all rows from the left sheet, with matching rows from right.
    /// Non-matching rows have null values for right columns. Keys compare by
    /// their text rendering, so `1` and `1.0` match.
    pub fn left_join(&self, other: &Sheet, key: &str) -> Result<Sheet> {
        let left_key_idx = self
            .column_index
            .get(key)
            .copied()
            .ok_or_else(|| SheetError::JoinKeyNotFound {
                key: key.to_string(),
                sheet: self.name.clone(),
            })?;
        let right_key_idx = other
            .column_index
            .get(key)
            .copied()
            .ok_or_else(|| SheetError::JoinKeyNotFound {
                key: key.to_string(),
                sheet: other.name.clone(),
            })?;

        let mut right_map: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in other.rows.iter().enumerate() {
            right_map.entry(row[right_key_idx].as_str()).or_default().push(i);
        }

        // Result columns: left cols + right cols except key
        let mut result_names = self.columns.clone();
        let right_cols_to_add: Vec<(usize, String)> = other
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != right_key_idx)
            .map(|(i, name)| {
                let final_name = if self.columns.contains(name) {
                    format!("{name}_right")
                } else {
                    name.clone()
                };
                (i, final_name)
            })
            .collect();
        result_names.extend(right_cols_to_add.iter().map(|(_, name)| name.clone()));

        let mut result = Sheet::with_columns(&format!("{}_joined", self.name), &result_names)?;

        for left_row in &self.rows {
            let left_key_val = left_row[left_key_idx].as_str();

            if let Some(right_indices) = right_map.get(&left_key_val) {
                for &right_idx in right_indices {
                    let right_row = &other.rows[right_idx];
                    let mut new_row = left_row.clone();
                    for (col_idx, _) in &right_cols_to_add {
                        new_row.push(right_row[*col_idx].clone());
                    }
                    result.rows.push(new_row);
                }
            } else {
                let mut new_row = left_row.clone();
                new_row.resize(result_names.len(), CellValue::Null);
                result.rows.push(new_row);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employees() -> Sheet {
        Sheet::from_data(
            "Employees",
            vec![
                vec![CellValue::from("EmployeeID"), "Name".into()],
                vec![1.into(), "Alice".into()],
                vec![2.into(), "Bob".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_data_separates_header() {
        let sheet = employees();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.col_count(), 2);
        assert_eq!(sheet.column_names(), ["EmployeeID", "Name"]);
        assert_eq!(
            sheet.get_by_name(1, "Name").unwrap(),
            &CellValue::String("Bob".to_string())
        );
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = Sheet::with_columns("t", &["a", "a"]);
        assert!(matches!(
            result,
            Err(SheetError::DuplicateColumnName { name }) if name == "a"
        ));
    }

    #[test]
    fn test_from_raw_rows_cleans_header() {
        let sheet = Sheet::from_raw_rows(
            "raw",
            vec![
                vec![CellValue::from("x"), CellValue::Null, "x".into()],
                vec![1.into(), 2.into(), 3.into(), 4.into()],
            ],
        )
        .unwrap();
        assert_eq!(sheet.column_names(), ["x", "Unnamed: 1", "x.1"]);
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.get(0, 2).unwrap(), &CellValue::Int(3));
    }

    #[test]
    fn test_row_append_pads_short_rows() {
        let mut sheet = Sheet::with_columns("t", &["a", "b", "c"]).unwrap();
        sheet.row_append(vec![1]).unwrap();
        assert_eq!(sheet.get(0, 2).unwrap(), &CellValue::Null);

        let too_wide = sheet.row_append(vec![1, 2, 3, 4]);
        assert!(matches!(too_wide, Err(SheetError::LengthMismatch { .. })));
    }

    #[test]
    fn test_column_map_and_update() {
        let mut sheet = employees();
        sheet
            .column_map_by_name("Name", |v| CellValue::String(v.as_str().to_uppercase()))
            .unwrap();
        assert_eq!(sheet.get_by_name(0, "Name").unwrap().as_str(), "ALICE");

        sheet
            .column_update_by_name("EmployeeID", vec![CellValue::Int(7), CellValue::Int(8)])
            .unwrap();
        assert_eq!(sheet.get_by_name(1, "EmployeeID").unwrap(), &CellValue::Int(8));
    }

    #[test]
    fn test_left_join_keeps_unmatched_and_duplicates() {
        let left = employees();
        let right = Sheet::from_data(
            "Sales",
            vec![
                vec![CellValue::from("SaleID"), "EmployeeID".into(), "Name".into()],
                vec![101.into(), 1.0.into(), "x".into()],
                vec![102.into(), 1.into(), "y".into()],
            ],
        )
        .unwrap();

        let joined = left.left_join(&right, "EmployeeID").unwrap();
        assert_eq!(
            joined.column_names(),
            ["EmployeeID", "Name", "SaleID", "Name_right"]
        );
        assert_eq!(joined.row_count(), 3);
        assert_eq!(joined.get_by_name(1, "SaleID").unwrap(), &CellValue::Int(102));
        assert_eq!(joined.get_by_name(2, "Name").unwrap().as_str(), "Bob");
        assert!(joined.get_by_name(2, "SaleID").unwrap().is_null());
    }

    #[test]
    fn test_left_join_missing_key() {
        let left = employees();
        let right = Sheet::with_columns("Other", &["Id"]).unwrap();
        let err = left.left_join(&right, "EmployeeID").unwrap_err();
        assert!(matches!(err, SheetError::JoinKeyNotFound { sheet, .. } if sheet == "Other"));
    }

    #[test]
    fn test_head_and_records() {
        let sheet = employees();
        let records = sheet.head(1).to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Name"], CellValue::String("Alice".to_string()));
    }
}
