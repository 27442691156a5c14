//! Column classification.
//!
//! Every column lands in exactly one of numeric, categorical, or date. The
//! `id` tag is independent of that partition.

use serde::Serialize;
use tabsage_sheet::{CellValue, Sheet};

/// Semantic kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Date,
}

/// Column names of one table grouped by kind, plus the `id` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub date: Vec<String>,
    pub id: Vec<String>,
}

impl ColumnClassification {
    /// The kind a column was classified as, if the column is known.
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        let contains = |names: &[String]| names.iter().any(|n| n == column);
        if contains(&self.numeric) {
            Some(ColumnKind::Numeric)
        } else if contains(&self.categorical) {
            Some(ColumnKind::Categorical)
        } else if contains(&self.date) {
            Some(ColumnKind::Date)
        } else {
            None
        }
    }

    /// Whether the column carries the `id` tag.
    pub fn is_id(&self, column: &str) -> bool {
        self.id.iter().any(|n| n == column)
    }

    fn push(&mut self, column: &str, kind: ColumnKind) {
        let bucket = match kind {
            ColumnKind::Numeric => &mut self.numeric,
            ColumnKind::Categorical => &mut self.categorical,
            ColumnKind::Date => &mut self.date,
        };
        bucket.push(column.to_string());
    }
}

/// Name-based id heuristic: contains "id" but not "idea", case-insensitive.
///
/// This is a plain substring test, so names such as "Valid" are tagged too.
pub fn is_id_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("id") && !lower.contains("idea")
}

/// Classify every column of `sheet` in column order.
///
/// Text columns whose every non-null value parses as a date are rewritten in
/// place to hold `CellValue::Date`.
pub fn classify_sheet(sheet: &mut Sheet) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    let columns = sheet.column_names().to_vec();

    for column in &columns {
        let kind = classify_column(sheet, column);
        tracing::debug!(table = sheet.name(), column = %column, ?kind, "classified column");
        classification.push(column, kind);

        if is_id_column(column) {
            classification.id.push(column.clone());
        }
    }

    classification
}

fn classify_column(sheet: &mut Sheet, column: &str) -> ColumnKind {
    let Ok(values) = sheet.column_by_name(column) else {
        return ColumnKind::Categorical;
    };
    let present = || values.iter().filter(|v| !v.is_null());

    // A column of flags counts as numeric; flags mixed with numbers do not.
    if present().all(CellValue::is_number)
        || present().all(|v| matches!(v, CellValue::Bool(_)))
    {
        return ColumnKind::Numeric;
    }
    if present().all(CellValue::is_date) {
        return ColumnKind::Date;
    }

    let coerced: Option<Vec<CellValue>> = values
        .iter()
        .map(|value| match value {
            CellValue::Null => Some(CellValue::Null),
            CellValue::String(_) | CellValue::Date(_) => value.as_date().map(CellValue::Date),
            _ => None,
        })
        .collect();

    match coerced.map(|dates| sheet.column_update_by_name(column, dates)) {
        Some(Ok(())) => ColumnKind::Date,
        _ => ColumnKind::Categorical,
    }
}
