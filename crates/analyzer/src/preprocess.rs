//! Value normalization applied once after classification.

use crate::classify::ColumnClassification;
use tabsage_sheet::{CellValue, Sheet};

/// Coerce numeric columns to numbers and trim text in categorical columns.
///
/// Never fails: values that cannot be read as numbers become `Null`.
pub fn preprocess(sheet: &mut Sheet, classification: &ColumnClassification) {
    for column in &classification.numeric {
        if let Err(e) = sheet.column_map_by_name(column, coerce_numeric) {
            tracing::warn!(table = sheet.name(), column = %column, "skipping numeric coercion: {e}");
        }
    }
    for column in &classification.categorical {
        if let Err(e) = sheet.column_map_by_name(column, trim_text) {
            tracing::warn!(table = sheet.name(), column = %column, "skipping text trim: {e}");
        }
    }
}

/// Numeric coercion with invalid values mapped to missing.
pub fn coerce_numeric(value: &CellValue) -> CellValue {
    match value {
        CellValue::Int(_) => value.clone(),
        CellValue::Float(f) if f.is_nan() => CellValue::Null,
        CellValue::Float(_) => value.clone(),
        CellValue::Bool(b) => CellValue::Int(i64::from(*b)),
        CellValue::String(s) => match CellValue::parse(s) {
            parsed @ (CellValue::Int(_) | CellValue::Float(_)) => parsed,
            _ => CellValue::Null,
        },
        CellValue::Null | CellValue::Date(_) => CellValue::Null,
    }
}

fn trim_text(value: &CellValue) -> CellValue {
    match value {
        CellValue::String(s) => CellValue::String(s.trim().to_string()),
        other => other.clone(),
    }
}
