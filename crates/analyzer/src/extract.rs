//! Entity extraction from free-text questions.
//!
//! Extractors are plain substring and regex matchers. They sit
//! behind [`Extract`] so a smarter matcher can replace one without touching
//! the router.

use regex::Regex;
use tabsage_sheet::Sheet;

/// Pull one value out of a question, if present.
pub trait Extract: Send + Sync {
    type Output;

    fn extract(&self, question: &str) -> Option<Self::Output>;
}

/// Matches a question against a fixed list of known values.
///
/// The first value (in list order) whose lower-cased form occurs in the
/// lower-cased question wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownValues {
    values: Vec<String>,
}

impl KnownValues {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known = KnownValues::default();
        for value in values {
            let value = value.into();
            if !value.is_empty() && !known.values.contains(&value) {
                known.values.push(value);
            }
        }
        known
    }

    /// Distinct non-null values of a column, in order of first appearance.
    /// A missing sheet or column yields an empty matcher.
    pub fn from_column(sheet: Option<&Sheet>, column: &str) -> Self {
        let Some(values) = sheet.and_then(|s| s.column_iter(column).ok()) else {
            return KnownValues::default();
        };
        KnownValues::new(values.filter(|v| !v.is_null()).map(|v| v.as_str()))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Extract for KnownValues {
    type Output = String;

    fn extract(&self, question: &str) -> Option<String> {
        let question = question.to_lowercase();
        self.values
            .iter()
            .find(|value| question.contains(&value.to_lowercase()))
            .cloned()
    }
}

/// Captures the digits that follow a keyword, e.g. `before 2024`.
#[derive(Debug, Clone)]
pub struct NumberAfter {
    pattern: Regex,
}

impl NumberAfter {
    pub fn new(keyword: &str) -> Self {
        let pattern = Regex::new(&format!(r"{}\s*(\d+)", regex::escape(keyword)))
            .expect("escaped keyword is a valid regex");
        NumberAfter { pattern }
    }
}

impl Extract for NumberAfter {
    type Output = i64;

    fn extract(&self, question: &str) -> Option<i64> {
        self.pattern
            .captures(question)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsage_sheet::CellValue;

    #[test]
    fn test_known_values_first_match_wins() {
        let departments = KnownValues::new(["Sales", "Engineering", "HR"]);
        assert_eq!(
            departments.extract("How many employees in SALES department?"),
            Some("Sales".to_string())
        );
        assert_eq!(
            departments.extract("hr and engineering"),
            Some("Engineering".to_string())
        );
        assert_eq!(departments.extract("Marketing"), None);
    }

    #[test]
    fn test_known_values_from_column() {
        let sheet = Sheet::from_data(
            "Employees",
            vec![
                vec![CellValue::from("Department")],
                vec!["Sales".into()],
                vec![CellValue::Null],
                vec!["HR".into()],
                vec!["Sales".into()],
            ],
        )
        .unwrap();

        let known = KnownValues::from_column(Some(&sheet), "Department");
        assert_eq!(known.values(), ["Sales", "HR"]);
        assert!(KnownValues::from_column(Some(&sheet), "Name").values().is_empty());
        assert!(KnownValues::from_column(None, "Department").values().is_empty());
    }

    #[test]
    fn test_number_after_keyword() {
        let year = NumberAfter::new("before");
        assert_eq!(year.extract("who was hired before 2024?"), Some(2024));
        assert_eq!(year.extract("hired before2023"), Some(2023));
        assert_eq!(year.extract("hired before last year"), None);

        let sale = NumberAfter::new("saleid");
        assert_eq!(sale.extract("salesamountforsaleid105?"), Some(105));
    }

    #[test]
    fn test_number_after_keyword_is_literal() {
        let code = NumberAfter::new("no.(");
        assert_eq!(code.extract("ticket no.( 42"), Some(42));
        assert_eq!(code.extract("ticket nox( 42"), None);
    }
}
