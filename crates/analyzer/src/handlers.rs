//! Route handlers.
//!
//! Each handler reads the preprocessed tables and returns `None` when the
//! data it needs is missing: an absent table or column, an entity the
//! question does not name, or no row matching it.

use crate::analyzer::Analyzer;
use crate::extract::{Extract, NumberAfter};
use crate::result::QueryResult;
use crate::router::Question;
use crate::schema::{
    COMMENTS, DEPARTMENT, EMPLOYEES, EMPLOYEE_ID, FEEDBACK, FEEDBACK_ID, FEEDBACK_SCORE,
    HIRE_DATE, MONTH, NAME, SALARY, SALES, SALES_AMOUNT, SALE_ID,
};
use chrono::Datelike;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::sync::OnceLock;
use tabsage_sheet::{CellValue, Sheet};

static YEAR_AFTER_BEFORE: OnceLock<NumberAfter> = OnceLock::new();
static SALE_ID_NUMBER: OnceLock<NumberAfter> = OnceLock::new();

/// Fixed reporting month: (year, month, label).
const FEBRUARY: (i32, u32, &str) = (2025, 2, "February 2025");
const JANUARY: (i32, u32, &str) = (2025, 1, "January 2025");

type Row = [CellValue];

fn col(sheet: &Sheet, name: &str) -> Option<usize> {
    sheet.column_index(name).ok()
}

/// Keys compare numerically when both sides are numbers, by text otherwise.
fn same_key(a: &CellValue, b: &CellValue) -> bool {
    if a.is_null() || b.is_null() {
        return false;
    }
    match (a.as_float(), b.as_float()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a.as_str() == b.as_str(),
    }
}

/// Whether a `Month` cell falls in the given year-month. Dates compare by
/// calendar fields, text by its `YYYY-MM` prefix.
fn in_month(cell: &CellValue, year: i32, month: u32) -> bool {
    match cell {
        CellValue::Date(dt) => dt.year() == year && dt.month() == month,
        CellValue::String(s) => s.trim().starts_with(&format!("{year:04}-{month:02}")),
        _ => false,
    }
}

fn first_row_where<'a>(
    sheet: &'a Sheet,
    col: usize,
    pred: impl Fn(&CellValue) -> bool,
) -> Option<&'a Row> {
    sheet.rows().find(|row| pred(&row[col])).map(Vec::as_slice)
}

/// First item holding the largest value.
fn first_max<T>(items: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    items.into_iter().fold(None, |best, (item, value)| match best {
        Some((_, top)) if top >= value => best,
        _ => Some((item, value)),
    })
}

/// First item holding the smallest value.
fn first_min<T>(items: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    items.into_iter().fold(None, |best, (item, value)| match best {
        Some((_, low)) if low <= value => best,
        _ => Some((item, value)),
    })
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Group keys order numbers numerically, dates chronologically, and
/// anything else by text.
fn key_order(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        _ => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) if a.is_number() && b.is_number() => x.total_cmp(&y),
            _ => a.as_str().cmp(&b.as_str()),
        },
    }
}

/// Rows grouped by the text of a key column, sorted by key. Rows with a null
/// key are dropped.
///
/// With sorted groups, `first_max`/`first_min` resolve a tie to the
/// smallest key.
fn group_rows<'a>(sheet: &'a Sheet, key: usize) -> IndexMap<String, (&'a CellValue, Vec<&'a Row>)> {
    let mut groups: IndexMap<String, (&CellValue, Vec<&Row>)> = IndexMap::new();
    for row in sheet.rows() {
        let cell = &row[key];
        if cell.is_null() {
            continue;
        }
        groups
            .entry(cell.as_str())
            .or_insert_with(|| (cell, Vec::new()))
            .1
            .push(row.as_slice());
    }
    groups.sort_by(|_, (a, _), _, (b, _)| key_order(a, b));
    groups
}

/// The Employees row for a name the question mentions.
fn named_employee<'a>(analyzer: &'a Analyzer, question: &Question) -> Option<(String, &'a Row)> {
    let name = analyzer.names().extract(&question.raw)?;
    let employees = analyzer.table(EMPLOYEES)?;
    let name_col = col(employees, NAME)?;
    let row = first_row_where(employees, name_col, |cell| cell.as_str() == name)?;
    Some((name, row))
}

fn employee_name_for(analyzer: &Analyzer, id: &CellValue) -> Option<String> {
    let employees = analyzer.table(EMPLOYEES)?;
    let row = first_row_where(employees, col(employees, EMPLOYEE_ID)?, |cell| same_key(cell, id))?;
    Some(row[col(employees, NAME)?].as_str())
}

fn salaries(employees: &Sheet) -> Option<impl Iterator<Item = f64> + '_> {
    let salary = col(employees, SALARY)?;
    Some(employees.rows().filter_map(move |row| row[salary].as_float()))
}

pub fn department_count(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    let department = analyzer.departments().extract(&question.raw)?;
    let employees = analyzer.table(EMPLOYEES)?;
    let (dept_col, name_col) = (col(employees, DEPARTMENT)?, col(employees, NAME)?);

    let names: Vec<String> = employees
        .rows()
        .filter(|row| row[dept_col].as_str() == department)
        .map(|row| row[name_col].as_str())
        .collect();

    Some(QueryResult::DepartmentCount {
        department,
        count: names.len(),
        names,
    })
}

pub fn employee_salary(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    let (name, row) = named_employee(analyzer, question)?;
    let employees = analyzer.table(EMPLOYEES)?;
    let salary = row[col(employees, SALARY)?].as_float()?;
    Some(QueryResult::EmployeeSalary { name, salary })
}

pub fn highest_salary(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let employees = analyzer.table(EMPLOYEES)?;
    let (salary, name, dept) = (
        col(employees, SALARY)?,
        col(employees, NAME)?,
        col(employees, DEPARTMENT)?,
    );

    let (row, top) = first_max(
        employees
            .rows()
            .filter_map(|row| row[salary].as_float().map(|value| (row, value))),
    )?;

    Some(QueryResult::HighestSalary {
        name: row[name].as_str(),
        salary: top,
        department: row[dept].as_str(),
    })
}

fn sales_in_month(analyzer: &Analyzer, year: i32, month: u32) -> Option<Vec<&Row>> {
    let sales = analyzer.table(SALES)?;
    let month_col = col(sales, MONTH)?;
    Some(
        sales
            .rows()
            .filter(|row| in_month(&row[month_col], year, month))
            .map(Vec::as_slice)
            .collect(),
    )
}

pub fn sales_count(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let (year, month, label) = FEBRUARY;
    let sale_id = col(analyzer.table(SALES)?, SALE_ID)?;
    let rows = sales_in_month(analyzer, year, month)?;

    Some(QueryResult::SalesCount {
        month: label.to_string(),
        count: rows.len(),
        sale_ids: rows.iter().map(|row| row[sale_id].clone()).collect(),
    })
}

pub fn recent_hire(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let employees = analyzer.table(EMPLOYEES)?;
    let (hired, name, dept) = (
        col(employees, HIRE_DATE)?,
        col(employees, NAME)?,
        col(employees, DEPARTMENT)?,
    );

    let mut latest: Option<(&Row, chrono::NaiveDateTime)> = None;
    for row in employees.rows() {
        let Some(date) = row[hired].as_date() else {
            continue;
        };
        if latest.map_or(true, |(_, best)| date > best) {
            latest = Some((row, date));
        }
    }
    let (row, hire_date) = latest?;

    Some(QueryResult::RecentHire {
        name: row[name].as_str(),
        hire_date,
        department: row[dept].as_str(),
    })
}

pub fn feedback_score(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    let (name, employee) = named_employee(analyzer, question)?;
    let id = &employee[col(analyzer.table(EMPLOYEES)?, EMPLOYEE_ID)?];

    let feedback = analyzer.table(FEEDBACK)?;
    let entry = first_row_where(feedback, col(feedback, EMPLOYEE_ID)?, |cell| {
        same_key(cell, id)
    })?;

    Some(QueryResult::FeedbackScore {
        name,
        score: entry[col(feedback, FEEDBACK_SCORE)?].clone(),
        comment: entry[col(feedback, COMMENTS)?].as_str(),
    })
}

pub fn employee_department(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    let (name, row) = named_employee(analyzer, question)?;
    let department = row[col(analyzer.table(EMPLOYEES)?, DEPARTMENT)?].as_str();
    Some(QueryResult::EmployeeDepartment { name, department })
}

pub fn sale_amount(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    if !question.has_compact("saleid") {
        return None;
    }
    let sale_id = SALE_ID_NUMBER
        .get_or_init(|| NumberAfter::new("saleid"))
        .extract(&question.compact)?;

    let sales = analyzer.table(SALES)?;
    let row = first_row_where(sales, col(sales, SALE_ID)?, |cell| {
        cell.as_float() == Some(sale_id as f64)
    })?;
    let amount = row[col(sales, SALES_AMOUNT)?].as_float()?;

    Some(QueryResult::SaleAmount { sale_id, amount })
}

pub fn needs_improvement(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let feedback = analyzer.table(FEEDBACK)?;
    let entry = first_row_where(feedback, col(feedback, COMMENTS)?, |cell| {
        cell.as_str().to_lowercase().contains("needs improvement")
    })?;
    let name = employee_name_for(analyzer, &entry[col(feedback, EMPLOYEE_ID)?])?;

    Some(QueryResult::NeedsImprovement {
        name,
        feedback_id: entry[col(feedback, FEEDBACK_ID)?].clone(),
    })
}

pub fn total_sales(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let (year, month, label) = JANUARY;
    let amount = col(analyzer.table(SALES)?, SALES_AMOUNT)?;
    let total: f64 = sales_in_month(analyzer, year, month)?
        .iter()
        .filter_map(|row| row[amount].as_float())
        .sum();

    Some(QueryResult::TotalSales {
        month: label.to_string(),
        total,
    })
}

pub fn top_sales_employee(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let view = analyzer.relationships().employee_sales.as_ref()?;
    let (name, amount) = (col(view, NAME)?, col(view, SALES_AMOUNT)?);

    let totals = group_rows(view, name).into_iter().map(|(key, (_, rows))| {
        let total: f64 = rows.iter().map(|row| row[amount].as_float().unwrap_or(0.0)).sum();
        (key, total)
    });
    let (name, total_sales) = first_max(totals)?;

    Some(QueryResult::TopSalesEmployee { name, total_sales })
}

pub fn avg_salary(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    let department = analyzer.departments().extract(&question.raw)?;
    let employees = analyzer.table(EMPLOYEES)?;
    let (dept, salary) = (col(employees, DEPARTMENT)?, col(employees, SALARY)?);

    let average = mean(
        employees
            .rows()
            .filter(|row| row[dept].as_str() == department)
            .filter_map(|row| row[salary].as_float()),
    )?;

    Some(QueryResult::AvgSalary {
        department,
        average,
    })
}

pub fn feedback_count(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    const SCORE: i64 = 5;
    if !question.raw.contains('5') {
        return None;
    }
    let feedback = analyzer.table(FEEDBACK)?;
    let score = col(feedback, FEEDBACK_SCORE)?;
    let count = feedback
        .rows()
        .filter(|row| row[score].as_float() == Some(SCORE as f64))
        .count();

    Some(QueryResult::FeedbackCount {
        score: SCORE,
        count,
    })
}

pub fn total_payroll(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let total: f64 = salaries(analyzer.table(EMPLOYEES)?)?.sum();
    Some(QueryResult::TotalPayroll { total })
}

pub fn top_sales_month(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let sales = analyzer.table(SALES)?;
    let (month, amount) = (col(sales, MONTH)?, col(sales, SALES_AMOUNT)?);

    let totals = group_rows(sales, month).into_values().map(|(key, rows)| {
        let total: f64 = rows.iter().filter_map(|row| row[amount].as_float()).sum();
        (key, total)
    });
    let (month, total) = first_max(totals)?;

    Some(QueryResult::TopSalesMonth {
        month: month.clone(),
        total,
    })
}

pub fn avg_feedback(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let feedback = analyzer.table(FEEDBACK)?;
    let score = col(feedback, FEEDBACK_SCORE)?;
    let average = mean(feedback.rows().filter_map(|row| row[score].as_float()))?;
    Some(QueryResult::AvgFeedback { average })
}

pub fn lowest_avg_salary(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let employees = analyzer.table(EMPLOYEES)?;
    let (dept, salary) = (col(employees, DEPARTMENT)?, col(employees, SALARY)?);

    let averages = group_rows(employees, dept)
        .into_iter()
        .filter_map(|(key, (_, rows))| {
            mean(rows.iter().filter_map(|row| row[salary].as_float())).map(|avg| (key, avg))
        });
    let (department, average) = first_min(averages)?;

    Some(QueryResult::LowestAvgSalary {
        department,
        average,
    })
}

pub fn employees_before_year(analyzer: &Analyzer, question: &Question) -> Option<QueryResult> {
    let year = YEAR_AFTER_BEFORE
        .get_or_init(|| NumberAfter::new("before"))
        .extract(&question.lower)?;
    let employees = analyzer.table(EMPLOYEES)?;
    let (hired, name) = (col(employees, HIRE_DATE)?, col(employees, NAME)?);

    let names: Vec<String> = employees
        .rows()
        .filter(|row| {
            row[hired]
                .as_date()
                .is_some_and(|date| i64::from(date.year()) < year)
        })
        .map(|row| row[name].as_str())
        .collect();

    Some(QueryResult::EmployeesBeforeYear {
        year,
        count: names.len(),
        names,
    })
}

pub fn most_feedback(analyzer: &Analyzer, _question: &Question) -> Option<QueryResult> {
    let feedback = analyzer.table(FEEDBACK)?;
    let counts = group_rows(feedback, col(feedback, EMPLOYEE_ID)?)
        .into_values()
        .map(|(id, rows)| (id, rows.len() as f64));
    let (id, count) = first_max(counts)?;
    let name = employee_name_for(analyzer, id)?;

    Some(QueryResult::MostFeedback {
        name,
        count: count as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_same_key_numeric_and_text() {
        assert!(same_key(&CellValue::Int(1), &CellValue::Float(1.0)));
        assert!(same_key(&"E1".into(), &"E1".into()));
        assert!(!same_key(&CellValue::Int(1), &CellValue::Int(2)));
        assert!(!same_key(&CellValue::Null, &CellValue::Null));
    }

    #[test]
    fn test_in_month() {
        let feb = NaiveDate::from_ymd_opt(2025, 2, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(in_month(&CellValue::Date(feb), 2025, 2));
        assert!(!in_month(&CellValue::Date(feb), 2025, 1));
        assert!(in_month(&"2025-02".into(), 2025, 2));
        assert!(!in_month(&"2024-02".into(), 2025, 2));
        assert!(!in_month(&CellValue::Int(202502), 2025, 2));
    }

    #[test]
    fn test_first_max_and_min_keep_first_tie() {
        let items = [("a", 2.0), ("b", 5.0), ("c", 5.0), ("d", 1.0)];
        assert_eq!(first_max(items), Some(("b", 5.0)));
        assert_eq!(first_min([("x", 1.0), ("y", 1.0)]), Some(("x", 1.0)));
        assert_eq!(first_max(Vec::<(&str, f64)>::new()), None);
    }

    #[test]
    fn test_mean_handles_empty() {
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_group_rows_sorted_by_key() {
        let sheet = Sheet::from_data(
            "Sales",
            vec![
                vec![CellValue::from("Month"), "SalesAmount".into()],
                vec!["2025-02".into(), 10.0.into()],
                vec!["2025-01".into(), 5.0.into()],
                vec![CellValue::Null, 1.0.into()],
                vec!["2025-02".into(), 3.0.into()],
            ],
        )
        .unwrap();

        let groups = group_rows(&sheet, 0);
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2025-01", "2025-02"]);
        assert_eq!(groups["2025-02"].1.len(), 2);
    }

    #[test]
    fn test_key_order_by_kind() {
        // 10 sorts after 9 as a number, before it as text
        assert_eq!(key_order(&CellValue::Int(10), &CellValue::Int(9)), Ordering::Greater);
        assert_eq!(key_order(&"10".into(), &"9".into()), Ordering::Less);

        let day = |d| {
            CellValue::Date(
                NaiveDate::from_ymd_opt(2025, 1, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
        };
        assert_eq!(key_order(&day(20), &day(5)), Ordering::Greater);
        assert_eq!(key_order(&"Amy".into(), &"Zed".into()), Ordering::Less);
    }
}
