//! Human-readable rendering of query results.

use crate::result::QueryResult;
use tabsage_sheet::date::format_date;
use tabsage_sheet::CellValue;

/// Render a result as an `Answer: ...` line. `Unhandled` has no rendering.
pub fn format_result(result: &QueryResult) -> Option<String> {
    let text = match result {
        QueryResult::DepartmentCount {
            department,
            count,
            names,
        } => format!(
            "Answer: {count} employees in {department} department: {}",
            names.join(", ")
        ),
        QueryResult::EmployeeSalary { name, salary } => {
            format!("Answer: {name}'s salary is {}", format_currency(*salary))
        }
        QueryResult::HighestSalary {
            name,
            salary,
            department,
        } => format!(
            "Answer: {name} has the highest salary ({}) in {department} department",
            format_currency(*salary)
        ),
        QueryResult::SalesCount {
            month,
            count,
            sale_ids,
        } => format!(
            "Answer: {count} sales in {month} (SaleIDs: {})",
            join_cells(sale_ids)
        ),
        QueryResult::RecentHire {
            name,
            hire_date,
            department,
        } => format!(
            "Answer: {name} was hired most recently on {} in {department} department",
            format_date(hire_date)
        ),
        QueryResult::FeedbackScore {
            name,
            score,
            comment,
        } => format!("Answer: {name}'s FeedbackScore is {score} ({comment})"),
        QueryResult::EmployeeDepartment { name, department } => {
            format!("Answer: {name} belongs to {department} department")
        }
        QueryResult::SaleAmount { sale_id, amount } => format!(
            "Answer: SalesAmount for SaleID {sale_id} is {}",
            format_currency(*amount)
        ),
        QueryResult::NeedsImprovement { name, feedback_id } => format!(
            "Answer: {name} received 'Needs Improvement' feedback (FeedbackID: {feedback_id})"
        ),
        QueryResult::TotalSales { month, total } => format!(
            "Answer: Total sales for {month} is {}",
            format_currency(*total)
        ),
        QueryResult::TopSalesEmployee { name, total_sales } => format!(
            "Answer: {name} has the highest total sales ({})",
            format_currency(*total_sales)
        ),
        QueryResult::AvgSalary {
            department,
            average,
        } => format!(
            "Answer: Average salary in {department} department is {}",
            format_currency(*average)
        ),
        QueryResult::FeedbackCount { score, count } => {
            format!("Answer: {count} employees have FeedbackScore of {score}")
        }
        QueryResult::TotalPayroll { total } => format!(
            "Answer: Total payroll expense is {}",
            format_currency(*total)
        ),
        QueryResult::TopSalesMonth { month, total } => format!(
            "Answer: {month} had the highest total sales ({})",
            format_currency(*total)
        ),
        QueryResult::AvgFeedback { average } => {
            format!("Answer: Average FeedbackScore across all employees is {average:.2}")
        }
        QueryResult::LowestAvgSalary {
            department,
            average,
        } => format!(
            "Answer: {department} department has the lowest average salary ({})",
            format_currency(*average)
        ),
        QueryResult::EmployeesBeforeYear { year, count, names } => format!(
            "Answer: {count} employees were hired before {year}: {}",
            names.join(", ")
        ),
        QueryResult::MostFeedback { name, count } => {
            format!("Answer: {name} has the most feedback entries ({count})")
        }
        QueryResult::Unhandled { .. } => return None,
    };
    Some(text)
}

/// `$` followed by the amount with two decimals and thousands separators,
/// e.g. `$1,234,567.50`. The sign goes after the dollar sign.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("${}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let grouped: String = out.chars().rev().collect();
    format!("{sign}{grouped}")
}

fn join_cells(cells: &[CellValue]) -> String {
    cells
        .iter()
        .map(CellValue::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
