use chrono::NaiveDateTime;
use serde::Serialize;
use tabsage_sheet::CellValue;

/// Structured answer produced by one route handler.
///
/// Serializes with a `type` discriminator (`department_count`, ...), which is
/// also what [`QueryResult::tag`] returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    DepartmentCount {
        department: String,
        count: usize,
        names: Vec<String>,
    },
    EmployeeSalary {
        name: String,
        salary: f64,
    },
    HighestSalary {
        name: String,
        salary: f64,
        department: String,
    },
    SalesCount {
        month: String,
        count: usize,
        sale_ids: Vec<CellValue>,
    },
    RecentHire {
        name: String,
        hire_date: NaiveDateTime,
        department: String,
    },
    FeedbackScore {
        name: String,
        score: CellValue,
        comment: String,
    },
    EmployeeDepartment {
        name: String,
        department: String,
    },
    SaleAmount {
        sale_id: i64,
        amount: f64,
    },
    NeedsImprovement {
        name: String,
        feedback_id: CellValue,
    },
    TotalSales {
        month: String,
        total: f64,
    },
    TopSalesEmployee {
        name: String,
        total_sales: f64,
    },
    AvgSalary {
        department: String,
        average: f64,
    },
    FeedbackCount {
        score: i64,
        count: usize,
    },
    TotalPayroll {
        total: f64,
    },
    TopSalesMonth {
        month: CellValue,
        total: f64,
    },
    AvgFeedback {
        average: f64,
    },
    LowestAvgSalary {
        department: String,
        average: f64,
    },
    EmployeesBeforeYear {
        year: i64,
        count: usize,
        names: Vec<String>,
    },
    MostFeedback {
        name: String,
        count: usize,
    },
    /// No route matched, or the matched handler could not find its data.
    Unhandled {
        question: String,
    },
}

impl QueryResult {
    /// The result's type discriminator.
    pub fn tag(&self) -> &'static str {
        match self {
            QueryResult::DepartmentCount { .. } => "department_count",
            QueryResult::EmployeeSalary { .. } => "employee_salary",
            QueryResult::HighestSalary { .. } => "highest_salary",
            QueryResult::SalesCount { .. } => "sales_count",
            QueryResult::RecentHire { .. } => "recent_hire",
            QueryResult::FeedbackScore { .. } => "feedback_score",
            QueryResult::EmployeeDepartment { .. } => "employee_department",
            QueryResult::SaleAmount { .. } => "sale_amount",
            QueryResult::NeedsImprovement { .. } => "needs_improvement",
            QueryResult::TotalSales { .. } => "total_sales",
            QueryResult::TopSalesEmployee { .. } => "top_sales_employee",
            QueryResult::AvgSalary { .. } => "avg_salary",
            QueryResult::FeedbackCount { .. } => "feedback_count",
            QueryResult::TotalPayroll { .. } => "total_payroll",
            QueryResult::TopSalesMonth { .. } => "top_sales_month",
            QueryResult::AvgFeedback { .. } => "avg_feedback",
            QueryResult::LowestAvgSalary { .. } => "lowest_avg_salary",
            QueryResult::EmployeesBeforeYear { .. } => "employees_before_year",
            QueryResult::MostFeedback { .. } => "most_feedback",
            QueryResult::Unhandled { .. } => "unhandled",
        }
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, QueryResult::Unhandled { .. })
    }

    pub(crate) fn unhandled(question: &str) -> Self {
        QueryResult::Unhandled {
            question: question.to_string(),
        }
    }
}
