//! Table and column names the route handlers and relationship views expect.

pub const EMPLOYEES: &str = "Employees";
pub const SALES: &str = "Sales";
pub const FEEDBACK: &str = "Feedback";

/// Name given to the single table loaded from a CSV file.
pub const CSV_TABLE: &str = "data";

pub const EMPLOYEE_ID: &str = "EmployeeID";
pub const NAME: &str = "Name";
pub const DEPARTMENT: &str = "Department";
pub const SALARY: &str = "Salary";
pub const HIRE_DATE: &str = "HireDate";

pub const SALE_ID: &str = "SaleID";
pub const MONTH: &str = "Month";
pub const SALES_AMOUNT: &str = "SalesAmount";

pub const FEEDBACK_ID: &str = "FeedbackID";
pub const FEEDBACK_SCORE: &str = "FeedbackScore";
pub const COMMENTS: &str = "Comments";
