//! Derived views joining Employees with Sales and Feedback.

use crate::schema::{EMPLOYEES, EMPLOYEE_ID, FEEDBACK, SALES};
use tabsage_sheet::{Book, Sheet, SheetError};

/// The two fixed relationship views. A view is present only when both of
/// its source tables are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationships {
    pub employee_sales: Option<Sheet>,
    pub employee_feedback: Option<Sheet>,
}

impl Relationships {
    /// Number of views that were built.
    pub fn len(&self) -> usize {
        usize::from(self.employee_sales.is_some()) + usize::from(self.employee_feedback.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build every view whose source tables exist, left-joined on `EmployeeID`
/// and anchored at Employees.
///
/// # Errors
///
/// Fails if both tables exist but one lacks the `EmployeeID` key column.
pub fn build_relationships(book: &Book) -> Result<Relationships, SheetError> {
    Ok(Relationships {
        employee_sales: join_with_employees(book, SALES, "employee_sales")?,
        employee_feedback: join_with_employees(book, FEEDBACK, "employee_feedback")?,
    })
}

fn join_with_employees(
    book: &Book,
    other: &str,
    view_name: &str,
) -> Result<Option<Sheet>, SheetError> {
    let (Ok(employees), Ok(right)) = (book.get_sheet(EMPLOYEES), book.get_sheet(other)) else {
        return Ok(None);
    };

    let mut view = employees.left_join(right, EMPLOYEE_ID)?;
    view.set_name(view_name);
    tracing::debug!(view = view_name, rows = view.row_count(), "built relationship view");
    Ok(Some(view))
}
