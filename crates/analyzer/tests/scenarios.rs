//! End-to-end question answering over a small company dataset.

use rust_xlsxwriter::Workbook;
use tabsage_analyzer::handlers;
use tabsage_analyzer::{
    format_result, Analyzer, ColumnKind, Extract, KnownValues, QueryResult, Question,
};
use tabsage_sheet::{Book, CellValue, Sheet};
use tempfile::tempdir;

fn table(name: &str, rows: Vec<Vec<CellValue>>) -> Sheet {
    Sheet::from_data(name, rows).unwrap()
}

fn header(names: &[&str]) -> Vec<CellValue> {
    names.iter().map(|n| CellValue::from(*n)).collect()
}

fn employees() -> Sheet {
    table(
        "Employees",
        vec![
            header(&["EmployeeID", "Name", "Department", "Salary", "HireDate"]),
            vec![1.into(), "Alice".into(), "Sales".into(), 50000.into(), "2024-01-10".into()],
            vec![2.into(), "Bob".into(), "Sales".into(), 60000.into(), "2023-05-01".into()],
            vec![3.into(), "Carol".into(), " HR ".into(), 45000.into(), "2022-03-15".into()],
            vec![4.into(), "Dan".into(), "Engineering".into(), 55000.into(), "2024-06-01".into()],
        ],
    )
}

fn sales() -> Sheet {
    table(
        "Sales",
        vec![
            header(&["EmployeeID", "SaleID", "Month", "SalesAmount"]),
            vec![1.into(), 101.into(), "2025-02-01".into(), 200.0.into()],
            vec![1.into(), 102.into(), "2025-02-15".into(), 300.0.into()],
            vec![2.into(), 103.into(), "2025-01-20".into(), 1000.0.into()],
            vec![3.into(), 104.into(), "2025-01-05".into(), 250.5.into()],
        ],
    )
}

fn feedback() -> Sheet {
    table(
        "Feedback",
        vec![
            header(&["FeedbackID", "EmployeeID", "FeedbackScore", "Comments"]),
            vec![1.into(), 1.into(), 5.into(), "Excellent work".into()],
            vec![2.into(), 2.into(), 3.into(), "Needs Improvement on deadlines".into()],
            vec![3.into(), 1.into(), 4.into(), "Good".into()],
            vec![4.into(), 4.into(), 5.into(), "Great".into()],
        ],
    )
}

fn company() -> Analyzer {
    let mut book = Book::new();
    book.add_sheet("Employees", employees()).unwrap();
    book.add_sheet("Sales", sales()).unwrap();
    book.add_sheet("Feedback", feedback()).unwrap();
    Analyzer::from_book(book).unwrap()
}

fn answer(analyzer: &Analyzer, question: &str) -> Option<String> {
    format_result(&analyzer.query(question))
}

#[test]
fn test_department_count() {
    let analyzer = company();
    assert_eq!(
        analyzer.query("How many employees in Sales department?"),
        QueryResult::DepartmentCount {
            department: "Sales".to_string(),
            count: 2,
            names: vec!["Alice".to_string(), "Bob".to_string()],
        }
    );
}

#[test]
fn test_department_values_are_trimmed() {
    let analyzer = company();
    assert_eq!(
        answer(&analyzer, "How many employees are in the HR department?").unwrap(),
        "Answer: 1 employees in HR department: Carol"
    );
}

#[test]
fn test_salary_of_employee() {
    let analyzer = company();
    assert_eq!(
        answer(&analyzer, "What is the salary of Alice?").unwrap(),
        "Answer: Alice's salary is $50,000.00"
    );
}

#[test]
fn test_february_sales_count() {
    let analyzer = company();
    assert_eq!(
        analyzer.query("How many sales in February?"),
        QueryResult::SalesCount {
            month: "February 2025".to_string(),
            count: 2,
            sale_ids: vec![CellValue::Int(101), CellValue::Int(102)],
        }
    );
}

#[test]
fn test_highest_salary() {
    let analyzer = company();
    assert_eq!(
        analyzer.query("Who has the highest salary?"),
        QueryResult::HighestSalary {
            name: "Bob".to_string(),
            salary: 60000.0,
            department: "Sales".to_string(),
        }
    );
}

#[test]
fn test_unmatched_question() {
    let analyzer = company();
    let result = analyzer.query("What is the weather today?");
    assert_eq!(result.tag(), "unhandled");
    assert_eq!(format_result(&result), None);
}

#[test]
fn test_lookup_answers() {
    let analyzer = company();
    let cases = [
        (
            "Who was hired most recently?",
            "Answer: Dan was hired most recently on 2024-06-01 in Engineering department",
        ),
        (
            "What is the FeedbackScore of Bob?",
            "Answer: Bob's FeedbackScore is 3 (Needs Improvement on deadlines)",
        ),
        (
            "Which department is Carol in?",
            "Answer: Carol belongs to HR department",
        ),
        (
            "What is the Sales Amount for SaleID 103?",
            "Answer: SalesAmount for SaleID 103 is $1,000.00",
        ),
        (
            "Who received needs improvement feedback?",
            "Answer: Bob received 'Needs Improvement' feedback (FeedbackID: 2)",
        ),
        (
            "Who has the highest total sales?",
            "Answer: Bob has the highest total sales ($1,000.00)",
        ),
        (
            "What is the average salary in the Sales department?",
            "Answer: Average salary in Sales department is $55,000.00",
        ),
        (
            "What is the total payroll?",
            "Answer: Total payroll expense is $210,000.00",
        ),
        (
            "Show the lowest average salary",
            "Answer: HR department has the lowest average salary ($45,000.00)",
        ),
        (
            "Who was hired before 2024?",
            "Answer: 2 employees were hired before 2024: Bob, Carol",
        ),
        (
            "Who has the most feedback entries?",
            "Answer: Alice has the most feedback entries (2)",
        ),
    ];

    for (question, expected) in cases {
        assert_eq!(answer(&analyzer, question).as_deref(), Some(expected), "{question}");
    }
}

#[test]
fn test_shadowed_routes_resolve_to_earlier_route() {
    let analyzer = company();

    assert_eq!(
        analyzer.query("Which month had the highest total sales?").tag(),
        "top_sales_employee"
    );
    // Matched by feedback_score, which finds no employee name.
    assert!(analyzer
        .query("How many employees have a FeedbackScore of 5?")
        .is_unhandled());
    assert!(analyzer.query("What is the average FeedbackScore?").is_unhandled());
    // Matched by sale_amount, which needs a SaleID.
    assert!(analyzer
        .query("What is the total sales amount in January?")
        .is_unhandled());
}

#[test]
fn test_shadowed_handlers_work_directly() {
    let analyzer = company();

    let q = Question::new("How many employees have a FeedbackScore of 5?");
    assert_eq!(
        handlers::feedback_count(&analyzer, &q),
        Some(QueryResult::FeedbackCount { score: 5, count: 2 })
    );
    let without_five = Question::new("How many employees have a top FeedbackScore?");
    assert_eq!(handlers::feedback_count(&analyzer, &without_five), None);

    let q = Question::new("What is the average FeedbackScore?");
    assert_eq!(
        handlers::avg_feedback(&analyzer, &q),
        Some(QueryResult::AvgFeedback { average: 4.25 })
    );

    let q = Question::new("Which month had the highest total sales?");
    let top_month = handlers::top_sales_month(&analyzer, &q).unwrap();
    assert_eq!(
        format_result(&top_month).unwrap(),
        "Answer: 2025-01-20 had the highest total sales ($1,000.00)"
    );

    let q = Question::new("What is the total sales amount in January?");
    assert_eq!(
        handlers::total_sales(&analyzer, &q),
        Some(QueryResult::TotalSales {
            month: "January 2025".to_string(),
            total: 1250.5,
        })
    );
}

#[test]
fn test_every_tag_formats_as_answer() {
    let analyzer = company();
    for route in tabsage_analyzer::ROUTES {
        let question = Question::new(
            "How many employees have a FeedbackScore of 5 at Alice in Sales saleid 101 before 2025?",
        );
        if let Some(result) = (route.handler)(&analyzer, &question) {
            assert_eq!(result.tag(), route.tag);
            let text = format_result(&result).unwrap();
            assert!(text.starts_with("Answer: "), "{text}");
        }
    }
}

#[test]
fn test_missing_entities_fail_soft() {
    let analyzer = company();
    assert!(analyzer.query("What is the salary of Zed?").is_unhandled());
    assert!(analyzer
        .query("How many employees in Marketing department?")
        .is_unhandled());
    assert!(analyzer
        .query("What is the Sales Amount for SaleID 999?")
        .is_unhandled());
    assert!(analyzer.query("Who was hired before last year?").is_unhandled());
}

#[test]
fn test_missing_tables_fail_soft() {
    let mut book = Book::new();
    book.add_sheet("Employees", employees()).unwrap();
    let analyzer = Analyzer::from_book(book).unwrap();

    assert!(analyzer.relationships().is_empty());
    assert!(analyzer.query("Who has the highest total sales?").is_unhandled());
    assert!(analyzer.query("How many sales in February?").is_unhandled());
    assert_eq!(analyzer.query("Who has the highest salary?").tag(), "highest_salary");
}

/// Two employees that tie on every aggregate, with Zed's rows listed first.
fn tied_company() -> Analyzer {
    let mut book = Book::new();
    book.add_sheet(
        "Employees",
        table(
            "Employees",
            vec![
                header(&["EmployeeID", "Name", "Department", "Salary", "HireDate"]),
                vec![2.into(), "Zed".into(), "Sales".into(), 40000.into(), "2024-01-10".into()],
                vec![1.into(), "Amy".into(), "HR".into(), 40000.into(), "2024-01-10".into()],
            ],
        ),
    )
    .unwrap();
    book.add_sheet(
        "Sales",
        table(
            "Sales",
            vec![
                header(&["EmployeeID", "SaleID", "Month", "SalesAmount"]),
                vec![2.into(), 201.into(), "2025-03-01".into(), 500.0.into()],
                vec![1.into(), 202.into(), "2025-01-01".into(), 500.0.into()],
            ],
        ),
    )
    .unwrap();
    book.add_sheet(
        "Feedback",
        table(
            "Feedback",
            vec![
                header(&["FeedbackID", "EmployeeID", "FeedbackScore", "Comments"]),
                vec![1.into(), 2.into(), 4.into(), "Good".into()],
                vec![2.into(), 1.into(), 4.into(), "Good".into()],
            ],
        ),
    )
    .unwrap();
    Analyzer::from_book(book).unwrap()
}

#[test]
fn test_group_ties_go_to_smallest_key() {
    let analyzer = tied_company();

    assert_eq!(
        analyzer.query("Who has the highest total sales?"),
        QueryResult::TopSalesEmployee {
            name: "Amy".to_string(),
            total_sales: 500.0,
        }
    );
    assert_eq!(
        analyzer.query("Show the lowest average salary"),
        QueryResult::LowestAvgSalary {
            department: "HR".to_string(),
            average: 40000.0,
        }
    );
    assert_eq!(
        analyzer.query("Who has the most feedback entries?"),
        QueryResult::MostFeedback {
            name: "Amy".to_string(),
            count: 1,
        }
    );

    let q = Question::new("Which month had the highest total sales?");
    let top_month = handlers::top_sales_month(&analyzer, &q).unwrap();
    assert_eq!(
        format_result(&top_month).unwrap(),
        "Answer: 2025-01-01 had the highest total sales ($500.00)"
    );
}

/// Resolves nicknames before falling back to exact names.
struct Nicknames {
    exact: KnownValues,
}

impl Extract for Nicknames {
    type Output = String;

    fn extract(&self, question: &str) -> Option<String> {
        if question.to_lowercase().contains("alicia") {
            return Some("Alice".to_string());
        }
        self.exact.extract(question)
    }
}

#[test]
fn test_custom_name_extractor() {
    let mut analyzer = company();
    assert!(analyzer.query("What is the salary of Alicia?").is_unhandled());

    analyzer.set_name_extractor(Box::new(Nicknames {
        exact: KnownValues::new(["Alice", "Bob", "Carol", "Dan"]),
    }));
    assert_eq!(
        analyzer.query("What is the salary of Alicia?"),
        QueryResult::EmployeeSalary {
            name: "Alice".to_string(),
            salary: 50000.0,
        }
    );
    assert_eq!(
        answer(&analyzer, "Which department is Bob in?").unwrap(),
        "Answer: Bob belongs to Sales department"
    );
}

#[test]
fn test_custom_department_extractor() {
    let mut analyzer = company();
    assert!(analyzer
        .query("How many employees in the People department?")
        .is_unhandled());

    analyzer.set_department_extractor(Box::new(KnownValues::new(["People"])));
    // No row carries that department, so the count is zero.
    assert_eq!(
        analyzer.query("How many employees in the People department?"),
        QueryResult::DepartmentCount {
            department: "People".to_string(),
            count: 0,
            names: vec![],
        }
    );
}

#[test]
fn test_routing_is_deterministic() {
    let analyzer = company();
    let question = "Who has the most feedback entries?";
    let first = analyzer.query(question);
    for _ in 0..3 {
        assert_eq!(analyzer.query(question), first);
    }
}

#[test]
fn test_classification_after_load() {
    let analyzer = company();
    let employees = analyzer.classification("Employees").unwrap();
    assert_eq!(employees.kind_of("Salary"), Some(ColumnKind::Numeric));
    assert_eq!(employees.kind_of("HireDate"), Some(ColumnKind::Date));
    assert_eq!(employees.kind_of("Name"), Some(ColumnKind::Categorical));
    assert_eq!(employees.id, vec!["EmployeeID".to_string()]);

    let view = analyzer.relationships().employee_sales.as_ref().unwrap();
    // Dan has no sales and appears once with nulls.
    assert_eq!(view.row_count(), 5);
}

#[test]
fn test_csv_dataset_has_single_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("people.csv");
    std::fs::write(&path, "Name,Salary\nAlice,50000\nBob,oops\n").unwrap();

    let analyzer = Analyzer::open(&path).unwrap();
    assert_eq!(analyzer.book().sheet_names(), vec!["data"]);
    assert_eq!(analyzer.source(), Some(path.as_path()));
    assert!(analyzer.relationships().is_empty());
    // Employees-based routes have nothing to read.
    assert!(analyzer.query("What is the total payroll?").is_unhandled());
}

#[test]
fn test_workbook_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("company.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Employees").unwrap();
    for (col, name) in ["EmployeeID", "Name", "Department", "Salary", "HireDate"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    let staff = [
        (1.0, "Alice", "Sales", 50000.0, "2024-01-10"),
        (2.0, "Bob", "Sales", 60000.0, "2023-05-01"),
    ];
    for (i, (id, name, dept, salary, hired)) in staff.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, *id).unwrap();
        sheet.write_string(row, 1, *name).unwrap();
        sheet.write_string(row, 2, *dept).unwrap();
        sheet.write_number(row, 3, *salary).unwrap();
        sheet.write_string(row, 4, *hired).unwrap();
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales").unwrap();
    for (col, name) in ["EmployeeID", "SaleID", "Month", "SalesAmount"].iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    let rows = [(1.0, 101.0, "2025-02-01", 200.0), (1.0, 102.0, "2025-02-15", 300.0)];
    for (i, (emp, sale, month, amount)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, *emp).unwrap();
        sheet.write_number(row, 1, *sale).unwrap();
        sheet.write_string(row, 2, *month).unwrap();
        sheet.write_number(row, 3, *amount).unwrap();
    }
    workbook.save(&path).unwrap();

    let analyzer = Analyzer::open(&path).unwrap();
    assert_eq!(analyzer.book().sheet_names(), vec!["Employees", "Sales"]);
    assert_eq!(
        answer(&analyzer, "How many employees in Sales department?").unwrap(),
        "Answer: 2 employees in Sales department: Alice, Bob"
    );
    assert_eq!(
        answer(&analyzer, "How many sales in February?").unwrap(),
        "Answer: 2 sales in February 2025 (SaleIDs: 101, 102)"
    );
    assert_eq!(
        answer(&analyzer, "Who has the highest total sales?").unwrap(),
        "Answer: Alice has the highest total sales ($500.00)"
    );
}

#[test]
fn test_open_missing_file_fails() {
    let err = Analyzer::open("/nowhere/company.xlsx").unwrap_err();
    assert!(err.to_string().starts_with("Failed to load"));
}
