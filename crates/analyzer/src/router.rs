//! Ordered pattern dispatch.
//!
//! Routes are tried top to bottom and the first trigger that holds wins, even
//! when its handler then fails. Order matters: a few routes are shadowed by
//! earlier, broader triggers and can never be selected:
//!
//! - `top_sales_month` sits behind `top_sales_employee` ("highest total sales").
//! - `feedback_count` and `avg_feedback` sit behind `feedback_score`
//!   ("feedbackscore").
//! - `total_sales` sits behind `sale_amount`: "total sales amount" always
//!   contains "salesamount" once spaces are removed, and without a SaleID
//!   that handler comes back empty.
//!
//! Their handlers still work when called directly.

use crate::analyzer::Analyzer;
use crate::handlers;
use crate::result::QueryResult;

/// A question in the three spellings triggers test against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Original text, untouched.
    pub raw: String,
    /// Lower-cased text.
    pub lower: String,
    /// Lower-cased text with every space removed.
    pub compact: String,
}

impl Question {
    pub fn new(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let compact = lower.replace(' ', "");
        Question {
            raw: raw.to_string(),
            lower,
            compact,
        }
    }

    /// Substring test on the lower-cased text.
    pub fn has(&self, phrase: &str) -> bool {
        self.lower.contains(phrase)
    }

    /// Substring test on the lower-cased, space-free text.
    pub fn has_compact(&self, phrase: &str) -> bool {
        self.compact.contains(phrase)
    }
}

pub type Trigger = fn(&Question) -> bool;
pub type Handler = fn(&Analyzer, &Question) -> Option<QueryResult>;

/// One entry of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    /// Tag of the result the handler produces.
    pub tag: &'static str,
    pub trigger: Trigger,
    pub handler: Handler,
}

pub static ROUTES: &[Route] = &[
    Route {
        tag: "department_count",
        trigger: |q| q.has("how many employees") && q.has("department"),
        handler: handlers::department_count,
    },
    Route {
        tag: "employee_salary",
        trigger: |q| q.has("salary of"),
        handler: handlers::employee_salary,
    },
    Route {
        tag: "highest_salary",
        trigger: |q| q.has("highest salary"),
        handler: handlers::highest_salary,
    },
    Route {
        tag: "sales_count",
        trigger: |q| q.has("how many sales") && q.has("february"),
        handler: handlers::sales_count,
    },
    Route {
        tag: "recent_hire",
        trigger: |q| q.has("hired most recently"),
        handler: handlers::recent_hire,
    },
    Route {
        tag: "feedback_score",
        trigger: |q| q.has_compact("feedbackscore"),
        handler: handlers::feedback_score,
    },
    Route {
        tag: "employee_department",
        trigger: |q| q.has("which department"),
        handler: handlers::employee_department,
    },
    Route {
        tag: "sale_amount",
        trigger: |q| q.has_compact("salesamount"),
        handler: handlers::sale_amount,
    },
    Route {
        tag: "needs_improvement",
        trigger: |q| q.has("needs improvement"),
        handler: handlers::needs_improvement,
    },
    Route {
        tag: "total_sales",
        trigger: |q| q.has("total sales amount") && q.has("january"),
        handler: handlers::total_sales,
    },
    Route {
        tag: "top_sales_employee",
        trigger: |q| q.has("highest total sales"),
        handler: handlers::top_sales_employee,
    },
    Route {
        tag: "avg_salary",
        trigger: |q| q.has("average salary") && q.has("department"),
        handler: handlers::avg_salary,
    },
    Route {
        tag: "feedback_count",
        trigger: |q| q.has("how many employees") && q.has_compact("feedbackscore"),
        handler: handlers::feedback_count,
    },
    Route {
        tag: "total_payroll",
        trigger: |q| q.has("total payroll"),
        handler: handlers::total_payroll,
    },
    Route {
        tag: "top_sales_month",
        trigger: |q| q.has("highest total sales") && q.has("month"),
        handler: handlers::top_sales_month,
    },
    Route {
        tag: "avg_feedback",
        trigger: |q| q.has_compact("averagefeedbackscore"),
        handler: handlers::avg_feedback,
    },
    Route {
        tag: "lowest_avg_salary",
        trigger: |q| q.has("lowest average salary"),
        handler: handlers::lowest_avg_salary,
    },
    Route {
        tag: "employees_before_year",
        trigger: |q| q.has("hired before"),
        handler: handlers::employees_before_year,
    },
    Route {
        tag: "most_feedback",
        trigger: |q| q.has("most feedback entries"),
        handler: handlers::most_feedback,
    },
];

/// The route a question selects, if any.
pub fn select(question: &Question) -> Option<&'static Route> {
    ROUTES.iter().find(|route| (route.trigger)(question))
}

/// Look up a route by its result tag.
pub fn route_by_tag(tag: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.tag == tag)
}

/// Answer `text` with exactly one result. A question no trigger matches, or
/// whose handler cannot find the data it needs, yields `Unhandled`.
pub fn route(analyzer: &Analyzer, text: &str) -> QueryResult {
    let question = Question::new(text);

    let Some(route) = select(&question) else {
        tracing::debug!(question = text, "no route matched");
        return QueryResult::unhandled(text);
    };

    match (route.handler)(analyzer, &question) {
        Some(result) => {
            tracing::debug!(route = route.tag, "answered from tables");
            result
        }
        None => {
            tracing::debug!(route = route.tag, "route matched but lookup missed");
            QueryResult::unhandled(text)
        }
    }
}
