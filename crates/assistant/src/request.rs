//! What the fallback model gets to see.

use crate::session::ConversationEntry;
use indexmap::IndexMap;
use serde::Serialize;
use tabsage_analyzer::{Analyzer, QueryResult};
use tabsage_sheet::CellValue;

/// Rows of each table included as sample data.
pub const SAMPLE_ROWS: usize = 2;
/// Conversation entries included, counted from the end.
pub const HISTORY_WINDOW: usize = 5;

/// Column names and leading rows of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSample {
    pub columns: Vec<String>,
    pub sample_data: Vec<IndexMap<String, CellValue>>,
}

/// Context for one fallback call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackRequest {
    pub file: Option<String>,
    pub sheets: IndexMap<String, TableSample>,
    pub conversation_history: Vec<ConversationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<QueryResult>,
    #[serde(skip)]
    pub question: String,
}

impl FallbackRequest {
    /// Summarize `analyzer` and the tail of `history` for `question`.
    pub fn new(
        analyzer: &Analyzer,
        history: &[ConversationEntry],
        question: &str,
        analysis: Option<QueryResult>,
    ) -> Self {
        let sheets = analyzer
            .book()
            .sheets()
            .map(|(name, sheet)| {
                let sample = TableSample {
                    columns: sheet.column_names().to_vec(),
                    sample_data: sheet.head(SAMPLE_ROWS).to_records(),
                };
                (name.to_string(), sample)
            })
            .collect();

        let start = history.len().saturating_sub(HISTORY_WINDOW);

        FallbackRequest {
            file: analyzer.source().map(|p| p.display().to_string()),
            sheets,
            conversation_history: history[start..].to_vec(),
            analysis,
            question: question.to_string(),
        }
    }

    /// The single user message sent to the model.
    pub fn prompt(&self) -> String {
        let context = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        format!(
            "You are a data analyst assistant. Given this context:\n\
             {context}\n\n\
             Current question: {}\n\n\
             Please provide a concise answer based on the data and conversation history.\n\
             Format: \"Answer: [your response]\"\n",
            self.question
        )
    }
}
