//! Conversation state around one loaded dataset.

use crate::asker::FallbackAsker;
use crate::request::FallbackRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tabsage_analyzer::{format_result, Analyzer, LoadResult};

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One line of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
}

impl ConversationEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ConversationEntry {
            role,
            content: content.into(),
        }
    }
}

/// Prefix that marks a formatted answer as a miss. Nothing formats such
/// text today; the check stays so a handler can opt into the fallback.
const MISS_PREFIX: &str = "Could not";

/// A dataset plus the running conversation about it.
///
/// Each question is answered from the tables when a route handles it, and by
/// the fallback asker otherwise. Both the question and the answer are
/// appended to the log.
pub struct Session {
    analyzer: Analyzer,
    asker: Box<dyn FallbackAsker>,
    history: Vec<ConversationEntry>,
}

impl Session {
    pub fn new(analyzer: Analyzer, asker: Box<dyn FallbackAsker>) -> Self {
        Session {
            analyzer,
            asker,
            history: Vec::new(),
        }
    }

    /// Load `path` and start an empty conversation over it.
    pub fn open<P: AsRef<Path>>(path: P, asker: Box<dyn FallbackAsker>) -> LoadResult<Self> {
        let analyzer = Analyzer::open(path)?;
        tracing::info!("session started");
        Ok(Session::new(analyzer, asker))
    }

    /// Replace the dataset. The conversation is cleared on success and left
    /// alone on failure.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> LoadResult<()> {
        self.analyzer = Analyzer::open(path)?;
        self.history.clear();
        tracing::info!("session reloaded");
        Ok(())
    }

    /// Answer one question. Never fails: fallback errors come back as an
    /// `Answer: Error processing your question: ...` line.
    pub async fn answer(&mut self, question: &str) -> String {
        self.history
            .push(ConversationEntry::new(Role::User, question));

        let result = self.analyzer.query(question);
        let answer = match format_result(&result) {
            Some(direct) if !direct.starts_with(MISS_PREFIX) => direct,
            _ => {
                let request =
                    FallbackRequest::new(&self.analyzer, &self.history, question, Some(result));
                match self.asker.ask(&request).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("fallback failed: {e}");
                        format!("Answer: Error processing your question: {e}")
                    }
                }
            }
        };

        self.history
            .push(ConversationEntry::new(Role::Assistant, answer.clone()));
        answer
    }

    /// Empty the conversation log. The dataset stays loaded.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[ConversationEntry] {
        &self.history
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("analyzer", &self.analyzer)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}
