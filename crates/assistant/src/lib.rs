//! Conversation layer for tabsage.
//!
//! A [`Session`] answers questions from the loaded tables first and hands
//! anything the router cannot match to a [`FallbackAsker`], normally a
//! [`GroqClient`] talking to an OpenAI-compatible chat-completions API.
//!
//! ```no_run
//! use tabsage_assistant::{GroqClient, LlmConfig, Session};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new(LlmConfig::from_env())?;
//! let mut session = Session::open("company.xlsx", Box::new(client))?;
//! println!("{}", session.answer("Who has the highest salary?").await);
//! # Ok(())
//! # }
//! ```

mod asker;
pub mod config;
mod error;
mod request;
mod session;

pub use asker::{FallbackAsker, GroqClient, OfflineAsker};
pub use config::LlmConfig;
pub use error::{LlmError, LlmResult};
pub use request::{FallbackRequest, TableSample, HISTORY_WINDOW, SAMPLE_ROWS};
pub use session::{ConversationEntry, Role, Session};
