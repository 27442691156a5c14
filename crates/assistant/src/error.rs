use thiserror::Error;

/// Result type for remote model calls.
pub type LlmResult<T> = Result<T, LlmError>;

/// Failures talking to the remote chat model.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured (set GROQ_API_KEY)")]
    MissingApiKey,

    #[error("remote model disabled (offline mode)")]
    Offline,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response contained no choices")]
    EmptyResponse,
}
