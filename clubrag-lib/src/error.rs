//! Error types for ClubRAG

use thiserror::Error;

/// Result type alias for ClubRAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ClubRAG operations
#[derive(Error, Debug)]
pub enum Error {
    /// No corpus line survived filtering; the service cannot start
    #[error("corpus contains no usable lines")]
    EmptyCorpus,

    /// The query was empty after trimming
    #[error("query is empty")]
    EmptyQuery,

    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Failed to embed a query or score it against the index
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// The completion service call failed or returned an unusable payload
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Failed to read the corpus source
    #[error("corpus error: {0}")]
    Corpus(String),

    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message suitable for showing to the person who asked the question.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyQuery => "Please enter a question.".to_string(),
            Self::Completion(e) => format!("API Error: {}", e.detail()),
            other => other.to_string(),
        }
    }

    /// Returns `true` if retrying the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Completion(e) if e.is_retryable())
    }
}

/// Failures of the completion service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Network failure or timeout before a response arrived
    #[error("completion transport failure: {message}")]
    Transport { message: String, retryable: bool },

    /// The service answered with a non-success status
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response did not contain an answer; the raw payload is kept for diagnosis
    #[error("malformed completion response: {payload}")]
    Malformed { payload: String },

    /// No API key was configured for the completion service
    #[error("completion API key not configured (set {0})")]
    MissingApiKey(String),
}

impl CompletionError {
    /// Timeouts, 429 and 5xx responses are worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } => *retryable,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed { .. } | Self::MissingApiKey(_) => false,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Malformed { payload } => payload.clone(),
            Self::Status { status, body } => format!("{status} {body}"),
            other => other.to_string(),
        }
    }
}
