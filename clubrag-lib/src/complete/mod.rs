//! Language-model completion service
//!
//! The service is an external collaborator reached over HTTP. Every call
//! yields a [`CompletionOutcome`], which forces callers to handle malformed
//! payloads and transport failures separately from real answers.

use std::sync::Arc;

use crate::error::CompletionError;

/// Fallback phrase the model is told to use when the context has no answer.
pub const NOT_AVAILABLE: &str = "Information not available in club data.";

/// System instruction constraining answers to the supplied context.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a GDGC Club Assistant. You MUST answer ONLY using the given context. If the information is not present, reply: 'Information not available in club data.'";

/// Request envelope shared by completion backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub user: String,
}

impl<'a> CompletionRequest<'a> {
    /// Embed `context` and `question` into the user message.
    #[must_use]
    pub fn grounded(system: &'a str, context: &str, question: &str) -> Self {
        Self {
            system,
            user: format!("Context:\n{context}\n\nQuestion: {question}"),
        }
    }
}

/// Result of one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The answer text, trimmed
    Success(String),
    /// The service responded but the payload had no answer; raw body kept
    Malformed(String),
    /// The call did not produce a usable response
    TransportFailure {
        cause: String,
        status: Option<u16>,
        retryable: bool,
    },
}

impl CompletionOutcome {
    pub fn into_result(self) -> Result<String, CompletionError> {
        match self {
            Self::Success(text) => Ok(text),
            Self::Malformed(payload) => Err(CompletionError::Malformed { payload }),
            Self::TransportFailure {
                cause,
                status: Some(status),
                ..
            } => Err(CompletionError::Status {
                status,
                body: cause,
            }),
            Self::TransportFailure {
                cause, retryable, ..
            } => Err(CompletionError::Transport {
                message: cause,
                retryable,
            }),
        }
    }
}

/// Trait implemented by completion backends.
pub trait CompletionService: Send + Sync {
    fn complete(&self, request: &CompletionRequest<'_>) -> CompletionOutcome;

    /// Model identifier sent with each request
    fn model(&self) -> &str;
}

impl<T: CompletionService + ?Sized> CompletionService for Arc<T> {
    fn complete(&self, request: &CompletionRequest<'_>) -> CompletionOutcome {
        (**self).complete(request)
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

impl<T: CompletionService + ?Sized> CompletionService for Box<T> {
    fn complete(&self, request: &CompletionRequest<'_>) -> CompletionOutcome {
        (**self).complete(request)
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

mod chat;

pub use chat::*;
