//! Deterministic doubles for the embedding model and completion service.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::complete::{CompletionOutcome, CompletionRequest, CompletionService};
use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

const VOCABULARY: &[&str] = &[
    "hackathon", "meetup", "friday", "flutter", "widget", "club", "lead", "cloud",
];

/// Counts vocabulary hits per dimension, plus a constant bias dimension so
/// no text embeds to a zero vector.
pub struct KeywordEmbedder {
    pub query_calls: usize,
    pub document_calls: usize,
    pub fail_queries: bool,
    pub fail_documents: bool,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            query_calls: 0,
            document_calls: 0,
            fail_queries: false,
            fail_documents: false,
        }
    }

    fn vector(text: &str) -> Embedding {
        let text = text.to_lowercase();
        let mut v: Embedding = VOCABULARY
            .iter()
            .map(|word| text.matches(word).count() as f32)
            .collect();
        v.push(1.0);
        v
    }
}

impl Embedder for KeywordEmbedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.document_calls += 1;
        if self.fail_documents {
            return Err(Error::Embedding("model unavailable".to_string()));
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        self.query_calls += 1;
        if self.fail_queries {
            return Err(Error::Embedding("model unavailable".to_string()));
        }
        Ok(Self::vector(text))
    }

    fn dimension(&self) -> usize {
        VOCABULARY.len() + 1
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub system: String,
    pub user: String,
}

/// Replays canned outcomes in order and records every request.
pub struct ScriptedCompletion {
    outcomes: Mutex<VecDeque<CompletionOutcome>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedCompletion {
    pub fn new(outcomes: Vec<CompletionOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionService for ScriptedCompletion {
    fn complete(&self, request: &CompletionRequest<'_>) -> CompletionOutcome {
        self.requests.lock().unwrap().push(RecordedRequest {
            system: request.system.to_string(),
            user: request.user.clone(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CompletionOutcome::TransportFailure {
                cause: "no scripted outcome left".to_string(),
                status: None,
                retryable: false,
            })
    }

    fn model(&self) -> &str {
        "scripted-test"
    }
}
