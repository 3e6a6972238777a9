//! Retrieval-augmented query orchestrator
//!
//! ```text
//! query -> classify -+-> PastEvents / Suggest / Summary -> handler ------------+
//!                    |                                                          |
//!                    +-> None -> SearchEngine (top-k) -> CompletionService -----+-> Answer
//! ```
//!
//! Each call is independent: nothing is cached or remembered between queries.

use std::time::Instant;

use tracing::{info, warn};

use crate::complete::{CompletionRequest, CompletionService};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::embed::Embedder;
use crate::index::Retrieval;
use crate::intent::{classify, Intent};
use crate::modes::SpecialModes;
use crate::search::SearchEngine;
use crate::{Error, Result};

/// The result of answering one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub intent: Intent,
    /// Handler output when a special mode answered; same text as `response`
    pub special_text: Option<String>,
    /// Retrieved context, present only for generic retrieval
    pub context: Option<String>,
    pub response: String,
}

/// What the presentation layer shows: an answer or a user-facing error message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Answered(Answer),
    Failed(String),
}

pub struct Assistant<E: Embedder, C: CompletionService> {
    search: SearchEngine<E>,
    modes: SpecialModes,
    completion: C,
    top_k: usize,
    system_prompt: String,
}

impl<E: Embedder, C: CompletionService> Assistant<E, C> {
    /// Build the index and special-mode data for `corpus`.
    ///
    /// The config is validated before any embedding work starts.
    pub fn build(corpus: &Corpus, embedder: E, completion: C, config: &Config) -> Result<Self> {
        config.validate()?;
        let search = SearchEngine::build(embedder, corpus.units().to_vec())?;
        let modes = SpecialModes::new(corpus, &config.modes);
        Self::new(search, modes, completion, config)
    }

    /// Assemble from prebuilt parts. Fails on an invalid config.
    pub fn new(
        search: SearchEngine<E>,
        modes: SpecialModes,
        completion: C,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            search,
            modes,
            completion,
            top_k: config.retrieval.top_k,
            system_prompt: config.completion.system_prompt.clone(),
        })
    }

    /// Answer one query.
    ///
    /// # Errors
    /// [`Error::EmptyQuery`] for blank input (before any embedding or network
    /// call), [`Error::Retrieval`] or [`Error::Completion`] when a collaborator fails.
    pub fn answer(&mut self, query: &str) -> Result<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let started = Instant::now();
        let intent = classify(query);
        let answer = match intent {
            Intent::PastEvents => self.special(intent, self.modes.list_past_events()),
            Intent::Suggest => self.special(intent, self.modes.list_suggestions()),
            Intent::Summary => {
                let summary = self.modes.summarize(&self.completion, &self.system_prompt)?;
                self.special(intent, summary)
            }
            Intent::None => self.retrieve_and_complete(query)?,
        };

        info!(
            %intent,
            context_lines = answer.context.as_deref().map_or(0, |c| c.lines().count()),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "answered query"
        );
        Ok(answer)
    }

    /// Answer one query, turning per-call failures into a message for the user.
    pub fn reply(&mut self, query: &str) -> Reply {
        match self.answer(query) {
            Ok(answer) => Reply::Answered(answer),
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "query failed");
                Reply::Failed(e.user_message())
            }
        }
    }

    /// Run similarity search only, without calling the completion service.
    pub fn retrieve(&mut self, query: &str, k: usize) -> Result<Retrieval> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }
        self.search.query(query, k)
    }

    fn special(&self, intent: Intent, text: String) -> Answer {
        Answer {
            intent,
            special_text: Some(text.clone()),
            context: None,
            response: text,
        }
    }

    fn retrieve_and_complete(&mut self, query: &str) -> Result<Answer> {
        let context = self.search.query(query, self.top_k)?.context();
        let request = CompletionRequest::grounded(&self.system_prompt, &context, query);
        let response = self.completion.complete(&request).into_result()?;

        Ok(Answer {
            intent: Intent::None,
            special_text: None,
            context: Some(context),
            response,
        })
    }

    #[must_use]
    pub fn modes(&self) -> &SpecialModes {
        &self.modes
    }

    #[must_use]
    pub fn search(&self) -> &SearchEngine<E> {
        &self.search
    }

    #[must_use]
    pub fn completion(&self) -> &C {
        &self.completion
    }

    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
