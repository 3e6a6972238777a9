//! Special-mode handlers
//!
//! Handlers that answer a classified query without similarity search.
//! Past events and suggestions are produced locally; summaries go to the
//! completion service with the head of the corpus as context.

use tracing::debug;

use crate::chunk::Chunk;
use crate::complete::{CompletionRequest, CompletionService};
use crate::config::ModesConfig;
use crate::corpus::Corpus;
use crate::Result;

pub const NO_PAST_EVENTS: &str = "No past events found in club data.";
pub const SUMMARY_INSTRUCTION: &str = "Give a short summary of this club.";

pub struct SpecialModes {
    past_events: Vec<Chunk>,
    suggestions: Vec<String>,
    summary_context: String,
}

impl SpecialModes {
    /// Precompute the past-event subset and summary context from the corpus.
    #[must_use]
    pub fn new(corpus: &Corpus, config: &ModesConfig) -> Self {
        let past_events = corpus.matching(&config.event_markers);
        let summary_context = corpus
            .head(config.summary_units)
            .iter()
            .map(|unit| unit.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(past_events = past_events.len(), "prepared special modes");

        Self {
            past_events,
            suggestions: config.suggestions.clone(),
            summary_context,
        }
    }

    #[must_use]
    pub fn past_events(&self) -> &[Chunk] {
        &self.past_events
    }

    #[must_use]
    pub fn list_past_events(&self) -> String {
        if self.past_events.is_empty() {
            return NO_PAST_EVENTS.to_string();
        }
        let mut out = String::from("Here are the past events:\n\n");
        for event in &self.past_events {
            out.push_str(&format!("- {}\n\n", event.content));
        }
        out
    }

    #[must_use]
    pub fn list_suggestions(&self) -> String {
        let mut out = String::from("Here are some event suggestions based on your club:\n\n");
        for idea in &self.suggestions {
            out.push_str(&format!("• {idea}\n"));
        }
        out
    }

    /// Ask the completion service to summarize the leading corpus units.
    ///
    /// Not retried; failures propagate unchanged.
    pub fn summarize<C: CompletionService + ?Sized>(
        &self,
        completion: &C,
        system_prompt: &str,
    ) -> Result<String> {
        let request =
            CompletionRequest::grounded(system_prompt, &self.summary_context, SUMMARY_INSTRUCTION);
        Ok(completion.complete(&request).into_result()?)
    }
}
