//! Query intent classification
//!
//! A fixed, ordered list of substring rules. The first rule whose pattern
//! occurs in the lower-cased query decides the intent, so a query mentioning
//! both "summary" and "suggest" is a suggestion request.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    PastEvents,
    Suggest,
    Summary,
    /// No special mode; answer through retrieval
    None,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PastEvents => "past-events",
            Self::Suggest => "suggest",
            Self::Summary => "summary",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Rules in precedence order. Patterns are lower-case.
pub const RULES: &[(&str, Intent)] = &[
    ("past events", Intent::PastEvents),
    ("previous events", Intent::PastEvents),
    ("suggest", Intent::Suggest),
    ("event idea", Intent::Suggest),
    ("summary", Intent::Summary),
    ("summarize", Intent::Summary),
];

#[must_use]
pub fn classify(query: &str) -> Intent {
    let query = query.to_lowercase();
    RULES
        .iter()
        .find(|(pattern, _)| query.contains(pattern))
        .map_or(Intent::None, |(_, intent)| *intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rule() {
        assert_eq!(classify("show me past events"), Intent::PastEvents);
        assert_eq!(classify("any PREVIOUS EVENTS?"), Intent::PastEvents);
        assert_eq!(classify("Suggest something fun"), Intent::Suggest);
        assert_eq!(classify("I need an event idea"), Intent::Suggest);
        assert_eq!(classify("give me a summary"), Intent::Summary);
        assert_eq!(classify("Summarize the club"), Intent::Summary);
        assert_eq!(classify("who is the lead?"), Intent::None);
    }

    #[test]
    fn test_suggest_beats_summary() {
        assert_eq!(classify("summary of what you suggest"), Intent::Suggest);
    }

    #[test]
    fn test_past_events_beats_everything() {
        assert_eq!(
            classify("summarize past events and suggest an event idea"),
            Intent::PastEvents
        );
    }

    #[test]
    fn test_substring_not_token_match() {
        // "suggestions" contains "suggest"; no tokenization is applied
        assert_eq!(classify("any suggestions?"), Intent::Suggest);
        // no stemming: "event ideas" still contains "event idea", but "events idea" does not
        assert_eq!(classify("events idea"), Intent::None);
        // "past  events" with two spaces is not a match
        assert_eq!(classify("past  events"), Intent::None);
    }

    #[test]
    fn test_idempotent() {
        let query = "Summarize previous events";
        assert_eq!(classify(query), classify(query));
        assert_eq!(classify(query), Intent::PastEvents);
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(classify(""), Intent::None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Intent::PastEvents.to_string(), "past-events");
        assert_eq!(Intent::None.to_string(), "none");
    }
}
