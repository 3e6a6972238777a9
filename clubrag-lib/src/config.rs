//! Runtime configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [corpus]
//! path = "data/club_data.txt"
//!
//! [retrieval]
//! top_k = 5
//!
//! [completion]
//! model = "meta-llama/llama-3.1-8b-instruct"
//! timeout_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chunk::DEFAULT_MIN_CHARS;
use crate::complete::DEFAULT_SYSTEM_PROMPT;
use crate::embed::DEFAULT_EMBEDDING_MODEL;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub retrieval: RetrievalConfig,
    pub modes: ModesConfig,
    pub embedding: EmbeddingConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    /// UTF-8 text file, one fact per line
    pub path: PathBuf,
    /// Lines must be longer than this many characters after trimming
    pub min_chars: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("club_data.txt"),
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Units passed to the model as context for generic questions
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModesConfig {
    /// Case-insensitive markers identifying past-event lines
    pub event_markers: Vec<String>,
    /// Static event ideas listed by the suggestion mode
    pub suggestions: Vec<String>,
    /// Leading corpus units sent to the model for a summary
    pub summary_units: usize,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            event_markers: ["TECH WINTER BREAK", "GOOGLE OLYMPICS", "BUILD WITH AI"]
                .map(String::from)
                .to_vec(),
            suggestions: [
                "AI for Beginners Workshop",
                "Flutter App Building Marathon",
                "Hackathon: Build for Bhopal",
                "ML Bootcamp for Freshers",
                "Cloud Computing with Google Cloud",
            ]
            .map(String::from)
            .to_vec(),
            summary_units: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompletionConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub system_prompt: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "google/gemma-2-9b-it".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: 60,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl CompletionConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Parse a TOML config file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if self.completion.endpoint.trim().is_empty() {
            return Err(Error::Config("completion.endpoint must not be empty".to_string()));
        }
        if self.completion.model.trim().is_empty() {
            return Err(Error::Config("completion.model must not be empty".to_string()));
        }
        if self.completion.timeout_secs == 0 {
            return Err(Error::Config("completion.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}
