use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::complete::{CompletionOutcome, CompletionRequest, CompletionService};
use crate::config::CompletionConfig;
use crate::error::CompletionError;
use crate::{Error, Result};

/// Client for OpenAI-compatible chat completion APIs (OpenRouter by default).
pub struct ChatCompletionsClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(config: &CompletionConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(CompletionError::MissingApiKey(config.api_key_env.clone()).into());
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Read the key from the environment variable named in the config.
    pub fn from_env(config: &CompletionConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        Self::new(config, api_key)
    }

    fn headers(&self) -> std::result::Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| "invalid API key".to_string())?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl CompletionService for ChatCompletionsClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, request: &CompletionRequest<'_>) -> CompletionOutcome {
        let headers = match self.headers() {
            Ok(headers) => headers,
            Err(cause) => {
                return CompletionOutcome::TransportFailure {
                    cause,
                    status: None,
                    retryable: false,
                }
            }
        };

        let body = ChatRequest::new(&self.model, request);
        let resp = match self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "completion request failed");
                return CompletionOutcome::TransportFailure {
                    cause: e.to_string(),
                    status: None,
                    retryable: e.is_timeout() || e.is_connect(),
                };
            }
        };

        let status = resp.status().as_u16();
        let text = match resp.text() {
            Ok(text) => text,
            Err(e) => {
                return CompletionOutcome::TransportFailure {
                    cause: format!("failed to read response body: {e}"),
                    status: None,
                    retryable: e.is_timeout(),
                }
            }
        };
        debug!(status, bytes = text.len(), "completion response");
        parse_response(status, &text)
    }
}

/// Classify a raw HTTP response from the chat completions endpoint.
#[must_use]
pub fn parse_response(status: u16, body: &str) -> CompletionOutcome {
    if !(200..300).contains(&status) {
        return CompletionOutcome::TransportFailure {
            cause: body.to_string(),
            status: Some(status),
            retryable: status == 429 || status >= 500,
        };
    }

    let answer = serde_json::from_str::<ChatResponse>(body)
        .ok()
        .and_then(|parsed| parsed.choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    match answer {
        Some(content) => CompletionOutcome::Success(content.trim().to_string()),
        None => CompletionOutcome::Malformed(body.to_string()),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, request: &'a CompletionRequest<'_>) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
