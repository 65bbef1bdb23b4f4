//! Summarization delegate seam.
//!
//! The agent needs exactly one capability from its language model: turn an
//! article digest into a free-text summary. [`Summarize`] is that seam, and
//! [`OpenAiSummarizer`] implements it against any OpenAI-compatible
//! chat-completions endpoint.
//!
//! The delegate is treated as opaque, potentially slow, and
//! potentially-failing. There is no retry wrapper here; a failure maps to
//! [`AgentError::Delegate`] and propagates straight to the caller. The
//! system prompt is fixed at construction time and never re-negotiated per
//! call.

use crate::config::LlmConfig;
use crate::error::AgentError;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument};

/// Capability to summarize a digest into free text.
pub trait Summarize {
    async fn summarize(&self, digest: &str) -> Result<String, AgentError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatAnswer,
}

#[derive(Debug, Deserialize)]
struct ChatAnswer {
    content: String,
}

/// Chat-completions client implementing [`Summarize`].
///
/// Works against any OpenAI-compatible endpoint; the bearer token is
/// optional so local inference servers without auth work too.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    system_prompt: String,
}

impl std::fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenAiSummarizer {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            system_prompt: config.system_prompt().to_string(),
        }
    }
}

impl Summarize for OpenAiSummarizer {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn summarize(&self, digest: &str) -> Result<String, AgentError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: digest,
                },
            ],
        };

        let t0 = Instant::now();
        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AgentError::Delegate(format!("request failed: {e}")))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Delegate(format!("malformed response: {e}")))?;

        let summary = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AgentError::Delegate("response contained no choices".to_string()))?;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = summary.len(),
            "delegate returned summary"
        );
        Ok(summary)
    }
}
