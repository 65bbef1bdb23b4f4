//! YAML configuration for the agent binary.
//!
//! Every field has a default so the binary runs with nothing but API keys
//! supplied via flags or the environment. A config file only needs the
//! fields it wants to override:
//!
//! ```yaml
//! agent_name: newsroom-agent
//! newsapi_api_key: "..."
//! llm:
//!   base_url: http://localhost:8080/v1
//!   model: qwen2.5-7b-instruct
//!   temperature: 0.2
//! ```

use crate::error::AgentError;
use crate::prompts::NEWS_SYSTEM_PROMPT;
use serde::Deserialize;
use tokio::fs;
use tracing::{info, instrument};

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Display name for the agent, used in logs and for nothing else.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    /// NewsAPI key. Flags and the environment take precedence.
    #[serde(default)]
    pub newsapi_api_key: Option<String>,

    /// Summarization delegate settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            newsapi_api_key: None,
            llm: LlmConfig::default(),
        }
    }
}

/// Settings for the OpenAI-compatible summarization endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Bearer token; optional so unauthenticated local endpoints work.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Override for the built-in news summarization prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: None,
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            system_prompt: None,
        }
    }
}

impl LlmConfig {
    /// The system prompt to configure the delegate with.
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(NEWS_SYSTEM_PROMPT)
    }
}

fn default_agent_name() -> String {
    "news_agent_v1".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_temperature() -> f32 {
    0.1
}

/// Load configuration from a YAML file.
#[instrument(level = "info", fields(path = %path))]
pub async fn load_config(path: &str) -> Result<AppConfig, AgentError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| AgentError::Config(format!("cannot read {path}: {e}")))?;
    let config: AppConfig = serde_yaml::from_str(&raw)
        .map_err(|e| AgentError::Config(format!("cannot parse {path}: {e}")))?;
    info!(agent_name = %config.agent_name, "loaded configuration");
    Ok(config)
}
