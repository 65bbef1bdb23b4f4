//! # News Agent
//!
//! Fetches news articles for one or more queries, summarizes each query's
//! articles through an LLM delegate, and records every input/output pair
//! in a JSON run log on disk.
//!
//! ## Usage
//!
//! ```sh
//! news_agent run "Swarm Multi-Agent" "AGI"
//! news_agent sources technology
//! news_agent headlines bbc-news
//! ```
//!
//! ## Architecture
//!
//! One query flows through a three-stage pipeline:
//! 1. **Fetch**: query the NewsAPI collaborator and normalize the articles
//! 2. **Summarize**: send the numbered article digest to the delegate
//! 3. **Record**: append the (query, articles, summary) tuple to the run log
//!
//! A batch of queries runs the same pipeline concurrently, waits for every
//! query to settle, then persists the accumulated run log to disk.

use clap::Parser;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod agent;
mod cli;
mod config;
mod error;
mod models;
mod newsapi;
mod persist;
mod prompts;
mod summarizer;
mod utils;

use agent::{NewsAgent, RunSettings};
use cli::{Cli, Command};
use config::AppConfig;
use error::AgentError;
use newsapi::NewsApiClient;
use summarizer::OpenAiSummarizer;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("news_agent starting up");

    let args = Cli::parse();
    debug!(command = ?args.command, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => config::load_config(path).await?,
        None => AppConfig::default(),
    };

    // flags and env take precedence over the config file
    let newsapi_api_key = args
        .newsapi_api_key
        .clone()
        .or_else(|| config.newsapi_api_key.clone())
        .ok_or_else(|| {
            AgentError::Config(
                "a NewsAPI key is required (--newsapi-api-key, NEWSAPI_API_KEY, or config file)"
                    .to_string(),
            )
        })?;
    if config.llm.api_key.is_none() {
        config.llm.api_key = args.openai_api_key.clone();
    }

    let client = NewsApiClient::new(newsapi_api_key);

    match args.command {
        Command::Run {
            queries,
            from,
            to,
            max_articles,
            return_json,
            sequential,
            log_dir,
        } => {
            // fail fast on a bad log dir, before any summaries are computed
            ensure_writable_dir(&log_dir).await?;

            let summarizer = OpenAiSummarizer::new(&config.llm);
            let settings = RunSettings {
                start_date: from,
                end_date: to,
                max_articles,
                return_json,
                log_dir,
            };
            let agent = NewsAgent::new(config.agent_name.clone(), client, summarizer, settings);

            let output = if sequential || queries.len() == 1 {
                agent.run_sequential(&queries).await?
            } else {
                agent.run_concurrently(&queries).await?
            };
            println!("{output}");

            info!(
                agent = %agent.name(),
                queries = queries.len(),
                "run complete"
            );
        }
        Command::Sources { category } => {
            let listing = client.sources(category).await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Headlines { source } => {
            let headlines = client.top_headlines(&source).await?;
            println!("{}", serde_json::to_string_pretty(&headlines)?);
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");

    Ok(())
}
