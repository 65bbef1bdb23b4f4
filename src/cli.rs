//! Command-line interface definitions for the news agent.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys can be provided via command-line flags or environment variables.

use crate::newsapi::Category;
use clap::{Parser, Subcommand};

/// Command-line arguments for the news agent binary.
///
/// # Examples
///
/// ```sh
/// # Summarize news for two queries concurrently
/// news_agent run "Swarm Multi-Agent" "AGI"
///
/// # Sequential run over a date range, JSON output
/// news_agent run --sequential --from 2025-08-01 --to 2025-08-07 --return-json "Acme Corp"
///
/// # Auxiliary listings
/// news_agent sources technology
/// news_agent headlines bbc-news
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_API_KEY")]
    pub newsapi_api_key: Option<String>,

    /// API key for the summarization endpoint
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and summarize news for one or more queries
    Run {
        /// Queries to process; multiple queries run concurrently
        #[arg(required = true)]
        queries: Vec<String>,

        /// Start date for the news query, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// End date for the news query, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,

        /// Maximum articles to fetch per query
        #[arg(long, default_value_t = 5)]
        max_articles: usize,

        /// Print the full run log as JSON instead of the last summary
        #[arg(long)]
        return_json: bool,

        /// Process queries one at a time instead of concurrently
        #[arg(long)]
        sequential: bool,

        /// Folder the run log is written into
        #[arg(long, default_value = "news_agent_runs")]
        log_dir: String,
    },

    /// List news sources for a category
    Sources {
        #[arg(value_enum)]
        category: Category,
    },

    /// List top headlines for a source
    Headlines {
        /// Source identifier, e.g. "bbc-news"
        source: String,
    },
}
