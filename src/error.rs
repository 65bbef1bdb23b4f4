//! Typed errors for the news agent pipeline.
//!
//! Four failure kinds cross component boundaries: the news API collaborator
//! failing, the summarization delegate failing, the run log write failing,
//! and bad configuration or arguments. None are caught or retried inside the
//! pipeline; each surfaces to whoever called the `run*` entry points.
//!
//! A query that returns zero articles is NOT an error. It produces the
//! no-articles sentinel digest and flows through the pipeline normally.

use thiserror::Error;

/// Errors surfaced by the fetch, summarize, and persist stages.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The news API reported a non-ok status or could not be reached.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),

    /// The summarization delegate failed or could not be reached.
    #[error("summarization delegate failed: {0}")]
    Delegate(String),

    /// The run log could not be written to disk.
    #[error("run log persistence failed: {0}")]
    Persistence(#[from] std::io::Error),

    /// Invalid configuration or arguments supplied by the caller.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The run log could not be serialized.
    #[error("run log serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
