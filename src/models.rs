//! Data models for the records flowing through the pipeline.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One normalized news item with always-present fields
//! - [`QueryContext`]: One dispatched query with its parameters
//! - [`SummaryRecord`]: One query's articles plus the delegate's summary
//! - [`RunLog`]: The session-wide record of every query and summary
//!
//! Identifiers and timestamps are generated inside the constructors, once
//! per instance. Records are immutable after construction; the only mutable
//! structure is [`RunLog`], which accumulates summaries as queries complete.

use crate::utils::now_stamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder substituted for an article with no title.
pub const NO_TITLE: &str = "No Title";
/// Placeholder substituted for an article with no description.
pub const NO_DESCRIPTION: &str = "No Description";
/// Placeholder substituted for an article with no URL.
pub const NO_URL: &str = "No URL";
/// Placeholder substituted for an article with no publication date.
pub const NO_DATE: &str = "No Date";
/// Placeholder substituted for an article with no source name.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// One normalized news item.
///
/// Every field is an always-present string: normalization substitutes a
/// fixed placeholder for anything the upstream API omitted, so downstream
/// consumers never deal with absent fields. Articles have no identity
/// beyond their position in the collaborator's relevance ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    pub source_name: String,
}

/// One dispatched query and the parameters it ran with.
///
/// Constructed once per query at dispatch time, immutable thereafter.
/// The `id` and `timestamp` are computed inside the constructor so no two
/// contexts ever share them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    pub id: String,
    pub query: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_articles: usize,
    pub return_json: bool,
    pub timestamp: String,
}

impl QueryContext {
    pub fn new(
        query: impl Into<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        max_articles: usize,
        return_json: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query: query.into(),
            start_date,
            end_date,
            max_articles,
            return_json,
            timestamp: now_stamp(),
        }
    }
}

/// One query's result: the articles it fetched and the delegate's summary.
///
/// Carries its own `query` so the record is self-describing even when many
/// queries run concurrently against the same run log. `articles` preserves
/// the collaborator's relevance ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: String,
    pub query: String,
    pub articles: Vec<ArticleRecord>,
    pub summary: String,
    pub timestamp: String,
}

impl SummaryRecord {
    pub fn new(
        query: impl Into<String>,
        articles: Vec<ArticleRecord>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query: query.into(),
            articles,
            summary: summary.into(),
            timestamp: now_stamp(),
        }
    }
}

/// The full session record: one per agent instance.
///
/// The `id` is generated once in the constructor and stays stable for the
/// agent's lifetime; it names the persisted log file. `input_context`
/// reflects the most recently dispatched query (under concurrent dispatch
/// the last writer wins; each [`SummaryRecord`] carries its own query).
/// `summaries` is append-only, in completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub id: String,
    pub input_context: QueryContext,
    pub summaries: Vec<SummaryRecord>,
    pub timestamp: String,
}

impl RunLog {
    pub fn new(input_context: QueryContext) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            input_context,
            summaries: Vec::new(),
            timestamp: now_stamp(),
        }
    }

    /// Append one completed query's record.
    pub fn append(&mut self, record: SummaryRecord) {
        self.summaries.push(record);
    }

    /// Serialize the log as indented, human-readable JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
