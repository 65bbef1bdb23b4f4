//! NewsAPI collaborator client: request construction, wire-shape
//! normalization, and digest rendering.
//!
//! The news API is treated as a black box behind a narrow call/response
//! contract. This module owns the whole boundary:
//!
//! 1. **Request**: `GET /everything` with the query, optional date range,
//!    English language, relevance ordering, and a page size cap
//! 2. **Normalization**: every raw item becomes an [`ArticleRecord`] with
//!    placeholders filled in for any missing field
//! 3. **Digest**: a deterministic, numbered, human-readable rendering of
//!    the normalized articles — this is what the summarization delegate
//!    receives, not the raw payload
//!
//! Two auxiliary pass-through calls (`sources by category` and `top
//! headlines by source`) return the collaborator's JSON untouched.

use crate::error::AgentError;
use crate::models::{ArticleRecord, NO_DATE, NO_DESCRIPTION, NO_TITLE, NO_URL, UNKNOWN_SOURCE};
use clap::ValueEnum;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

/// Default NewsAPI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";

/// Digest returned when a query matches zero articles.
///
/// This is a valid terminal state for a query, not an error; the delegate
/// is still invoked with this sentinel.
pub const NO_ARTICLES_DIGEST: &str = "No articles found for the given query and date range.";

/// Capability to fetch normalized articles plus their digest for a query.
///
/// [`NewsApiClient`] implements this over HTTP; tests substitute stubs.
pub trait FetchArticles {
    async fn fetch(
        &self,
        query: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        max_articles: usize,
    ) -> Result<FetchedNews, AgentError>;
}

/// Result of one fetch: the digest string sent to the delegate and the
/// structured payload recorded in the run log.
#[derive(Debug, Clone)]
pub struct FetchedNews {
    pub digest: String,
    pub articles: Vec<ArticleRecord>,
}

/// News source category accepted by the sources listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

// --- Wire types ---
//
// Everything the API might omit is Option; normalization is the only place
// that deals with absence.

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<WireArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<WireSource>,
}

#[derive(Debug, Default, Deserialize)]
struct WireSource {
    #[serde(default)]
    name: Option<String>,
}

impl From<WireArticle> for ArticleRecord {
    fn from(raw: WireArticle) -> Self {
        ArticleRecord {
            title: raw.title.unwrap_or_else(|| NO_TITLE.to_string()),
            description: raw.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            url: raw.url.unwrap_or_else(|| NO_URL.to_string()),
            published_at: raw.published_at.unwrap_or_else(|| NO_DATE.to_string()),
            source_name: raw
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        }
    }
}

/// Render the digest sent to the summarization delegate.
///
/// One numbered block per article, in the collaborator's relevance order.
/// Zero articles render as [`NO_ARTICLES_DIGEST`].
pub fn render_digest(query: &str, articles: &[ArticleRecord]) -> String {
    if articles.is_empty() {
        return NO_ARTICLES_DIGEST.to_string();
    }

    let blocks = articles
        .iter()
        .enumerate()
        .map(|(idx, article)| {
            format!(
                "\nArticle {}:\nTitle: {}\nDescription: {}\nURL: {}\nPublished At: {}\nSource: {}\n\n",
                idx + 1,
                article.title,
                article.description,
                article.url,
                article.published_at,
                article.source_name
            )
        })
        .join("");

    format!("News Articles for {query}:\n\n{blocks}")
}

/// HTTP client for the NewsAPI collaborator.
///
/// The API key is an explicit constructor parameter; nothing in here reads
/// the environment.
pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        // DEFAULT_BASE_URL is a constant and always parses
        Self::with_base_url(api_key, DEFAULT_BASE_URL).expect("default base url parses")
    }

    /// Point the client at a different endpoint (a proxy or a local stub).
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Result<Self, AgentError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AgentError::Config(format!("invalid news api base url: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AgentError> {
        self.base_url
            .join(path)
            .map_err(|e| AgentError::Config(format!("invalid news api endpoint {path}: {e}")))
    }

    async fn get_json(&self, url: Url) -> Result<Value, AgentError> {
        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .header("User-Agent", concat!("news_agent/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| AgentError::UpstreamFetch(format!("request failed: {e}")))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| AgentError::UpstreamFetch(format!("malformed response: {e}")))
    }

    /// List sources for a category. Pass-through: the collaborator's JSON
    /// is returned untouched.
    #[instrument(level = "info", skip(self))]
    pub async fn sources(&self, category: Category) -> Result<Value, AgentError> {
        let mut url = self.endpoint("top-headlines/sources")?;
        url.query_pairs_mut().append_pair("category", category.as_str());
        self.get_json(url).await
    }

    /// List top headlines for a source. Pass-through, like [`Self::sources`].
    #[instrument(level = "info", skip(self))]
    pub async fn top_headlines(&self, source: &str) -> Result<Value, AgentError> {
        let mut url = self.endpoint("top-headlines")?;
        url.query_pairs_mut().append_pair("sources", source);
        self.get_json(url).await
    }
}

impl FetchArticles for NewsApiClient {
    #[instrument(level = "info", skip(self, start_date, end_date))]
    async fn fetch(
        &self,
        query: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        max_articles: usize,
    ) -> Result<FetchedNews, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::Config("query must not be empty".to_string()));
        }
        if max_articles == 0 {
            return Err(AgentError::Config("max_articles must be at least 1".to_string()));
        }

        let mut url = self.endpoint("everything")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("language", "en");
            pairs.append_pair("sortBy", "relevancy");
            pairs.append_pair("pageSize", &max_articles.to_string());
            // dates are passed through unvalidated
            if let Some(from) = start_date {
                pairs.append_pair("from", from);
            }
            if let Some(to) = end_date {
                pairs.append_pair("to", to);
            }
        }

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .header("User-Agent", concat!("news_agent/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| AgentError::UpstreamFetch(format!("request failed: {e}")))?;

        let body: EverythingResponse = response
            .json()
            .await
            .map_err(|e| AgentError::UpstreamFetch(format!("malformed response: {e}")))?;

        if body.status != "ok" {
            let detail = body
                .message
                .or(body.code)
                .unwrap_or_else(|| "no detail provided".to_string());
            warn!(%query, %detail, "news api reported failure");
            return Err(AgentError::UpstreamFetch(detail));
        }

        let articles: Vec<ArticleRecord> =
            body.articles.into_iter().map(ArticleRecord::from).collect();
        info!(%query, count = articles.len(), "fetched articles");

        let digest = render_digest(query, &articles);
        Ok(FetchedNews { digest, articles })
    }
}
