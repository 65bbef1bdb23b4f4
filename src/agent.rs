//! Orchestration: one query end to end, and batches of queries across a
//! bounded worker pool.
//!
//! [`NewsAgent`] composes two capabilities — a [`FetchArticles`] fetcher
//! and a [`Summarize`] delegate — around a shared [`RunLog`]. One query
//! flows fetch → summarize → append; a batch dispatches one such flow per
//! query through `buffer_unordered` and waits for all of them to settle
//! before persisting.
//!
//! # Failure policy (batch)
//!
//! Abort-all: every task runs to completion or failure, then the first
//! failure in completion order is surfaced and nothing is persisted.
//! Partial summaries stay in memory only.
//!
//! # Shared state
//!
//! The run log sits behind one `tokio::sync::Mutex`. The lock is held only
//! for the `input_context` update and the summary append, never across a
//! network call. `input_context` is last-writer-wins under concurrent
//! dispatch; each [`SummaryRecord`] carries its own query, so no
//! information is lost to the race.

use crate::error::AgentError;
use crate::models::{QueryContext, RunLog, SummaryRecord};
use crate::newsapi::FetchArticles;
use crate::persist;
use crate::summarizer::Summarize;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::thread;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Per-agent defaults applied to every dispatched query.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Start of the news query date range, `YYYY-MM-DD`, unvalidated.
    pub start_date: Option<String>,
    /// End of the news query date range, `YYYY-MM-DD`, unvalidated.
    pub end_date: Option<String>,
    /// Article cap per query, at least 1.
    pub max_articles: usize,
    /// Sequential runs return the serialized run log instead of the last
    /// summary. Concurrent runs always return the serialized log.
    pub return_json: bool,
    /// Folder the run log is persisted into.
    pub log_dir: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            max_articles: 5,
            return_json: false,
            log_dir: "news_agent_runs".to_string(),
        }
    }
}

/// Number of queries processed at once in the batch path.
///
/// The runtime environment's default heuristic; no admission control of
/// our own on top of it.
fn worker_width() -> usize {
    thread::available_parallelism().map(usize::from).unwrap_or(4)
}

/// The news summarization agent.
///
/// Generic over its two collaborators so tests can substitute stubs for
/// the network-facing implementations.
pub struct NewsAgent<F, S> {
    name: String,
    fetcher: F,
    summarizer: S,
    settings: RunSettings,
    log: Mutex<RunLog>,
}

impl<F, S> NewsAgent<F, S>
where
    F: FetchArticles,
    S: Summarize,
{
    pub fn new(name: impl Into<String>, fetcher: F, summarizer: S, settings: RunSettings) -> Self {
        let seed_context = QueryContext::new(
            "",
            settings.start_date.clone(),
            settings.end_date.clone(),
            settings.max_articles,
            settings.return_json,
        );
        Self {
            name: name.into(),
            fetcher,
            summarizer,
            settings,
            log: Mutex::new(RunLog::new(seed_context)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn context_for(&self, query: &str) -> QueryContext {
        QueryContext::new(
            query,
            self.settings.start_date.clone(),
            self.settings.end_date.clone(),
            self.settings.max_articles,
            self.settings.return_json,
        )
    }

    /// Fetch, summarize, and record one query. Returns the delegate's
    /// summary.
    ///
    /// A fetch or delegate failure propagates and appends nothing. A query
    /// matching zero articles is not a failure: the delegate is invoked
    /// with the no-articles sentinel and its output is recorded as usual.
    #[instrument(level = "info", skip(self), fields(agent = %self.name))]
    pub async fn run(&self, query: &str) -> Result<String, AgentError> {
        let context = self.context_for(query);
        {
            let mut log = self.log.lock().await;
            log.input_context = context;
        }

        let fetched = self
            .fetcher
            .fetch(
                query,
                self.settings.start_date.as_deref(),
                self.settings.end_date.as_deref(),
                self.settings.max_articles,
            )
            .await?;
        debug!(digest = %truncate_for_log(&fetched.digest, 300), "digest ready");

        let summary = self.summarizer.summarize(&fetched.digest).await?;

        let record = SummaryRecord::new(query, fetched.articles, summary.clone());
        let mut log = self.log.lock().await;
        log.append(record);
        info!(recorded = log.summaries.len(), "recorded summary");
        Ok(summary)
    }

    /// Process queries one at a time, in submission order, then persist.
    ///
    /// Returns the serialized run log when `return_json` is set, otherwise
    /// the last query's summary (empty for an empty batch).
    #[instrument(level = "info", skip_all, fields(agent = %self.name, queries = queries.len()))]
    pub async fn run_sequential(&self, queries: &[String]) -> Result<String, AgentError> {
        let mut last_summary = String::new();
        for query in queries {
            last_summary = self.run(query).await?;
        }

        let json = self.persist_log().await?;
        if self.settings.return_json {
            Ok(json)
        } else {
            Ok(last_summary)
        }
    }

    /// Process queries concurrently and return the serialized run log.
    ///
    /// One task per query through a pool sized by the runtime default.
    /// Does not return until every task has settled; completion order is
    /// whatever the scheduler and network latency produce, and that is the
    /// order summaries land in the log. On any failure the batch aborts:
    /// the first failure (in completion order) is returned and nothing is
    /// persisted.
    #[instrument(level = "info", skip_all, fields(agent = %self.name, queries = queries.len()))]
    pub async fn run_concurrently(&self, queries: &[String]) -> Result<String, AgentError> {
        let width = worker_width();
        info!(width, "dispatching batch");

        let results: Vec<Result<String, AgentError>> = stream::iter(queries)
            .map(|query| self.run(query))
            .buffer_unordered(width)
            .collect()
            .await;

        // every task has settled; surface the first failure, if any
        for result in results {
            result?;
        }

        self.persist_log().await
    }

    async fn persist_log(&self) -> Result<String, AgentError> {
        let log = self.log.lock().await;
        persist::write_run_log(&log, &self.settings.log_dir).await?;
        Ok(log.to_json_pretty()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;
    use crate::newsapi::{render_digest, FetchedNews, NO_ARTICLES_DIGEST};
    use std::sync::{Arc, Mutex as StdMutex};

    fn article(n: u32) -> ArticleRecord {
        ArticleRecord {
            title: format!("Title {n}"),
            description: format!("Description {n}"),
            url: format!("https://example.com/{n}"),
            published_at: "2025-01-15T09:00:00Z".to_string(),
            source_name: "Example Wire".to_string(),
        }
    }

    fn temp_log_dir() -> String {
        std::env::temp_dir()
            .join(format!("news_agent_test_{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    fn settings(log_dir: &str) -> RunSettings {
        RunSettings {
            log_dir: log_dir.to_string(),
            ..RunSettings::default()
        }
    }

    /// Fetcher stub: fixed article set, optional per-query failure.
    struct StubFetcher {
        articles: Vec<ArticleRecord>,
        fail_on: Option<String>,
    }

    impl StubFetcher {
        fn returning(articles: Vec<ArticleRecord>) -> Self {
            Self { articles, fail_on: None }
        }
    }

    impl FetchArticles for StubFetcher {
        async fn fetch(
            &self,
            query: &str,
            _start_date: Option<&str>,
            _end_date: Option<&str>,
            _max_articles: usize,
        ) -> Result<FetchedNews, AgentError> {
            if self.fail_on.as_deref() == Some(query) {
                return Err(AgentError::UpstreamFetch("apiKeyInvalid".to_string()));
            }
            Ok(FetchedNews {
                digest: render_digest(query, &self.articles),
                articles: self.articles.clone(),
            })
        }
    }

    /// Delegate stub: records every digest it is handed.
    struct RecordingSummarizer {
        seen: Arc<StdMutex<Vec<String>>>,
    }

    impl Summarize for RecordingSummarizer {
        async fn summarize(&self, digest: &str) -> Result<String, AgentError> {
            self.seen.lock().unwrap().push(digest.to_string());
            Ok(format!("summary for [{}]", &digest[..digest.len().min(30)]))
        }
    }

    fn recording_summarizer() -> (RecordingSummarizer, Arc<StdMutex<Vec<String>>>) {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        (RecordingSummarizer { seen: Arc::clone(&seen) }, seen)
    }

    #[tokio::test]
    async fn test_run_appends_one_record_with_the_fetched_articles() {
        let dir = temp_log_dir();
        let articles = vec![article(1), article(2)];
        let (summarizer, seen) = recording_summarizer();
        let agent = NewsAgent::new(
            "test-agent",
            StubFetcher::returning(articles.clone()),
            summarizer,
            settings(&dir),
        );

        let summary = agent.run("Acme Corp").await.unwrap();
        assert!(summary.starts_with("summary for"));

        // the delegate received the digest text verbatim
        let digests = seen.lock().unwrap();
        assert_eq!(digests.len(), 1);
        assert_eq!(digests[0], render_digest("Acme Corp", &articles));
        assert_eq!(digests[0].matches("Article ").count(), 2);

        // the record carries the two articles verbatim
        let log = agent.log.lock().await;
        assert_eq!(log.summaries.len(), 1);
        assert_eq!(log.summaries[0].query, "Acme Corp");
        assert_eq!(log.summaries[0].articles, articles);
        assert_eq!(log.input_context.query, "Acme Corp");
    }

    #[tokio::test]
    async fn test_zero_articles_still_invoke_the_delegate_with_the_sentinel() {
        let dir = temp_log_dir();
        let (summarizer, seen) = recording_summarizer();
        let agent = NewsAgent::new(
            "test-agent",
            StubFetcher::returning(vec![]),
            summarizer,
            settings(&dir),
        );

        let summary = agent.run("ZZZNoResults").await.unwrap();

        let digests = seen.lock().unwrap();
        assert_eq!(digests[0], NO_ARTICLES_DIGEST);

        let log = agent.log.lock().await;
        assert_eq!(log.summaries.len(), 1);
        assert!(log.summaries[0].articles.is_empty());
        assert_eq!(log.summaries[0].summary, summary);
    }

    #[tokio::test]
    async fn test_failed_fetch_propagates_and_records_nothing() {
        let dir = temp_log_dir();
        let (summarizer, seen) = recording_summarizer();
        let fetcher = StubFetcher {
            articles: vec![],
            fail_on: Some("BadKey".to_string()),
        };
        let agent = NewsAgent::new("test-agent", fetcher, summarizer, settings(&dir));

        let err = agent.run("BadKey").await.unwrap_err();
        assert!(matches!(err, AgentError::UpstreamFetch(_)));

        assert!(seen.lock().unwrap().is_empty());
        assert!(agent.log.lock().await.summaries.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_batch_records_every_query_once() {
        let dir = temp_log_dir();
        let (summarizer, _) = recording_summarizer();
        let agent = NewsAgent::new(
            "test-agent",
            StubFetcher::returning(vec![article(1)]),
            summarizer,
            settings(&dir),
        );

        let queries: Vec<String> = (1..=8).map(|n| format!("query {n}")).collect();
        let json = agent.run_concurrently(&queries).await.unwrap();

        let parsed: RunLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summaries.len(), queries.len());

        let mut recorded: Vec<String> =
            parsed.summaries.iter().map(|s| s.query.clone()).collect();
        recorded.sort();
        let mut expected = queries.clone();
        expected.sort();
        assert_eq!(recorded, expected);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_concurrent_batch_persists_a_round_trippable_log() {
        let dir = temp_log_dir();
        let (summarizer, _) = recording_summarizer();
        let agent = NewsAgent::new(
            "test-agent",
            StubFetcher::returning(vec![article(1), article(2)]),
            summarizer,
            settings(&dir),
        );

        let queries = vec!["alpha".to_string(), "beta".to_string()];
        let json = agent.run_concurrently(&queries).await.unwrap();
        let returned: RunLog = serde_json::from_str(&json).unwrap();

        let path = format!("{dir}/news_agent_run_id:{}.json", returned.id);
        let on_disk = tokio::fs::read_to_string(&path).await.unwrap();
        let persisted: RunLog = serde_json::from_str(&on_disk).unwrap();

        assert_eq!(persisted.id, returned.id);
        assert_eq!(persisted.summaries.len(), returned.summaries.len());
        for (a, b) in persisted.summaries.iter().zip(returned.summaries.iter()) {
            assert_eq!(a.summary, b.summary);
        }

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_empty_batch_returns_an_empty_log_immediately() {
        let dir = temp_log_dir();
        let (summarizer, _) = recording_summarizer();
        let agent = NewsAgent::new(
            "test-agent",
            StubFetcher::returning(vec![article(1)]),
            summarizer,
            settings(&dir),
        );

        let json = agent.run_concurrently(&[]).await.unwrap();
        let parsed: RunLog = serde_json::from_str(&json).unwrap();
        assert!(parsed.summaries.is_empty());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_concurrent_batch_aborts_on_failure_and_persists_nothing() {
        let dir = temp_log_dir();
        let (summarizer, _) = recording_summarizer();
        let fetcher = StubFetcher {
            articles: vec![article(1)],
            fail_on: Some("poison".to_string()),
        };
        let agent = NewsAgent::new("test-agent", fetcher, summarizer, settings(&dir));

        let queries = vec![
            "fine one".to_string(),
            "poison".to_string(),
            "fine two".to_string(),
        ];
        let err = agent.run_concurrently(&queries).await.unwrap_err();
        assert!(matches!(err, AgentError::UpstreamFetch(_)));

        // abort-all: the log dir was never written
        assert!(!std::path::Path::new(&dir).exists());
    }

    #[tokio::test]
    async fn test_sequential_returns_last_summary_by_default() {
        let dir = temp_log_dir();
        let (summarizer, _) = recording_summarizer();
        let agent = NewsAgent::new(
            "test-agent",
            StubFetcher::returning(vec![article(1)]),
            summarizer,
            settings(&dir),
        );

        let queries = vec!["first".to_string(), "second".to_string()];
        let out = agent.run_sequential(&queries).await.unwrap();
        assert!(out.contains("summary for"));

        // submission order is preserved without concurrency
        let log = agent.log.lock().await;
        assert_eq!(log.summaries[0].query, "first");
        assert_eq!(log.summaries[1].query, "second");
        drop(log);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_sequential_returns_the_log_when_return_json_is_set() {
        let dir = temp_log_dir();
        let (summarizer, _) = recording_summarizer();
        let mut run_settings = settings(&dir);
        run_settings.return_json = true;
        let agent = NewsAgent::new(
            "test-agent",
            StubFetcher::returning(vec![article(1)]),
            summarizer,
            run_settings,
        );

        let out = agent
            .run_sequential(&["only".to_string()])
            .await
            .unwrap();
        let parsed: RunLog = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.summaries.len(), 1);
        assert_eq!(parsed.summaries[0].query, "only");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
